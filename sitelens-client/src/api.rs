use crate::error::Result;
use crate::http::CrawlClient;
use crate::model::{
    DeleteRequest, ListQuery, ListResponse, MessageResponse, SubmitRequest, SubmitResponse,
};
use reqwest::Method;
use std::future::Future;
use tracing::info;

/// The backend operations the client depends on.
pub trait CrawlApi {
    /// `POST /crawl` - queue a URL for analysis.
    fn submit_url(&self, url: &str) -> impl Future<Output = Result<SubmitResponse>> + Send;

    /// `GET /crawl/list` - one page of analyzed items.
    fn list(&self, query: &ListQuery) -> impl Future<Output = Result<ListResponse>> + Send;

    /// `DELETE /crawl` - remove items by id.
    fn delete(&self, ids: &[i64]) -> impl Future<Output = Result<MessageResponse>> + Send;
}

impl CrawlApi for CrawlClient {
    async fn submit_url(&self, url: &str) -> Result<SubmitResponse> {
        info!("Submitting {} for analysis", url);
        let request = self
            .request(Method::POST, "crawl")?
            .json(&SubmitRequest { url });
        self.send_json(request).await
    }

    async fn list(&self, query: &ListQuery) -> Result<ListResponse> {
        let request = self
            .request(Method::GET, "crawl/list")?
            .query(&query.to_pairs());
        self.send_json(request).await
    }

    async fn delete(&self, ids: &[i64]) -> Result<MessageResponse> {
        info!("Deleting {} item(s)", ids.len());
        let request = self
            .request(Method::DELETE, "crawl")?
            .json(&DeleteRequest { ids });
        self.send_json(request).await
    }
}
