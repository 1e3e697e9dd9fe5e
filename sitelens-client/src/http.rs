use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

/// Thin wrapper around a `reqwest::Client` preconfigured for the crawl service.
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct CrawlClient {
    client: Client,
    config: Arc<ClientConfig>,
}

impl CrawlClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(auth) = config.authorization() {
            let mut value = HeaderValue::from_str(&auth)
                .map_err(|e| ApiError::Config(format!("Invalid API token: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .user_agent(concat!("Sitelens/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(config.timeout())
            .connect_timeout(config.timeout() / 2)
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .build()?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.config.endpoint(path)?;
        debug!("{} {}", method, url);
        Ok(self.client.request(method, url))
    }

    /// Send a request and decode a JSON body, turning non-2xx responses into
    /// [`ApiError::Http`].
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            debug!("Request failed with {}: {}", status, body);
            return Err(ApiError::from_response(status.as_u16(), &body));
        }

        Ok(serde_json::from_str(&body)?)
    }
}
