pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod model;

pub use api::CrawlApi;
pub use config::ClientConfig;
pub use error::{ApiError, HandledError};
pub use http::CrawlClient;
pub use model::{
    CrawlItem, HeadingCounts, ListQuery, ListResponse, MessageResponse, SortColumn, SortDirection,
    SortSpec, SubmitResponse,
};
