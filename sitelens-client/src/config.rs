use crate::error::{ApiError, Result};
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const API_URL_ENV: &str = "SITELENS_API_URL";
pub const API_TOKEN_ENV: &str = "SITELENS_API_TOKEN";

/// Connection settings shared by every backend call.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: Url,
    token: Option<String>,
    timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(base_url.trim())
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(format!(
                "{} cannot be used as an API base",
                base_url
            )));
        }

        // Url::join replaces the last segment unless the path ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            base_url,
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.token = if token.trim().is_empty() {
            None
        } else {
            Some(token.trim().to_string())
        };
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Value for the `Authorization` header. A bare token gets the `Bearer` scheme.
    pub fn authorization(&self) -> Option<String> {
        self.token.as_ref().map(|token| {
            if token.contains(' ') {
                token.clone()
            } else {
                format!("Bearer {}", token)
            }
        })
    }

    /// Resolve `path` under `<base>/api/`.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join("api/")
            .and_then(|api| api.join(path.trim_start_matches('/')))
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", path, e)))
    }
}
