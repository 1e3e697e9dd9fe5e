use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    Http {
        status: u16,
        message: String,
        body: Option<Value>,
    },

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Flattened view of an [`ApiError`], shaped for user-facing notifications.
#[derive(Debug, Clone, PartialEq)]
pub struct HandledError {
    pub message: String,
    pub is_http_error: bool,
    pub status_code: Option<u16>,
    pub response_body: Option<Value>,
}

impl ApiError {
    /// Build an error from a non-2xx response. The body's `message` field wins
    /// over the generic status text when the backend provides one.
    pub fn from_response(status: u16, body_text: &str) -> Self {
        let body: Option<Value> = serde_json::from_str(body_text).ok();
        let message = body
            .as_ref()
            .and_then(|b| b.get("message"))
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Request failed with status code {}", status));

        ApiError::Http {
            status,
            message,
            body,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn handled(&self) -> HandledError {
        match self {
            ApiError::Http {
                status,
                message,
                body,
            } => HandledError {
                message: message.clone(),
                is_http_error: true,
                status_code: Some(*status),
                response_body: body.clone(),
            },
            ApiError::Transport(e) => HandledError {
                message: e.to_string(),
                is_http_error: true,
                status_code: e.status().map(|s| s.as_u16()),
                response_body: None,
            },
            other => HandledError {
                message: other.to_string(),
                is_http_error: false,
                status_code: None,
                response_body: None,
            },
        }
    }
}
