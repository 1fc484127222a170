//! Custom error types for the backend client

use serde_json::Value;
use thiserror::Error;

/// Custom error type for backend calls
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request never produced an HTTP response
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// A 2xx response whose body was absent or could not be parsed
    #[error("Empty or unreadable response body (HTTP {status})")]
    EmptyResponseBody { status: u16, body: String },

    /// The configured base URL cannot carry request paths
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),

    /// A request body could not be encoded
    #[error("Request encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ClientError {
    /// HTTP status of the failure, when the backend answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } | ClientError::EmptyResponseBody { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Raw error body returned by the backend, if any
    pub fn body(&self) -> Option<&str> {
        match self {
            ClientError::Http { body, .. } | ClientError::EmptyResponseBody { body, .. } => {
                Some(body)
            }
            _ => None,
        }
    }

    /// Human-readable detail carried by a backend error body
    ///
    /// Looks at `detail`, then `message`, then `error`. FastAPI validation
    /// errors put a list of `{ "msg": ... }` objects under `detail`; their
    /// messages are joined.
    pub fn detail(&self) -> Option<String> {
        let body = self.body()?;
        let value: Value = serde_json::from_str(body).ok()?;

        for field in ["detail", "message", "error"] {
            match value.get(field) {
                Some(Value::String(text)) if !text.trim().is_empty() => {
                    return Some(text.clone());
                }
                Some(Value::Array(items)) => {
                    let messages: Vec<&str> = items
                        .iter()
                        .filter_map(|item| item.get("msg").and_then(Value::as_str))
                        .collect();
                    if !messages.is_empty() {
                        return Some(messages.join("; "));
                    }
                }
                _ => {}
            }
        }

        None
    }
}

/// Type alias for backend client results
pub type ClientResult<T> = Result<T, ClientError>;
