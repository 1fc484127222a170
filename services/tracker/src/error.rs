//! Custom error types for the tracker services

use api::ClientError;
use common::StoreError;
use thiserror::Error;

/// Failure of a public service operation
#[derive(Error, Debug)]
pub enum ServiceError {
    /// No access token is stored locally
    #[error("Authentication required")]
    AuthenticationRequired,

    /// Network or connection failure before any HTTP response
    #[error("Network error: {0}")]
    Transport(String),

    /// The backend answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// A 2xx response without a usable body
    #[error("Empty response from server")]
    EmptyResponseBody,

    /// Pre-flight input check failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Local storage failure
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl From<ClientError> for ServiceError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::Transport(message) => ServiceError::Transport(message),
            ClientError::Http { status, body } => ServiceError::Http { status, body },
            ClientError::EmptyResponseBody { .. } => ServiceError::EmptyResponseBody,
            ClientError::InvalidUrl(url) => ServiceError::Transport(format!("invalid URL {}", url)),
            ClientError::Encode(e) => ServiceError::Validation(e.to_string()),
        }
    }
}

impl ServiceError {
    /// HTTP status for backend failures
    pub fn status(&self) -> Option<u16> {
        match self {
            ServiceError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Human-readable message suitable for a transient banner
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::AuthenticationRequired => "Please log in again to continue".to_string(),
            ServiceError::Transport(message) => format!("Network error: {}", message),
            ServiceError::Http { status, body } => {
                let summary = match status {
                    400 => "Invalid data".to_string(),
                    404 => "Not found".to_string(),
                    422 => "Validation error".to_string(),
                    other => format!("Server error (status {})", other),
                };
                let detail = ClientError::Http {
                    status: *status,
                    body: body.clone(),
                }
                .detail();
                match detail {
                    Some(detail) => format!("{}: {}", summary, detail),
                    None => summary,
                }
            }
            ServiceError::EmptyResponseBody => "Empty response from server".to_string(),
            ServiceError::Validation(message) => message.clone(),
            ServiceError::Store(_) => "Could not access local storage".to_string(),
        }
    }
}

/// Type alias for service results
pub type ServiceResult<T> = Result<T, ServiceError>;
