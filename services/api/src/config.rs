//! Backend client configuration

use crate::error::ClientResult;
use crate::transport::HttpTransport;

/// Backend base URL used when none is configured
pub const DEFAULT_BASE_URL: &str = "https://backendcd.onrender.com";

/// Configuration for the backend client
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Backend base URL; request paths are appended to it
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a new ClientConfig from environment variables
    ///
    /// # Environment Variables
    /// - `API_BASE_URL`: Backend base URL (default: "https://backendcd.onrender.com")
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self { base_url }
    }

    /// Build the reqwest transport for this configuration
    pub fn transport(&self) -> ClientResult<HttpTransport> {
        HttpTransport::new(&self.base_url)
    }
}
