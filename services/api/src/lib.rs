//! Backend client for the money manager service
//!
//! This crate describes every remote operation the client performs as a
//! typed request/response pair, and sends them through a bearer-token
//! authenticated HTTP transport.

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod transport;

pub use client::{ApiClient, DEFAULT_LIST_LIMIT, ProfileMethod, Reply};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport};
pub use reqwest::Method;
