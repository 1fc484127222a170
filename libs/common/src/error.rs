//! Custom error types for the common library
//!
//! This module defines the errors raised by the local key-value store
//! adapters shared by every service crate.

use redis::RedisError;
use thiserror::Error;

/// Custom error type for key-value store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Error occurred while connecting to the backing store
    #[error("Store connection error: {0}")]
    Connection(#[source] RedisError),

    /// Error occurred while executing a store command
    #[error("Store command error: {0}")]
    Command(#[source] RedisError),

    /// Configuration error
    #[error("Store configuration error: {0}")]
    Configuration(String),

    /// A stored value could not be encoded or decoded
    #[error("Store serialization error for key {key}: {reason}")]
    Serialization { key: String, reason: String },
}

/// Type alias for Result with StoreError
pub type StoreResult<T> = Result<T, StoreError>;
