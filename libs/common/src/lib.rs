//! Common library for the money manager client
//!
//! This crate provides the local persisted key-value storage shared by the
//! service crates, together with its error types.
//!
//! ```rust,no_run
//! use common::cache::{KeyValueStore, RedisConfig, RedisStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RedisConfig::from_env()?;
//!     let store = RedisStore::new(&config)?.scoped("session");
//!     store.set("access_token", "token").await?;
//!     println!("Store health check: {}", store.health_check().await?);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod error;

pub use cache::{KeyValueStore, MemoryStore, RedisConfig, RedisStore};
pub use error::{StoreError, StoreResult};
