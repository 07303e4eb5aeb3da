//! Database connectors shared by the workspace services.
//!
//! Only MongoDB is wired up today. The connector owns nothing global: callers
//! receive a [`mongodb::Client`], take the [`mongodb::Database`] handle they
//! need and drop the client on shutdown.
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB connector, config and health checks
//! - `config` - `core_config::FromEnv` support for [`mongodb::MongoConfig`]
//!
//! # Example
//!
//! ```ignore
//! use database::mongodb::{MongoConfig, connect_with_retry};
//! use database::common::RetryConfig;
//!
//! let config = MongoConfig::with_database("mongodb://localhost:27017", "furniture");
//! let client = connect_with_retry(&config, RetryConfig::new().with_max_retries(5)).await?;
//! let db = client.database(config.database());
//! ```

pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use common::{DatabaseError, DatabaseResult};
