//! Property Cache - property listings API with a read-through response cache
//!
//! Serves property listings from a relational store, caches the listing
//! response for 15 minutes, flushes the cache on every write and reports cache
//! hit/miss metrics.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::{create_router, AppState};
pub use config::Config;
pub use tasks::spawn_cleanup_task;
