//! Property persistence
//!
//! Handlers talk to storage only through [`PropertyRepository`]. Two
//! implementations exist: SQLite for real deployments and an in-memory map for
//! tests and throwaway runs.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NewProperty, Property, PropertyPatch};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryPropertyStore;
pub use sqlite::SqlitePropertyStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("property {0} not found")]
    NotFound(i64),
    #[error("constraint violated: {0}")]
    Constraint(String),
    #[error("storage failure: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait PropertyRepository: Send + Sync {
    /// All properties, newest `created_at` first.
    async fn list_recent(&self) -> StoreResult<Vec<Property>>;
    async fn get(&self, id: i64) -> StoreResult<Property>;
    async fn create(&self, property: NewProperty) -> StoreResult<Property>;
    /// Overwrites every writable field; `id` and `created_at` are kept.
    async fn replace(&self, id: i64, property: NewProperty) -> StoreResult<Property>;
    async fn patch(&self, id: i64, patch: PropertyPatch) -> StoreResult<Property>;
    async fn delete(&self, id: i64) -> StoreResult<()>;
    fn backend_name(&self) -> &'static str;
}

/// Newest first; equal timestamps fall back to the larger id.
pub(crate) fn sort_newest_first(properties: &mut [Property]) {
    properties.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}
