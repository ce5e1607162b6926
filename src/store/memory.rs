//! In-memory property store.
//!
//! Not durable: everything is lost on restart. Reads share a read lock, writes
//! are serialized behind the write lock.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{sort_newest_first, PropertyRepository, StoreError, StoreResult};
use crate::models::{NewProperty, Property, PropertyPatch};

#[derive(Debug, Default)]
struct Inner {
    rows: BTreeMap<i64, Property>,
    last_id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryPropertyStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryPropertyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PropertyRepository for MemoryPropertyStore {
    async fn list_recent(&self) -> StoreResult<Vec<Property>> {
        let inner = self.inner.read().await;
        let mut properties: Vec<Property> = inner.rows.values().cloned().collect();
        sort_newest_first(&mut properties);
        Ok(properties)
    }

    async fn get(&self, id: i64) -> StoreResult<Property> {
        let inner = self.inner.read().await;
        inner.rows.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    async fn create(&self, property: NewProperty) -> StoreResult<Property> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let created = Property {
            id: inner.last_id,
            title: property.title,
            description: property.description,
            price: property.price,
            location: property.location,
            created_at: Utc::now(),
        };
        inner.rows.insert(created.id, created.clone());
        Ok(created)
    }

    async fn replace(&self, id: i64, property: NewProperty) -> StoreResult<Property> {
        let mut inner = self.inner.write().await;
        let row = inner.rows.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        row.title = property.title;
        row.description = property.description;
        row.price = property.price;
        row.location = property.location;
        Ok(row.clone())
    }

    async fn patch(&self, id: i64, patch: PropertyPatch) -> StoreResult<Property> {
        let mut inner = self.inner.write().await;
        let row = inner.rows.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        let updated = patch.apply_to(row);
        row.title = updated.title;
        row.description = updated.description;
        row.price = updated.price;
        row.location = updated.location;
        Ok(row.clone())
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        inner
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
