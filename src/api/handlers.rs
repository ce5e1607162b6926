//! API Handlers
//!
//! HTTP request handlers for the property endpoints. Writes flush the cache
//! only after the store has accepted them; a rejected write leaves the cache
//! untouched.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::cache::{invalidate_all, CacheBackend, ResponseCache, WriteKind};
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::metrics;
use crate::models::{
    HealthResponse, MetricsResponse, Property, PropertyListResponse, PropertyPatchRequest,
    PropertyRequest,
};
use crate::store::PropertyRepository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Property persistence
    pub properties: Arc<dyn PropertyRepository>,
    /// Cache service shared by the response cache, invalidation and metrics
    pub cache: Arc<dyn CacheBackend>,
    /// TTL of cached listing responses
    pub cache_ttl: Duration,
    /// Namespace prefix for response cache keys
    pub cache_key_prefix: String,
}

impl AppState {
    pub fn new(properties: Arc<dyn PropertyRepository>, cache: Arc<dyn CacheBackend>) -> Self {
        let defaults = Config::default();
        Self {
            properties,
            cache,
            cache_ttl: defaults.cache_ttl(),
            cache_key_prefix: defaults.cache_key_prefix,
        }
    }

    /// Creates a new AppState using the cache policy from configuration.
    pub fn from_config(
        config: &Config,
        properties: Arc<dyn PropertyRepository>,
        cache: Arc<dyn CacheBackend>,
    ) -> Self {
        Self {
            properties,
            cache,
            cache_ttl: config.cache_ttl(),
            cache_key_prefix: config.cache_key_prefix.clone(),
        }
    }

    /// Middleware state for the cached listing route.
    pub fn response_cache(&self) -> ResponseCache {
        ResponseCache::new(self.cache.clone(), self.cache_ttl, &self.cache_key_prefix)
    }
}

/// Handler for GET /properties/
///
/// Runs behind the response cache; it is only reached on a miss.
pub async fn list_properties(State(state): State<AppState>) -> Result<Json<PropertyListResponse>> {
    let properties = state.properties.list_recent().await?;
    Ok(Json(PropertyListResponse::new(properties)))
}

/// Handler for POST /properties/
pub async fn create_property(
    State(state): State<AppState>,
    Json(req): Json<PropertyRequest>,
) -> Result<(StatusCode, Json<Property>)> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let created = state.properties.create(req.into_new_property()).await?;
    invalidate_all(state.cache.as_ref(), WriteKind::Create, created.id).await;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Handler for GET /properties/:id/
pub async fn get_property(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Property>> {
    Ok(Json(state.properties.get(id).await?))
}

/// Handler for PUT /properties/:id/
pub async fn replace_property(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<PropertyRequest>,
) -> Result<Json<Property>> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let updated = state.properties.replace(id, req.into_new_property()).await?;
    invalidate_all(state.cache.as_ref(), WriteKind::Update, id).await;

    Ok(Json(updated))
}

/// Handler for PATCH /properties/:id/
pub async fn update_property(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<PropertyPatchRequest>,
) -> Result<Json<Property>> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let updated = state.properties.patch(id, req.into_patch()).await?;
    invalidate_all(state.cache.as_ref(), WriteKind::Update, id).await;

    Ok(Json(updated))
}

/// Handler for DELETE /properties/:id/
pub async fn delete_property(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.properties.delete(id).await?;
    invalidate_all(state.cache.as_ref(), WriteKind::Delete, id).await;

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /properties/metrics/
///
/// Always answers 200; a broken cache service yields a degraded snapshot.
pub async fn cache_metrics(State(state): State<AppState>) -> Json<MetricsResponse> {
    let snapshot = metrics::collect(state.cache.as_ref()).await;
    Json(MetricsResponse::new(snapshot))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
