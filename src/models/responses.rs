//! Response DTOs for the property API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::collections::BTreeMap;

use serde::Serialize;

use super::Property;
use crate::metrics::MetricsSnapshot;

/// Response body for `GET /properties/`
#[derive(Debug, Clone, Serialize)]
pub struct PropertyListResponse {
    /// Number of listings returned
    pub count: usize,
    /// Listings, newest first
    pub properties: Vec<Property>,
}

impl PropertyListResponse {
    pub fn new(properties: Vec<Property>) -> Self {
        Self {
            count: properties.len(),
            properties,
        }
    }
}

/// Response body for `GET /properties/metrics/`
#[derive(Debug, Clone, Serialize)]
pub struct MetricsResponse {
    /// `"success"`, or `"degraded"` when the snapshot could not be collected
    pub status: &'static str,
    pub metrics: MetricsSnapshot,
    /// Human readable meaning of each metrics field
    pub description: BTreeMap<&'static str, &'static str>,
}

impl MetricsResponse {
    pub fn new(metrics: MetricsSnapshot) -> Self {
        let status = if metrics.error.is_some() {
            "degraded"
        } else {
            "success"
        };
        Self {
            status,
            metrics,
            description: field_descriptions(),
        }
    }
}

fn field_descriptions() -> BTreeMap<&'static str, &'static str> {
    BTreeMap::from([
        (
            "keyspace_hits",
            "Number of successful key lookups in the cache",
        ),
        (
            "keyspace_misses",
            "Number of key lookups that found no entry",
        ),
        ("total_requests", "Total cache lookups (hits + misses)"),
        (
            "hit_ratio",
            "Fraction of lookups served from the cache (hits / total_requests)",
        ),
        ("hit_ratio_percentage", "Hit ratio expressed as a percentage"),
        ("cache_keys", "Number of keys currently stored in the cache"),
        ("used_memory", "Memory used by the cache service"),
        (
            "connected_clients",
            "Number of clients connected to the cache service",
        ),
    ])
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
