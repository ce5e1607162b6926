//! Domain types and request/response models for the property API
//!
//! This module defines the property entity plus the DTOs used for
//! serializing/deserializing HTTP request and response bodies.

pub mod price;
pub mod property;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use price::Price;
pub use property::{format_timestamp, NewProperty, Property, PropertyPatch};
pub use requests::{PropertyPatchRequest, PropertyRequest};
pub use responses::{HealthResponse, MetricsResponse, PropertyListResponse};
