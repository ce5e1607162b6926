//! API Module
//!
//! HTTP handlers and routing for the property REST API.
//!
//! # Endpoints
//! - `GET /properties/` - List all properties, newest first (cached)
//! - `POST /properties/` - Create a property
//! - `GET /properties/metrics/` - Cache hit/miss metrics
//! - `GET /properties/:id/` - Fetch one property
//! - `PUT /properties/:id/` - Replace a property
//! - `PATCH /properties/:id/` - Partially update a property
//! - `DELETE /properties/:id/` - Delete a property
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
