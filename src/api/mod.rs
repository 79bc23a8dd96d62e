//! API Module
//!
//! HTTP handlers and routing for the insight service.
//!
//! # Endpoints
//! - `POST /api/insights/:kind` - Resolve an insight through the cache
//! - `DELETE /cache/:key` - Invalidate a cached insight
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
