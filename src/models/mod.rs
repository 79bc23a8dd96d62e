//! Request and Response models for the insight service API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies, plus the
//! insight value types that are cached.

pub mod insight;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use insight::{Insight, InsightKind};
pub use requests::InsightRequest;
pub use responses::{
    DeleteResponse, ErrorResponse, HealthResponse, InsightResponse, StatsResponse,
};
