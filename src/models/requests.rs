//! Request DTOs for the insight service API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;
use serde_json::Value;

/// Request body for `POST /api/insights/:kind`
///
/// Only `user_id` and `college` take part in the cache key. Two requests
/// that differ only in `country`, `course` or `profile` share one cached
/// answer for the lifetime of the entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InsightRequest {
    /// Student identifier, the phone number in the counseling flow
    #[serde(alias = "phone")]
    pub user_id: String,
    /// College the insight is about
    #[serde(alias = "collegeName")]
    pub college: String,
    /// Destination country
    #[serde(default)]
    pub country: Option<String>,
    /// Intended course or program
    #[serde(default)]
    pub course: Option<String>,
    /// Counseling profile fields, passed through to the prompt
    #[serde(default)]
    pub profile: Option<Value>,
}

impl InsightRequest {
    pub fn new(user_id: impl Into<String>, college: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            college: college.into(),
            ..Self::default()
        }
    }

    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.user_id.trim().is_empty() {
            return Some("user_id cannot be empty".to_string());
        }
        if self.college.trim().is_empty() {
            return Some("college cannot be empty".to_string());
        }
        None
    }
}
