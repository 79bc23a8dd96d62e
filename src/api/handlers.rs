//! API Handlers
//!
//! HTTP request handlers for each service endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use crate::advisor::{Advisor, TextGenerator};
use crate::cache::ExpiringCache;
use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    DeleteResponse, HealthResponse, Insight, InsightKind, InsightRequest, InsightResponse,
    StatsResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Process-wide insight cache
    pub cache: ExpiringCache<Insight>,
    /// Cache-aside resolver over the upstream API
    pub advisor: Arc<Advisor>,
}

impl AppState {
    /// Creates state around an existing advisor, sharing its cache.
    pub fn new(advisor: Advisor) -> Self {
        Self {
            cache: advisor.cache().clone(),
            advisor: Arc::new(advisor),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config, generator: Arc<dyn TextGenerator>) -> Self {
        let cache = ExpiringCache::new(config.max_entries, config.ttl());
        Self::new(Advisor::from_config(config, cache, generator))
    }
}

/// Handler for POST /api/insights/:kind
pub async fn insight_handler(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Json(req): Json<InsightRequest>,
) -> ApiResult<Json<InsightResponse>> {
    let kind: InsightKind = kind.parse().map_err(ApiError::InvalidRequest)?;
    let resolved = state.advisor.resolve(kind, &req).await?;

    Ok(Json(InsightResponse {
        kind,
        key: resolved.key.into(),
        value: resolved.value,
        cached: resolved.cached,
    }))
}

/// Handler for DELETE /cache/:key
///
/// Drops a cached insight so the next request goes upstream.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let removed = state.cache.delete(&key)?;
    if removed {
        info!(key = %key, "Invalidated cached insight");
    }

    Ok(Json(DeleteResponse::new(key, removed)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.cache.stats().into())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
