//! Cache-aside resolution of insights.
//!
//! `Start -> CacheLookup -> Hit: Return | Miss -> UpstreamCall ->
//! (Success: Extract -> StoreCache -> Return) | (Error: ReturnError)`

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::advisor::extract::extract;
use crate::advisor::prompt::build_prompt;
use crate::advisor::single_flight::{Role, SingleFlight};
use crate::advisor::upstream::TextGenerator;
use crate::cache::{CacheKey, ExpiringCache};
use crate::config::Config;
use crate::error::{ApiError, ApiResult, UpstreamError};
use crate::models::{Insight, InsightKind, InsightRequest};

/// Upstream attempts per miss, counting the first.
const MAX_ATTEMPTS: u32 = 2;

/// Default bound on one upstream attempt.
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// Outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub key: CacheKey,
    pub value: Insight,
    /// Served from the cache without an upstream call
    pub cached: bool,
}

// == Advisor ==
pub struct Advisor {
    cache: ExpiringCache<Insight>,
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
    retry: bool,
    /// In-flight loads, yielding the value and whether it came from the cache
    flights: SingleFlight<Result<(Insight, bool), UpstreamError>>,
}

impl Advisor {
    /// Creates an advisor storing results in `cache` with the cache's
    /// default TTL.
    pub fn new(cache: ExpiringCache<Insight>, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            cache,
            generator,
            timeout: DEFAULT_UPSTREAM_TIMEOUT,
            retry: true,
            flights: SingleFlight::new(),
        }
    }

    pub fn from_config(
        config: &Config,
        cache: ExpiringCache<Insight>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self::new(cache, generator)
            .with_timeout(config.timeout())
            .with_retry(config.upstream_retry)
    }

    /// Bounds each upstream attempt.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enables the single retry after a connection failure.
    pub fn with_retry(mut self, retry: bool) -> Self {
        self.retry = retry;
        self
    }

    pub fn cache(&self) -> &ExpiringCache<Insight> {
        &self.cache
    }

    /// The cache key for `kind` and `req`: `namespace:user_id:college`.
    pub fn cache_key(kind: InsightKind, req: &InsightRequest) -> ApiResult<CacheKey> {
        Ok(CacheKey::identified(
            kind.namespace(),
            [req.user_id.as_str(), req.college.as_str()],
        )?)
    }

    // == Resolve ==
    /// Returns the insight for `req`, calling upstream only on a miss.
    ///
    /// A hit is returned as-is even when non-key fields of `req` differ
    /// from the request that populated it. Upstream failures are returned
    /// and never cached.
    pub async fn resolve(&self, kind: InsightKind, req: &InsightRequest) -> ApiResult<Resolved> {
        if let Some(message) = req.validate() {
            return Err(ApiError::InvalidRequest(message));
        }
        let key = Self::cache_key(kind, req)?;

        if let Some(value) = self.cache.get(&key)? {
            debug!(key = %key, "Insight cache hit");
            return Ok(Resolved {
                key,
                value,
                cached: true,
            });
        }

        debug!(key = %key, "Insight cache miss");
        let (value, cached) = self.load(kind, req, &key).await?;
        Ok(Resolved { key, value, cached })
    }

    /// Runs the miss path once per key at a time. The leader looks at the
    /// cache again first, since a previous leader may have stored the value
    /// between this caller's miss and its arrival here.
    async fn load(
        &self,
        kind: InsightKind,
        req: &InsightRequest,
        key: &CacheKey,
    ) -> Result<(Insight, bool), UpstreamError> {
        let (outcome, role) = self
            .flights
            .run(key.as_str(), move || async move {
                if let Some(value) = self.cache.peek(key) {
                    debug!(key = %key, "Insight stored by an earlier call");
                    return Ok((value, true));
                }
                self.fetch(kind, req, key).await.map(|value| (value, false))
            })
            .await;
        if role == Role::Follower {
            debug!(key = %key, "Shared in-flight upstream result");
        }
        outcome
    }

    async fn fetch(
        &self,
        kind: InsightKind,
        req: &InsightRequest,
        key: &CacheKey,
    ) -> Result<Insight, UpstreamError> {
        let prompt = build_prompt(kind, req);
        let text = self.generate(&prompt).await?;
        let value = extract(kind, &text);

        match self.cache.set_default(key.clone(), value.clone()) {
            Ok(()) => info!(
                key = %key,
                generator = self.generator.name(),
                "Cached upstream insight"
            ),
            Err(e) => warn!(key = %key, error = %e, "Failed to cache insight"),
        }
        Ok(value)
    }

    /// One bounded upstream call, retried once on connection errors.
    async fn generate(&self, prompt: &str) -> Result<String, UpstreamError> {
        let mut attempt = 1;
        loop {
            let outcome = tokio::time::timeout(self.timeout, self.generator.generate(prompt))
                .await
                .unwrap_or(Err(UpstreamError::Timeout(self.timeout)));

            match outcome {
                Err(e) if self.retry && attempt < MAX_ATTEMPTS && e.is_retryable() => {
                    warn!(attempt, error = %e, "Upstream call failed, retrying");
                    attempt += 1;
                }
                Err(e) => {
                    warn!(error = %e, "Upstream call failed");
                    return Err(e);
                }
                Ok(text) => return Ok(text),
            }
        }
    }
}
