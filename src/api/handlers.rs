//! API Handlers
//!
//! HTTP request handlers for the diagnostics endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::caches::{JsonCache, NamedCaches};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    CacheStatsResponse, ClearResponse, HealthResponse, PurgeResponse, StatsOverviewResponse,
};

/// Application state shared across all handlers.
///
/// The caches synchronize internally, so handlers share plain handles.
#[derive(Debug, Clone)]
pub struct AppState {
    pub caches: NamedCaches,
}

impl AppState {
    pub fn new(caches: NamedCaches) -> Self {
        Self { caches }
    }

    /// Builds the named caches from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(NamedCaches::from_config(config)?))
    }

    fn cache(&self, name: &str) -> Result<&JsonCache> {
        self.caches
            .get(name)
            .ok_or_else(|| CacheError::UnknownCache(name.to_string()))
    }
}

/// Handler for GET /stats
///
/// Returns statistics of every named cache.
pub async fn stats_overview_handler(State(state): State<AppState>) -> Json<StatsOverviewResponse> {
    let caches = state
        .caches
        .iter()
        .map(|(name, cache)| CacheStatsResponse::new(name, &cache.stats()))
        .collect();

    Json(StatsOverviewResponse { caches })
}

/// Handler for GET /stats/:name
pub async fn cache_stats_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<CacheStatsResponse>> {
    let stats = state.cache(&name)?.stats();

    Ok(Json(CacheStatsResponse::new(name, &stats)))
}

/// Handler for POST /caches/:name/clear
pub async fn clear_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ClearResponse>> {
    state.cache(&name)?.clear();

    Ok(Json(ClearResponse::new(name)))
}

/// Handler for POST /caches/:name/purge
///
/// Removes expired entries immediately instead of waiting for the sweeper.
pub async fn purge_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<PurgeResponse>> {
    let removed = state.cache(&name)?.purge_expired();

    Ok(Json(PurgeResponse::new(name, removed)))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
