//! Health check and statistics endpoints.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::connection::ConnectionStats;
use crate::relay::RelayStatsSnapshot;
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub templates: TemplateHealthResponse,
    pub wylto: WyltoHealthResponse,
}

#[derive(Debug, Serialize)]
pub struct TemplateHealthResponse {
    pub loaded: usize,
}

#[derive(Debug, Serialize)]
pub struct WyltoHealthResponse {
    pub base_url: String,
    pub max_retries: u32,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub relay: RelayStatsSnapshot,
    pub connections: ConnectionStats,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        templates: TemplateHealthResponse {
            loaded: state.registry.len(),
        },
        wylto: WyltoHealthResponse {
            base_url: state.settings.wylto.base_url.clone(),
            max_retries: state.settings.wylto.max_retries,
        },
    })
}

pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        relay: state.relay.stats().snapshot(),
        connections: state.connections.stats(),
    })
}
