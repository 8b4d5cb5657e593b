//! Health endpoints: a bare liveness probe and a readiness probe that pings
//! the database.

use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Up,
    Down,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HealthInfo {
    pub status: HealthStatus,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthInfo {
    fn now(status: HealthStatus) -> Self {
        Self {
            status,
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
        }
    }
}

async fn health() -> impl IntoResponse {
    Json(HealthInfo::now(HealthStatus::Up))
}

async fn live() -> impl IntoResponse {
    StatusCode::OK
}

/// Ready when the database answers a ping.
async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    match crate::db::health_check(&state.db).await {
        Ok(()) => (StatusCode::OK, Json(HealthInfo::now(HealthStatus::Up))),
        Err(e) => {
            error!("Readiness check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthInfo::now(HealthStatus::Down)),
            )
        }
    }
}

pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health))
        .route("/live", get(live))
        .route("/ready", get(ready))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_info_carries_the_crate_version() {
        let info = HealthInfo::now(HealthStatus::Up);
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(info.status, HealthStatus::Up);
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&HealthStatus::Up).unwrap(), "\"up\"");
        assert_eq!(
            serde_json::to_string(&HealthStatus::Down).unwrap(),
            "\"down\""
        );
    }
}
