use axum::Json;
use axum::extract::State;

use crate::infra::http::api::models::{HealthEnvelope, SystemInfo};
use crate::infra::http::api::state::ApiState;

/// Liveness only: reports the process is serving without touching the
/// database or cache.
pub async fn healthcheck(State(state): State<ApiState>) -> Json<HealthEnvelope> {
    Json(HealthEnvelope {
        status: "available".to_string(),
        system_info: SystemInfo {
            environment: state.environment.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    })
}
