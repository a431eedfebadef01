use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use citabot_agent::runtime::ActionRuntime;
use serde::Serialize;

#[derive(Clone)]
pub struct HealthState {
    action_runtime: Arc<ActionRuntime>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub actions: HealthCheck,
    pub checked_at: String,
}

pub fn router(action_runtime: Arc<ActionRuntime>) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { action_runtime })
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let actions = actions_check(&state.action_runtime);
    let ready = actions.status == "ok";

    let payload = HealthResponse {
        status: if ready { "ok" } else { "degraded" },
        service: HealthCheck {
            status: "ok",
            detail: "citabot-server runtime initialized".to_string(),
        },
        actions,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

fn actions_check(action_runtime: &ActionRuntime) -> HealthCheck {
    let names = action_runtime.action_names();
    if names.is_empty() {
        return HealthCheck { status: "degraded", detail: "no actions registered".to_string() };
    }
    HealthCheck { status: "ok", detail: format!("{} actions registered", names.len()) }
}
