//! Custom-action webhook consumed by the dialogue engine.
//!
//! Endpoints:
//! - `POST /webhook`: run the action named in `next_action` against the tracker slots
//! - `GET  /actions`: list the registered action names

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use citabot_agent::runtime::{new_correlation_id, ActionResponse, ActionRuntime};
use citabot_agent::slots::SlotSnapshot;
use citabot_core::errors::{ApplicationError, InterfaceError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

#[derive(Clone)]
pub struct WebhookState {
    action_runtime: Arc<ActionRuntime>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ActionCall {
    #[serde(default)]
    pub next_action: Option<String>,
    #[serde(default)]
    pub sender_id: Option<String>,
    #[serde(default)]
    pub tracker: Option<TrackerState>,
    #[serde(default)]
    pub domain: Option<Value>,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TrackerState {
    #[serde(default)]
    pub sender_id: Option<String>,
    #[serde(default)]
    pub slots: Option<Map<String, Value>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    pub name: String,
}

type WebhookError = (StatusCode, Json<ActionErrorBody>);

pub fn router(action_runtime: Arc<ActionRuntime>) -> Router {
    Router::new()
        .route("/webhook", post(run_action))
        .route("/actions", get(list_actions))
        .with_state(WebhookState { action_runtime })
}

pub async fn run_action(
    State(state): State<WebhookState>,
    payload: Result<Json<ActionCall>, JsonRejection>,
) -> Result<Json<ActionResponse>, WebhookError> {
    let correlation_id = new_correlation_id();

    let Json(call) = payload.map_err(|rejection| {
        warn!(
            event_name = "webhook.action.invalid_body",
            correlation_id = %correlation_id,
            error = %rejection,
            "action call body could not be decoded"
        );
        error_response(
            ApplicationError::InvalidRequest(rejection.body_text()).into_interface(&correlation_id),
        )
    })?;

    let action_name = call
        .next_action
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| {
            error_response(
                ApplicationError::InvalidRequest("missing `next_action`".to_string())
                    .into_interface(&correlation_id),
            )
        })?
        .to_string();

    let tracker = call.tracker.unwrap_or_default();
    let sender_id = call.sender_id.or(tracker.sender_id).unwrap_or_else(|| "unknown".to_string());
    let slots = tracker.slots.map(|slots| SlotSnapshot::from_json(&slots)).unwrap_or_default();

    info!(
        event_name = "webhook.action.received",
        correlation_id = %correlation_id,
        sender_id = %sender_id,
        action_name = %action_name,
        engine_version = call.version.as_deref().unwrap_or("unknown"),
        slot_count = slots.len(),
        "action call received"
    );

    let response = state
        .action_runtime
        .dispatch(&action_name, &slots, &correlation_id)
        .await
        .map_err(|error| error_response(error.into_interface(&correlation_id)))?;

    Ok(Json(response))
}

pub async fn list_actions(State(state): State<WebhookState>) -> Json<Vec<ActionDescriptor>> {
    let actions = state
        .action_runtime
        .action_names()
        .into_iter()
        .map(|name| ActionDescriptor { name: name.to_string() })
        .collect();
    Json(actions)
}

fn error_response(error: InterfaceError) -> WebhookError {
    let status = match &error {
        InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        InterfaceError::ActionNotFound { .. } => StatusCode::NOT_FOUND,
    };
    let action_name = match &error {
        InterfaceError::ActionNotFound { action_name, .. } => Some(action_name.clone()),
        _ => None,
    };
    (status, Json(ActionErrorBody { error: error.user_message(), action_name }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{extract::State, http::StatusCode, Json};
    use citabot_agent::runtime::ActionRuntime;
    use citabot_core::registry::AppointmentRegistry;
    use serde_json::json;

    use super::{list_actions, run_action, ActionCall, WebhookState};

    fn state() -> (State<WebhookState>, Arc<AppointmentRegistry>) {
        let registry = Arc::new(AppointmentRegistry::default());
        let action_runtime =
            Arc::new(ActionRuntime::with_appointment_actions(Arc::clone(&registry)));
        (State(WebhookState { action_runtime }), registry)
    }

    fn call(value: serde_json::Value) -> ActionCall {
        serde_json::from_value(value).expect("valid action call")
    }

    #[tokio::test]
    async fn reserve_call_returns_confirmation() {
        let (state, registry) = state();

        let Json(response) = run_action(
            state,
            Ok(Json(call(json!({
                "next_action": "action_reservar_cita",
                "sender_id": "user-1",
                "tracker": {
                    "sender_id": "user-1",
                    "slots": {"nombre": "Ana", "fecha": "2025-12-01", "especialidad": "Cardiología"}
                },
                "domain": {},
                "version": "3.6.0"
            })))),
        )
        .await
        .expect("reserve should succeed");

        assert!(response.events.is_empty());
        assert_eq!(response.responses.len(), 1);
        assert!(response.responses[0].text.contains("Paciente: Ana"));
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn missing_slots_still_answer_with_notice() {
        let (state, registry) = state();

        let Json(response) = run_action(
            state,
            Ok(Json(call(json!({
                "next_action": "action_reservar_cita",
                "tracker": {"slots": {"nombre": null, "fecha": "2025-12-01"}}
            })))),
        )
        .await
        .expect("missing slots are not a transport error");

        assert_eq!(response.responses[0].text, "Faltan datos para completar la reserva.");
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn zero_valued_slot_counts_as_missing() {
        let (state, registry) = state();

        let Json(response) = run_action(
            state,
            Ok(Json(call(json!({
                "next_action": "action_reservar_cita",
                "tracker": {"slots": {"nombre": "Ana", "fecha": 0, "especialidad": "Cardiología"}}
            })))),
        )
        .await
        .expect("missing slots are not a transport error");

        assert_eq!(response.responses[0].text, "Faltan datos para completar la reserva.");
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn unknown_action_is_not_found() {
        let (state, _) = state();

        let result =
            run_action(state, Ok(Json(call(json!({"next_action": "action_saludar"}))))).await;

        let (status, Json(body)) = result.expect_err("unknown action should fail");
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "No registered action found for name 'action_saludar'.");
        assert_eq!(body.action_name.as_deref(), Some("action_saludar"));
    }

    #[tokio::test]
    async fn blank_next_action_is_bad_request() {
        let (state, _) = state();

        let result = run_action(state, Ok(Json(call(json!({"next_action": "  "}))))).await;

        let (status, Json(body)) = result.expect_err("blank action should fail");
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error.contains("next_action"));
        assert_eq!(body.action_name, None);
    }

    #[tokio::test]
    async fn actions_endpoint_lists_sorted_names() {
        let (state, _) = state();

        let Json(actions) = list_actions(state).await;

        let names = actions.into_iter().map(|action| action.name).collect::<Vec<_>>();
        assert_eq!(
            names,
            vec!["action_cancelar_cita", "action_consultar_citas", "action_reservar_cita"]
        );
    }
}
