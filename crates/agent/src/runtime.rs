use std::sync::Arc;

use citabot_core::errors::ApplicationError;
use citabot_core::registry::AppointmentRegistry;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::actions::{
    ActionRegistry, CancelAppointmentAction, ListAppointmentsAction, ReserveAppointmentAction,
};
use crate::dispatch::{CollectingDispatcher, OutboundMessage};
use crate::slots::SlotStore;

/// What the dialogue engine gets back after an action ran.
///
/// Appointment actions never add tracker events, so `events` is always empty today.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub events: Vec<Value>,
    pub responses: Vec<OutboundMessage>,
}

#[derive(Default)]
pub struct ActionRuntime {
    actions: ActionRegistry,
}

impl ActionRuntime {
    pub fn new(actions: ActionRegistry) -> Self {
        Self { actions }
    }

    pub fn with_appointment_actions(registry: Arc<AppointmentRegistry>) -> Self {
        let mut actions = ActionRegistry::default();
        actions.register(ReserveAppointmentAction::new(Arc::clone(&registry)));
        actions.register(CancelAppointmentAction::new(Arc::clone(&registry)));
        actions.register(ListAppointmentsAction::new(registry));
        Self::new(actions)
    }

    pub fn action_names(&self) -> Vec<&str> {
        self.actions.names()
    }

    pub async fn dispatch(
        &self,
        action_name: &str,
        slots: &dyn SlotStore,
        correlation_id: &str,
    ) -> Result<ActionResponse, ApplicationError> {
        let Some(action) = self.actions.get(action_name) else {
            warn!(
                event_name = "agent.dispatch.unknown_action",
                correlation_id,
                action_name,
                "no registered action for requested name"
            );
            return Err(ApplicationError::UnknownAction(action_name.to_string()));
        };

        let mut dispatcher = CollectingDispatcher::new();
        action.run(slots, &mut dispatcher).await;

        let responses = dispatcher.into_messages();
        info!(
            event_name = "agent.dispatch.completed",
            correlation_id,
            action_name,
            response_count = responses.len(),
            "action executed"
        );
        Ok(ActionResponse { events: Vec::new(), responses })
    }
}

pub fn new_correlation_id() -> String {
    Uuid::new_v4().to_string()
}
