use std::sync::Arc;

use citabot_agent::runtime::ActionRuntime;
use citabot_core::registry::AppointmentRegistry;

use crate::commands::CommandResult;

pub fn run() -> CommandResult {
    let runtime =
        ActionRuntime::with_appointment_actions(Arc::new(AppointmentRegistry::default()));
    CommandResult::success("actions", runtime.action_names().join("\n"))
}
