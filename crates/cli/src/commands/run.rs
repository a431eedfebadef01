use std::sync::Arc;

use citabot_agent::runtime::{new_correlation_id, ActionRuntime};
use citabot_agent::slots::SlotSnapshot;
use citabot_core::errors::ApplicationError;
use citabot_core::registry::AppointmentRegistry;

use crate::commands::{CommandResult, EXIT_INVALID_ARGUMENT, EXIT_UNKNOWN_ACTION};

/// Dispatches `action_name` once, with `slot_args` given as `key=value` pairs.
///
/// Every invocation gets its own empty registry, exactly like a freshly started server.
pub fn run(action_name: &str, slot_args: &[String]) -> CommandResult {
    let slots = match parse_slots(slot_args) {
        Ok(slots) => slots,
        Err(message) => {
            return CommandResult::failure("run", "invalid_slot", message, EXIT_INVALID_ARGUMENT)
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "run",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                EXIT_INVALID_ARGUMENT,
            )
        }
    };

    let actions =
        ActionRuntime::with_appointment_actions(Arc::new(AppointmentRegistry::default()));
    let correlation_id = new_correlation_id();
    let result =
        runtime.block_on(async { actions.dispatch(action_name, &slots, &correlation_id).await });

    match result {
        Ok(response) => {
            let text = response
                .responses
                .into_iter()
                .map(|message| message.text)
                .collect::<Vec<_>>()
                .join("\n");
            CommandResult::success("run", text)
        }
        Err(error @ ApplicationError::UnknownAction(_)) => {
            CommandResult::failure("run", "unknown_action", error.to_string(), EXIT_UNKNOWN_ACTION)
        }
        Err(error) => {
            CommandResult::failure("run", "dispatch", error.to_string(), EXIT_INVALID_ARGUMENT)
        }
    }
}

fn parse_slots(slot_args: &[String]) -> Result<SlotSnapshot, String> {
    slot_args
        .iter()
        .map(|arg| match arg.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.to_string()))
            }
            _ => Err(format!("slot `{arg}` must be written as key=value")),
        })
        .collect()
}
