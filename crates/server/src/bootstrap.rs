use std::sync::Arc;

use citabot_agent::runtime::ActionRuntime;
use citabot_core::config::AppConfig;
use citabot_core::registry::AppointmentRegistry;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub appointments: Arc<AppointmentRegistry>,
    pub action_runtime: Arc<ActionRuntime>,
}

pub fn bootstrap_with_config(config: AppConfig) -> Application {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );
    let appointments = Arc::new(AppointmentRegistry::default());
    let action_runtime =
        Arc::new(ActionRuntime::with_appointment_actions(Arc::clone(&appointments)));

    info!(
        event_name = "system.bootstrap.actions_registered",
        correlation_id = "bootstrap",
        action_count = action_runtime.action_names().len(),
        "appointment actions registered"
    );

    Application { config, appointments, action_runtime }
}
