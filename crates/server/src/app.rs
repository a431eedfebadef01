use std::sync::Arc;

use axum::Router;
use citabot_agent::runtime::ActionRuntime;

use crate::{health, webhook};

pub fn router(action_runtime: Arc<ActionRuntime>) -> Router {
    Router::new()
        .merge(health::router(Arc::clone(&action_runtime)))
        .merge(webhook::router(action_runtime))
}
