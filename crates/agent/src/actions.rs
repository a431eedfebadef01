use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use citabot_core::domain::appointment::AppointmentRequest;
use citabot_core::registry::{AppointmentRegistry, CancelOutcome, ReserveOutcome};

use crate::dispatch::MessageSink;
use crate::replies;
use crate::slots::{SlotStore, SLOT_DATE, SLOT_SPECIALTY, SLOT_SUBJECT_NAME};

pub const ACTION_RESERVE: &str = "action_reservar_cita";
pub const ACTION_CANCEL: &str = "action_cancelar_cita";
pub const ACTION_LIST: &str = "action_consultar_citas";

/// A custom action the dialogue engine can trigger by name.
#[async_trait]
pub trait Action: Send + Sync {
    fn name(&self) -> &'static str;
    async fn run(&self, slots: &dyn SlotStore, sink: &mut dyn MessageSink);
}

pub struct ReserveAppointmentAction {
    registry: Arc<AppointmentRegistry>,
}

impl ReserveAppointmentAction {
    pub fn new(registry: Arc<AppointmentRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl Action for ReserveAppointmentAction {
    fn name(&self) -> &'static str {
        ACTION_RESERVE
    }

    async fn run(&self, slots: &dyn SlotStore, sink: &mut dyn MessageSink) {
        let request = AppointmentRequest::new(
            slots.get_slot(SLOT_SUBJECT_NAME),
            slots.get_slot(SLOT_DATE),
            slots.get_slot(SLOT_SPECIALTY),
        );

        let text = match self.registry.reserve(request) {
            ReserveOutcome::Reserved(appointment) => replies::reserved(&appointment),
            ReserveOutcome::MissingData => replies::MISSING_DATA.to_string(),
        };
        sink.emit(text);
    }
}

pub struct CancelAppointmentAction {
    registry: Arc<AppointmentRegistry>,
}

impl CancelAppointmentAction {
    pub fn new(registry: Arc<AppointmentRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl Action for CancelAppointmentAction {
    fn name(&self) -> &'static str {
        ACTION_CANCEL
    }

    async fn run(&self, _slots: &dyn SlotStore, sink: &mut dyn MessageSink) {
        let text = match self.registry.cancel_latest() {
            CancelOutcome::Cancelled(appointment) => replies::cancelled(&appointment),
            CancelOutcome::NothingToCancel => replies::NOTHING_TO_CANCEL.to_string(),
        };
        sink.emit(text);
    }
}

pub struct ListAppointmentsAction {
    registry: Arc<AppointmentRegistry>,
}

impl ListAppointmentsAction {
    pub fn new(registry: Arc<AppointmentRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl Action for ListAppointmentsAction {
    fn name(&self) -> &'static str {
        ACTION_LIST
    }

    async fn run(&self, _slots: &dyn SlotStore, sink: &mut dyn MessageSink) {
        sink.emit(replies::listing(&self.registry.list_all()));
    }
}

#[derive(Default)]
pub struct ActionRegistry {
    actions: HashMap<String, Box<dyn Action>>,
}

impl ActionRegistry {
    pub fn register<A>(&mut self, action: A)
    where
        A: Action + 'static,
    {
        self.actions.insert(action.name().to_string(), Box::new(action));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Action> {
        self.actions.get(name).map(|action| action.as_ref())
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names = self.actions.keys().map(String::as_str).collect::<Vec<_>>();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
