//! In-memory appointment registry.
//!
//! The registry is an ordered list of [`Appointment`]s kept for the lifetime of the
//! process. Nothing is persisted; a restart starts from an empty registry.
//!
//! All access goes through a single mutex, so concurrent conversations see a
//! serialized history. Ids come from a counter that only ever grows: cancelling
//! an appointment never frees its id for reuse.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::domain::appointment::{Appointment, AppointmentId, AppointmentRequest};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReserveOutcome {
    Reserved(Appointment),
    MissingData,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CancelOutcome {
    Cancelled(Appointment),
    NothingToCancel,
}

#[derive(Debug)]
struct RegistryState {
    appointments: Vec<Appointment>,
    next_id: u64,
}

impl Default for RegistryState {
    fn default() -> Self {
        Self { appointments: Vec::new(), next_id: 1 }
    }
}

pub struct AppointmentRegistry {
    state: Mutex<RegistryState>,
    clock: Arc<dyn Clock>,
}

impl Default for AppointmentRegistry {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl std::fmt::Debug for AppointmentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("AppointmentRegistry")
            .field("len", &state.appointments.len())
            .field("next_id", &state.next_id)
            .finish()
    }
}

impl AppointmentRegistry {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { state: Mutex::new(RegistryState::default()), clock }
    }

    /// Appends a new appointment when every field of `request` is present.
    ///
    /// An incomplete request leaves the registry untouched.
    pub fn reserve(&self, request: AppointmentRequest) -> ReserveOutcome {
        let Some(complete) = request.into_complete() else {
            debug!(
                event_name = "registry.reserve.missing_data",
                "reservation skipped because required data is missing"
            );
            return ReserveOutcome::MissingData;
        };

        let mut state = self.lock();
        let id = AppointmentId(state.next_id);
        state.next_id += 1;

        let appointment = Appointment {
            id,
            subject_name: complete.subject_name,
            date: complete.date,
            specialty: complete.specialty,
            registered_at: self.clock.now(),
        };
        state.appointments.push(appointment.clone());

        info!(
            event_name = "registry.reserve.created",
            appointment_id = id.0,
            registry_len = state.appointments.len(),
            "appointment reserved"
        );
        ReserveOutcome::Reserved(appointment)
    }

    /// Removes the most recently registered appointment.
    pub fn cancel_latest(&self) -> CancelOutcome {
        let mut state = self.lock();
        match state.appointments.pop() {
            Some(appointment) => {
                info!(
                    event_name = "registry.cancel.removed",
                    appointment_id = appointment.id.0,
                    registry_len = state.appointments.len(),
                    "appointment cancelled"
                );
                CancelOutcome::Cancelled(appointment)
            }
            None => {
                debug!(event_name = "registry.cancel.empty", "no appointment to cancel");
                CancelOutcome::NothingToCancel
            }
        }
    }

    /// Snapshot of every appointment in insertion order.
    pub fn list_all(&self) -> Vec<Appointment> {
        self.lock().appointments.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().appointments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().appointments.is_empty()
    }

    // No operation can leave the state half-written, so a poisoned lock is still consistent.
    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
