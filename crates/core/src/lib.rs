pub mod clock;
pub mod config;
pub mod domain;
pub mod errors;
pub mod registry;

pub use clock::{Clock, FixedClock, SystemClock};
pub use domain::appointment::{
    Appointment, AppointmentId, AppointmentRequest, CompleteRequest, REGISTERED_AT_FORMAT,
};
pub use errors::{ApplicationError, InterfaceError};
pub use registry::{AppointmentRegistry, CancelOutcome, ReserveOutcome};
