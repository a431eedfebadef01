use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const REGISTERED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AppointmentId(pub u64);

impl fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub subject_name: String,
    pub date: String,
    pub specialty: String,
    pub registered_at: NaiveDateTime,
}

impl Appointment {
    pub fn registered_at_display(&self) -> String {
        self.registered_at.format(REGISTERED_AT_FORMAT).to_string()
    }
}

/// Raw reservation input as read from the conversation slots.
///
/// Any field may be absent. `date` is free-form text and is never parsed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppointmentRequest {
    pub subject_name: Option<String>,
    pub date: Option<String>,
    pub specialty: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompleteRequest {
    pub subject_name: String,
    pub date: String,
    pub specialty: String,
}

impl AppointmentRequest {
    pub fn new(
        subject_name: Option<String>,
        date: Option<String>,
        specialty: Option<String>,
    ) -> Self {
        Self { subject_name, date, specialty }
    }

    /// Returns the three values only when every one is present and non-empty.
    pub fn into_complete(self) -> Option<CompleteRequest> {
        let subject_name = self.subject_name.filter(|value| !value.is_empty())?;
        let date = self.date.filter(|value| !value.is_empty())?;
        let specialty = self.specialty.filter(|value| !value.is_empty())?;
        Some(CompleteRequest { subject_name, date, specialty })
    }
}
