//! User-facing reply texts.
//!
//! The wording is part of the contract with the dialogue definitions upstream, so
//! these functions are the single place where it is spelled out.

use std::fmt::Write;

use citabot_core::domain::appointment::Appointment;

pub const MISSING_DATA: &str = "Faltan datos para completar la reserva.";
pub const NOTHING_TO_CANCEL: &str = "No hay citas para cancelar.";
pub const NO_APPOINTMENTS: &str = "No hay citas registradas actualmente.";
const LISTING_HEADER: &str = "Citas registradas:\n\n";

pub fn reserved(appointment: &Appointment) -> String {
    format!(
        "Cita reservada exitosamente:\nID: {}\nPaciente: {}\nEspecialidad: {}\nFecha: {}",
        appointment.id, appointment.subject_name, appointment.specialty, appointment.date
    )
}

pub fn cancelled(appointment: &Appointment) -> String {
    format!("Cita cancelada:\nID: {}\nPaciente: {}", appointment.id, appointment.subject_name)
}

pub fn listing(appointments: &[Appointment]) -> String {
    if appointments.is_empty() {
        return NO_APPOINTMENTS.to_string();
    }

    let mut message = String::from(LISTING_HEADER);
    for appointment in appointments {
        // Writing into a String cannot fail.
        let _ = write!(
            message,
            "ID: {}\nPaciente: {}\nEspecialidad: {}\nFecha: {}\nRegistrada: {}\n\n",
            appointment.id,
            appointment.subject_name,
            appointment.specialty,
            appointment.date,
            appointment.registered_at_display()
        );
    }
    message
}
