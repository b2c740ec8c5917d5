use std::collections::HashMap;

use uuid::Uuid;

use appointment_cell::models::Appointment;
use availability_cell::models::Availability;

use crate::models::{CalendarEvent, DoctorRef, EventKind, DEFAULT_EVENT_COLOR};

/// Merge slots and appointments into one event list for rendering.
///
/// Pure and order-preserving: availabilities come out first in their input
/// order, then appointments in theirs. Appointments always render with
/// booked styling; slots carry their own flag. Color collisions between
/// doctors are not resolved.
pub fn merge(
    availabilities: &[Availability],
    appointments: &[Appointment],
    doctors: &[DoctorRef],
) -> Vec<CalendarEvent> {
    let colors: HashMap<Uuid, &str> = doctors
        .iter()
        .filter_map(|doctor| {
            doctor
                .color
                .as_deref()
                .map(|color| (doctor.id, color))
        })
        .collect();

    let color_for = |doctor_id: &Uuid| -> String {
        colors
            .get(doctor_id)
            .copied()
            .unwrap_or(DEFAULT_EVENT_COLOR)
            .to_string()
    };

    let mut events = Vec::with_capacity(availabilities.len() + appointments.len());

    for slot in availabilities {
        events.push(CalendarEvent {
            id: slot.id,
            kind: EventKind::Availability,
            doctor_id: slot.doctor_id,
            start_time: slot.start_time,
            end_time: slot.end_time,
            color: color_for(&slot.doctor_id),
            is_booked: slot.is_booked,
        });
    }

    for appointment in appointments {
        events.push(CalendarEvent {
            id: appointment.id,
            kind: EventKind::Appointment,
            doctor_id: appointment.doctor_id,
            start_time: appointment.start_time,
            end_time: appointment.end_time,
            color: color_for(&appointment.doctor_id),
            is_booked: true,
        });
    }

    events
}
