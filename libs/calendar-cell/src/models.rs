use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fallback display color when a doctor has none assigned.
pub const DEFAULT_EVENT_COLOR: &str = "#3174ad";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Availability,
    Appointment,
}

/// One renderable calendar entry, derived from a slot or an appointment.
/// Purely presentational; the calendar owns no state of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: Uuid,
    pub kind: EventKind,
    pub doctor_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub color: String,
    pub is_booked: bool,
}

/// The slice of a user row the calendar needs for coloring. Deserialized
/// from the users table; everything else in the row is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct DoctorRef {
    pub id: Uuid,
    pub username: String,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}
