use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A doctor-specific bookable time window ("slot").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Availability {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_booked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Times arrive as local-form strings from the scheduling UI and are
/// converted to absolute timestamps before persistence. A missing end
/// time defaults to start + 1 hour (the creation-form default).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAvailabilityRequest {
    pub doctor_id: Option<Uuid>,
    pub start_time: String,
    pub end_time: Option<String>,
}

/// Partial time mutation, as issued by drag-and-drop rescheduling. An
/// omitted field is left untouched; in particular the end time is never
/// recomputed from the start time here.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAvailabilityRequest {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityListQuery {
    pub doctor_id: Option<Uuid>,
}
