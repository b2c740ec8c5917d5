use chrono::{DateTime, Duration, Utc};
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use appointment_cell::services::AppointmentService;
use availability_cell::services::AvailabilityService;
use shared_config::AppConfig;
use shared_database::store::StoreClient;
use shared_models::error::AppError;

use crate::models::{CalendarEvent, DoctorRef};
use crate::services::merge::merge;

pub struct CalendarService {
    availability: AvailabilityService,
    appointments: AppointmentService,
    store: StoreClient,
}

impl CalendarService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            availability: AvailabilityService::new(config),
            appointments: AppointmentService::new(config),
            store: StoreClient::new(config),
        }
    }

    /// Fetch the three source lists for the window and merge them. The
    /// result is derived per request; nothing is cached server-side.
    pub async fn events_between(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<CalendarEvent>, AppError> {
        let from = from.unwrap_or_else(|| Utc::now() - Duration::days(30));
        let to = to.unwrap_or_else(|| Utc::now() + Duration::days(60));

        debug!("Building calendar events from {} to {}", from, to);

        let availabilities = self.availability.list_between(from, to).await?;
        let appointments = self.appointments.list_between(from, to).await?;
        let doctors = self.list_doctors().await?;

        Ok(merge(&availabilities, &appointments, &doctors))
    }

    async fn list_doctors(&self) -> Result<Vec<DoctorRef>, AppError> {
        let rows: Vec<Value> = self
            .store
            .request(Method::GET, "/users?role=eq.doctor", None)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter()
            .map(|row| {
                serde_json::from_value(row)
                    .map_err(|e| AppError::Internal(format!("Malformed store row: {}", e)))
            })
            .collect()
    }
}
