use chrono::{DateTime, Duration, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::store::StoreClient;
use shared_models::error::AppError;
use shared_utils::time::parse_form_datetime;

use crate::models::{Availability, CreateAvailabilityRequest, UpdateAvailabilityRequest};

pub struct AvailabilityService {
    store: StoreClient,
}

impl AvailabilityService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreClient::new(config),
        }
    }

    /// Create a new slot, unbooked. End time defaults to start + 1 hour
    /// when the form omits it.
    pub async fn create_availability(
        &self,
        request: CreateAvailabilityRequest,
    ) -> Result<Availability, AppError> {
        let doctor_id = request
            .doctor_id
            .ok_or_else(|| AppError::ValidationError("doctor_id is required".to_string()))?;

        let start_time = parse_form_datetime(&request.start_time)
            .map_err(AppError::ValidationError)?;

        let end_time = match request.end_time {
            Some(raw) => parse_form_datetime(&raw).map_err(AppError::ValidationError)?,
            None => start_time + Duration::hours(1),
        };

        debug!("Creating availability for doctor: {}", doctor_id);

        let slot_data = json!({
            "doctor_id": doctor_id,
            "start_time": start_time.to_rfc3339(),
            "end_time": end_time.to_rfc3339(),
            "is_booked": false,
            "created_at": Utc::now().to_rfc3339(),
            "updated_at": Utc::now().to_rfc3339()
        });

        let created = self
            .store
            .insert_returning("/availability", slot_data)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let availability: Availability = serde_json::from_value(created)
            .map_err(|e| AppError::Internal(format!("Malformed store row: {}", e)))?;
        debug!("Availability created with ID: {}", availability.id);

        Ok(availability)
    }

    /// Mutate slot times (drag-reschedule). Only fields present in the
    /// request are touched; an omitted start time never resets the end.
    pub async fn update_availability(
        &self,
        availability_id: Uuid,
        request: UpdateAvailabilityRequest,
    ) -> Result<Availability, AppError> {
        debug!("Updating availability: {}", availability_id);

        let mut update_data = serde_json::Map::new();

        if let Some(raw) = request.start_time {
            let start_time = parse_form_datetime(&raw).map_err(AppError::ValidationError)?;
            update_data.insert("start_time".to_string(), json!(start_time.to_rfc3339()));
        }
        if let Some(raw) = request.end_time {
            let end_time = parse_form_datetime(&raw).map_err(AppError::ValidationError)?;
            update_data.insert("end_time".to_string(), json!(end_time.to_rfc3339()));
        }

        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let path = format!("/availability?id=eq.{}", availability_id);
        let updated = self
            .store
            .update_returning(&path, Value::Object(update_data))
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound("Availability not found".to_string()))?;

        let availability: Availability = serde_json::from_value(updated)
            .map_err(|e| AppError::Internal(format!("Malformed store row: {}", e)))?;

        Ok(availability)
    }

    pub async fn get_availability(&self, availability_id: Uuid) -> Result<Availability, AppError> {
        let path = format!("/availability?id=eq.{}", availability_id);
        let rows: Vec<Value> = self
            .store
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("Availability not found".to_string()))?;

        serde_json::from_value(row)
            .map_err(|e| AppError::Internal(format!("Malformed store row: {}", e)))
    }

    pub async fn list_availability(
        &self,
        doctor_id: Option<Uuid>,
    ) -> Result<Vec<Availability>, AppError> {
        let path = match doctor_id {
            Some(id) => format!("/availability?doctor_id=eq.{}&order=start_time.asc", id),
            None => "/availability?order=start_time.asc".to_string(),
        };

        let rows: Vec<Value> = self
            .store
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter()
            .map(|row| {
                serde_json::from_value(row)
                    .map_err(|e| AppError::Internal(format!("Malformed store row: {}", e)))
            })
            .collect()
    }

    /// Booked slots stay on the calendar until the booking is resolved by
    /// hand, so deleting one is rejected.
    pub async fn delete_availability(&self, availability_id: Uuid) -> Result<(), AppError> {
        debug!("Deleting availability: {}", availability_id);

        let slot = self.get_availability(availability_id).await?;
        if slot.is_booked {
            return Err(AppError::Conflict(
                "Cannot delete a booked availability slot".to_string(),
            ));
        }

        let path = format!("/availability?id=eq.{}", availability_id);
        self.store
            .delete(&path)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Windowed read used by the calendar view.
    pub async fn list_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Availability>, AppError> {
        let path = format!(
            "/availability?start_time=gte.{}&start_time=lte.{}&order=start_time.asc",
            from.to_rfc3339(),
            to.to_rfc3339()
        );

        let rows: Vec<Value> = self
            .store
            .request(Method::GET, &path, None)
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
