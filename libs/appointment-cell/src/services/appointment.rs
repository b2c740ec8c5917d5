use chrono::{DateTime, Duration, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::store::StoreClient;
use shared_models::error::AppError;
use shared_utils::time::parse_form_datetime;

use crate::models::{
    Appointment, AppointmentStatus, AppointmentType, CreateAppointmentRequest,
    UpdateAppointmentRequest,
};

pub struct AppointmentService {
    store: StoreClient,
}

impl AppointmentService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreClient::new(config),
        }
    }

    /// Create an appointment. Booking is advisory: no check that the
    /// chosen window is actually free, last write wins.
    pub async fn create_appointment(
        &self,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, AppError> {
        let patient_id = request
            .patient_id
            .ok_or_else(|| AppError::ValidationError("patient_id is required".to_string()))?;
        let doctor_id = request
            .doctor_id
            .ok_or_else(|| AppError::ValidationError("doctor_id is required".to_string()))?;

        let start_time = parse_form_datetime(&request.start_time)
            .map_err(AppError::ValidationError)?;
        let end_time = match request.end_time {
            Some(raw) => parse_form_datetime(&raw).map_err(AppError::ValidationError)?,
            None => start_time + Duration::hours(1),
        };

        let appointment_type = request
            .appointment_type
            .unwrap_or(AppointmentType::Consultation);

        debug!(
            "Creating {} appointment for patient {} with doctor {}",
            appointment_type, patient_id, doctor_id
        );

        let appointment_data = json!({
            "patient_id": patient_id,
            "doctor_id": doctor_id,
            "start_time": start_time.to_rfc3339(),
            "end_time": end_time.to_rfc3339(),
            "appointment_type": appointment_type,
            "status": AppointmentStatus::Scheduled,
            "notes": request.notes,
            "created_at": Utc::now().to_rfc3339(),
            "updated_at": Utc::now().to_rfc3339()
        });

        let created = self
            .store
            .insert_returning("/appointments", appointment_data)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let appointment: Appointment = serde_json::from_value(created)
            .map_err(|e| AppError::Internal(format!("Malformed store row: {}", e)))?;
        debug!("Appointment created with ID: {}", appointment.id);

        // Mark any availability slots the appointment lands in as booked.
        // Best-effort and non-atomic: a failure here leaves the slot
        // unbooked but never fails the create.
        if let Err(e) = self
            .flag_slots_booked(doctor_id, start_time, end_time)
            .await
        {
            warn!(
                "Failed to flag availability as booked for doctor {}: {}",
                doctor_id, e
            );
        }

        Ok(appointment)
    }

    pub async fn get_appointment(&self, appointment_id: Uuid) -> Result<Appointment, AppError> {
        let path = format!("/appointments?id=eq.{}", appointment_id);
        let rows: Vec<Value> = self
            .store
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("Appointment not found".to_string()))?;

        serde_json::from_value(row)
            .map_err(|e| AppError::Internal(format!("Malformed store row: {}", e)))
    }

    pub async fn list_appointments(
        &self,
        doctor_id: Option<Uuid>,
        patient_id: Option<Uuid>,
    ) -> Result<Vec<Appointment>, AppError> {
        let mut path = "/appointments?order=start_time.asc".to_string();
        if let Some(id) = doctor_id {
            path.push_str(&format!("&doctor_id=eq.{}", id));
        }
        if let Some(id) = patient_id {
            path.push_str(&format!("&patient_id=eq.{}", id));
        }

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

    /// Partial update. Status moves freely between the three states; time
    /// fields are parsed from form strings when present and an omitted end
    /// time is left exactly as it was.
    pub async fn update_appointment(
        &self,
        appointment_id: Uuid,
        request: UpdateAppointmentRequest,
    ) -> Result<Appointment, AppError> {
        debug!("Updating appointment: {}", appointment_id);

        let mut update_data = serde_json::Map::new();

        if let Some(patient_id) = request.patient_id {
            update_data.insert("patient_id".to_string(), json!(patient_id));
        }
        if let Some(doctor_id) = request.doctor_id {
            update_data.insert("doctor_id".to_string(), json!(doctor_id));
        }
        if let Some(raw) = request.start_time {
            let start_time = parse_form_datetime(&raw).map_err(AppError::ValidationError)?;
            update_data.insert("start_time".to_string(), json!(start_time.to_rfc3339()));
        }
        if let Some(raw) = request.end_time {
            let end_time = parse_form_datetime(&raw).map_err(AppError::ValidationError)?;
            update_data.insert("end_time".to_string(), json!(end_time.to_rfc3339()));
        }
        if let Some(appointment_type) = request.appointment_type {
            update_data.insert("appointment_type".to_string(), json!(appointment_type));
        }
        if let Some(status) = request.status {
            update_data.insert("status".to_string(), json!(status));
        }
        if let Some(notes) = request.notes {
            update_data.insert("notes".to_string(), json!(notes));
        }

        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let path = format!("/appointments?id=eq.{}", appointment_id);
        let updated = self
            .store
            .update_returning(&path, Value::Object(update_data))
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound("Appointment not found".to_string()))?;

        serde_json::from_value(updated)
            .map_err(|e| AppError::Internal(format!("Malformed store row: {}", e)))
    }

    pub async fn delete_appointment(&self, appointment_id: Uuid) -> Result<(), AppError> {
        debug!("Deleting appointment: {}", appointment_id);

        // Ensure a 404 for an unknown id rather than a silent no-op delete.
        self.get_appointment(appointment_id).await?;

        let path = format!("/appointments?id=eq.{}", appointment_id);
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
    ) -> Result<Vec<Appointment>, AppError> {
        let path = format!(
            "/appointments?start_time=gte.{}&start_time=lte.{}&order=start_time.asc",
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

    async fn flag_slots_booked(
        &self,
        doctor_id: Uuid,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        // Overlap filter: slot.start < appointment.end AND slot.end > appointment.start
        let path = format!(
            "/availability?doctor_id=eq.{}&is_booked=eq.false&start_time=lt.{}&end_time=gt.{}",
            doctor_id,
            end_time.to_rfc3339(),
            start_time.to_rfc3339()
        );

        let flagged = self
            .store
            .update_returning(
                &path,
                json!({
                    "is_booked": true,
                    "updated_at": Utc::now().to_rfc3339()
                }),
            )
            .await?;

        if flagged.is_some() {
            debug!("Flagged availability as booked for doctor {}", doctor_id);
        }

        Ok(())
    }
}
