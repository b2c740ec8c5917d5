use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::store::StoreClient;
use shared_models::error::AppError;

use crate::models::{CreatePatientRequest, Patient, UpdatePatientRequest};

pub struct PatientService {
    store: StoreClient,
}

impl PatientService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreClient::new(config),
        }
    }

    pub async fn create_patient(
        &self,
        request: CreatePatientRequest,
    ) -> Result<Patient, AppError> {
        debug!("Creating patient record for {} {}", request.first_name, request.last_name);

        let patient_data = json!({
            "first_name": request.first_name,
            "last_name": request.last_name,
            "date_of_birth": request.date_of_birth,
            "phone": request.phone,
            "email": request.email,
            "notes": request.notes,
            "created_at": Utc::now().to_rfc3339(),
            "updated_at": Utc::now().to_rfc3339()
        });

        let created = self
            .store
            .insert_returning("/patients", patient_data)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let patient: Patient = serde_json::from_value(created)
            .map_err(|e| AppError::Internal(format!("Malformed store row: {}", e)))?;
        debug!("Patient created with ID: {}", patient.id);

        Ok(patient)
    }

    pub async fn get_patient(&self, patient_id: Uuid) -> Result<Patient, AppError> {
        let path = format!("/patients?id=eq.{}", patient_id);
        let rows: Vec<Value> = self
            .store
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("Patient not found".to_string()))?;

        serde_json::from_value(row)
            .map_err(|e| AppError::Internal(format!("Malformed store row: {}", e)))
    }

    pub async fn list_patients(&self) -> Result<Vec<Patient>, AppError> {
        let rows: Vec<Value> = self
            .store
            .request(Method::GET, "/patients?order=last_name.asc", None)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter()
            .map(|row| {
                serde_json::from_value(row)
                    .map_err(|e| AppError::Internal(format!("Malformed store row: {}", e)))
            })
            .collect()
    }

    pub async fn update_patient(
        &self,
        patient_id: Uuid,
        request: UpdatePatientRequest,
    ) -> Result<Patient, AppError> {
        debug!("Updating patient: {}", patient_id);

        let mut update_data = serde_json::Map::new();

        if let Some(first_name) = request.first_name {
            update_data.insert("first_name".to_string(), json!(first_name));
        }
        if let Some(last_name) = request.last_name {
            update_data.insert("last_name".to_string(), json!(last_name));
        }
        if let Some(date_of_birth) = request.date_of_birth {
            update_data.insert("date_of_birth".to_string(), json!(date_of_birth));
        }
        if let Some(phone) = request.phone {
            update_data.insert("phone".to_string(), json!(phone));
        }
        if let Some(email) = request.email {
            update_data.insert("email".to_string(), json!(email));
        }
        if let Some(notes) = request.notes {
            update_data.insert("notes".to_string(), json!(notes));
        }

        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let path = format!("/patients?id=eq.{}", patient_id);
        let updated = self
            .store
            .update_returning(&path, Value::Object(update_data))
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound("Patient not found".to_string()))?;

        serde_json::from_value(updated)
            .map_err(|e| AppError::Internal(format!("Malformed store row: {}", e)))
    }

    pub async fn delete_patient(&self, patient_id: Uuid) -> Result<(), AppError> {
        debug!("Deleting patient: {}", patient_id);

        self.get_patient(patient_id).await?;

        let path = format!("/patients?id=eq.{}", patient_id);
        self.store
            .delete(&path)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
