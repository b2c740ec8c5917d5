use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::{Role, SessionUser};
use shared_models::capability::Capability;

use crate::password::hash_password;
use crate::session::issue_token;

pub struct TestConfig {
    pub session_secret: String,
    pub store_url: String,
    pub store_service_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            session_secret: "test-secret-key-for-session-tokens-must-be-long-enough".to_string(),
            store_url: "http://localhost:54321".to_string(),
            store_service_key: "test-service-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_store_url(store_url: &str) -> Self {
        Self {
            store_url: store_url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            store_url: self.store_url.clone(),
            store_service_key: self.store_service_key.clone(),
            session_secret: self.session_secret.clone(),
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestSessions;

impl TestSessions {
    pub fn staff(permissions: Vec<Capability>) -> SessionUser {
        SessionUser {
            id: Uuid::new_v4(),
            username: "reception".to_string(),
            role: Role::Staff,
            is_admin: false,
            permissions,
        }
    }

    pub fn doctor(permissions: Vec<Capability>) -> SessionUser {
        SessionUser {
            id: Uuid::new_v4(),
            username: "dr.byrne".to_string(),
            role: Role::Doctor,
            is_admin: false,
            permissions,
        }
    }

    pub fn admin() -> SessionUser {
        SessionUser {
            id: Uuid::new_v4(),
            username: "admin".to_string(),
            role: Role::Admin,
            is_admin: true,
            permissions: Capability::ALL.to_vec(),
        }
    }

    pub fn token_for(user: &SessionUser, secret: &str) -> String {
        issue_token(user, secret).expect("test token issuance")
    }
}

/// Canned store rows matching what the data store returns for each table.
pub struct MockStoreRows;

impl MockStoreRows {
    pub fn user_row(id: Uuid, username: &str, password: &str, role: &str) -> serde_json::Value {
        json!({
            "id": id,
            "username": username,
            "password_hash": hash_password(password).expect("test password hash"),
            "role": role,
            "is_admin": role == "admin",
            "is_active": true,
            "permissions": ["patient:read", "appointment:read", "availability:read"],
            "color": if role == "doctor" { json!("#2e7d32") } else { json!(null) },
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn patient_row(id: Uuid) -> serde_json::Value {
        json!({
            "id": id,
            "first_name": "Nora",
            "last_name": "Quinn",
            "date_of_birth": "1987-06-14",
            "phone": "+353851234567",
            "email": "nora.quinn@example.com",
            "notes": null,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn availability_row(id: Uuid, doctor_id: Uuid, is_booked: bool) -> serde_json::Value {
        json!({
            "id": id,
            "doctor_id": doctor_id,
            "start_time": "2024-03-01T09:00:00Z",
            "end_time": "2024-03-01T10:00:00Z",
            "is_booked": is_booked,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn appointment_row(id: Uuid, patient_id: Uuid, doctor_id: Uuid) -> serde_json::Value {
        json!({
            "id": id,
            "patient_id": patient_id,
            "doctor_id": doctor_id,
            "start_time": "2024-03-01T09:00:00Z",
            "end_time": "2024-03-01T10:00:00Z",
            "appointment_type": "consultation",
            "status": "scheduled",
            "notes": null,
            "created_at": Utc::now().to_rfc3339(),
            "updated_at": Utc::now().to_rfc3339()
        })
    }
}
