use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::store::StoreClient;
use shared_models::auth::UserAccount;
use shared_models::error::AppError;
use shared_utils::password::{generate_password, hash_password};

use crate::models::{CreateUserRequest, CreateUserResponse, UpdateUserRequest, UserResponse};

const GENERATED_PASSWORD_LENGTH: usize = 16;

pub struct UserAdminService {
    store: StoreClient,
}

impl UserAdminService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreClient::new(config),
        }
    }

    pub async fn create_user(
        &self,
        request: CreateUserRequest,
    ) -> Result<CreateUserResponse, AppError> {
        if request.username.trim().is_empty() {
            return Err(AppError::ValidationError("username is required".to_string()));
        }

        debug!("Creating user account: {}", request.username);

        // Usernames are unique; duplicate creates are a 409.
        let existing_path = format!("/users?username=eq.{}", request.username);
        let existing: Vec<Value> = self
            .store
            .request(Method::GET, &existing_path, None)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if !existing.is_empty() {
            return Err(AppError::Conflict(format!(
                "Username already exists: {}",
                request.username
            )));
        }

        let (password, generated_password) = match request.password {
            Some(password) => (password, None),
            None => {
                let generated = generate_password(GENERATED_PASSWORD_LENGTH);
                (generated.clone(), Some(generated))
            }
        };

        let password_hash = hash_password(&password)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;

        let user_data = json!({
            "username": request.username,
            "password_hash": password_hash,
            "role": request.role,
            "is_admin": request.is_admin.unwrap_or(false),
            "is_active": true,
            "permissions": request.permissions.unwrap_or_default(),
            "color": request.color,
            "created_at": Utc::now().to_rfc3339(),
            "updated_at": Utc::now().to_rfc3339()
        });

        let created = self
            .store
            .insert_returning("/users", user_data)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let account: UserAccount = serde_json::from_value(created)
            .map_err(|e| AppError::Internal(format!("Malformed store row: {}", e)))?;
        debug!("User created with ID: {}", account.id);

        Ok(CreateUserResponse {
            user: account.into(),
            generated_password,
        })
    }

    pub async fn list_users(&self) -> Result<Vec<UserResponse>, AppError> {
        let rows: Vec<Value> = self
            .store
            .request(Method::GET, "/users?order=username.asc", None)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter()
            .map(|row| {
                serde_json::from_value::<UserAccount>(row)
                    .map(UserResponse::from)
                    .map_err(|e| AppError::Internal(format!("Malformed store row: {}", e)))
            })
            .collect()
    }

    pub async fn update_user(
        &self,
        user_id: Uuid,
        request: UpdateUserRequest,
    ) -> Result<UserResponse, AppError> {
        debug!("Updating user: {}", user_id);

        let mut update_data = serde_json::Map::new();

        if let Some(password) = request.password {
            let password_hash = hash_password(&password)
                .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
            update_data.insert("password_hash".to_string(), json!(password_hash));
        }
        if let Some(role) = request.role {
            update_data.insert("role".to_string(), json!(role));
        }
        if let Some(is_admin) = request.is_admin {
            update_data.insert("is_admin".to_string(), json!(is_admin));
        }
        if let Some(is_active) = request.is_active {
            update_data.insert("is_active".to_string(), json!(is_active));
        }
        if let Some(permissions) = request.permissions {
            update_data.insert("permissions".to_string(), json!(permissions));
        }
        if let Some(color) = request.color {
            update_data.insert("color".to_string(), json!(color));
        }

        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let path = format!("/users?id=eq.{}", user_id);
        let updated = self
            .store
            .update_returning(&path, Value::Object(update_data))
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let account: UserAccount = serde_json::from_value(updated)
            .map_err(|e| AppError::Internal(format!("Malformed store row: {}", e)))?;

        Ok(account.into())
    }

    pub async fn delete_user(&self, user_id: Uuid) -> Result<(), AppError> {
        debug!("Deleting user: {}", user_id);

        let path = format!("/users?id=eq.{}", user_id);
        let rows: Vec<Value> = self
            .store
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if rows.is_empty() {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        self.store
            .delete(&path)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
