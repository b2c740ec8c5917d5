use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::auth::{Role, UserAccount};
use shared_models::capability::Capability;

/// User as returned by the admin API. The stored record's password hash
/// never serializes out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
    pub is_admin: bool,
    pub is_active: bool,
    pub permissions: Vec<Capability>,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserAccount> for UserResponse {
    fn from(account: UserAccount) -> Self {
        Self {
            id: account.id,
            username: account.username,
            role: account.role,
            is_admin: account.is_admin,
            is_active: account.is_active,
            permissions: account.permissions,
            color: account.color,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    /// Omitted: the server generates one and returns it once.
    pub password: Option<String>,
    pub role: Role,
    pub is_admin: Option<bool>,
    pub permissions: Option<Vec<Capability>>,
    pub color: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    pub user: UserResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserRequest {
    pub password: Option<String>,
    pub role: Option<Role>,
    pub is_admin: Option<bool>,
    pub is_active: Option<bool>,
    pub permissions: Option<Vec<Capability>>,
    pub color: Option<String>,
}
