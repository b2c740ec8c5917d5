use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::capability::Capability;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Doctor,
    Staff,
    Admin,
}

/// User record as persisted in the data store. The password hash never
/// leaves the server; response types skip it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub is_admin: bool,
    pub is_active: bool,
    pub permissions: Vec<Capability>,
    /// Calendar display color, only meaningful for doctors.
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserAccount {
    pub fn to_session_user(&self) -> SessionUser {
        SessionUser {
            id: self.id,
            username: self.username.clone(),
            role: self.role,
            is_admin: self.is_admin,
            permissions: self.permissions.clone(),
        }
    }
}

/// The authenticated identity attached to a request by the auth middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
    pub is_admin: bool,
    pub permissions: Vec<Capability>,
}

impl SessionUser {
    pub fn has(&self, capability: Capability) -> bool {
        self.permissions.contains(&capability)
    }

    /// Capability check for permission-gated routes. The middleware has
    /// already rejected unauthenticated requests with 401, so this only
    /// ever produces 403.
    pub fn require(&self, capability: Capability) -> Result<(), AppError> {
        if self.has(capability) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "Missing permission: {}",
                capability
            )))
        }
    }

    /// Admin-only routes use the is_admin override instead of a capability.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AppError::Forbidden("Admin access required".to_string()))
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: Uuid,
    pub username: String,
    pub role: Role,
    pub is_admin: bool,
    pub permissions: Vec<Capability>,
    pub iat: Option<u64>,
    pub exp: Option<u64>,
}
