use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::utils::errors::AppError;

/// Acting identity resolved from the session token.
///
/// Every authorization checkpoint matches on this union; handlers never
/// trust a client-supplied id to decide who is acting. Admin capability is
/// a teacher privilege flag, not a separate identity class.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Identity {
    Student {
        id: i64,
        name: String,
        email: String,
    },
    Teacher {
        id: i64,
        name: String,
        email: String,
        is_admin: bool,
    },
}

impl Identity {
    pub fn user_id(&self) -> i64 {
        match self {
            Identity::Student { id, .. } => *id,
            Identity::Teacher { id, .. } => *id,
        }
    }

    pub fn user_type(&self) -> &'static str {
        match self {
            Identity::Student { .. } => "student",
            Identity::Teacher { .. } => "teacher",
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Identity::Student { name, .. } => name,
            Identity::Teacher { name, .. } => name,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            Identity::Student { email, .. } => email,
            Identity::Teacher { email, .. } => email,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Identity::Teacher { is_admin: true, .. })
    }
}

/// Server-side session row keyed by the opaque cookie token.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub token: String,
    pub user_type: String,
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn identity(&self) -> Result<Identity, AppError> {
        match self.user_type.as_str() {
            "student" => Ok(Identity::Student {
                id: self.user_id,
                name: self.name.clone(),
                email: self.email.clone(),
            }),
            "teacher" => Ok(Identity::Teacher {
                id: self.user_id,
                name: self.name.clone(),
                email: self.email.clone(),
                is_admin: self.is_admin,
            }),
            other => Err(AppError::internal(anyhow::anyhow!(
                "Unknown session user type: {}",
                other
            ))),
        }
    }
}

/// Student self-signup. The numeric student id is externally assigned.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SignupDto {
    #[validate(range(min = 1, message = "student_id must be positive"))]
    pub student_id: i64,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct LoginDto {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Student profile as returned to clients. Never carries the password hash.
#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct StudentProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub is_active: bool,
    pub enrollment_date: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}
