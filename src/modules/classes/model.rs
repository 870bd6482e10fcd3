use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// A course section owned by one teacher. The join secret hash is stored in
/// a separate column that is never selected into this struct.
#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct Class {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub semester: String,
    pub slug: String,
    pub teacher_id: i64,
    pub max_students: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateClassDto {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub semester: String,
    #[validate(length(min = 4, message = "class password must be at least 4 characters"))]
    pub password: String,
    #[validate(range(min = 1, message = "max_students must be at least 1"))]
    pub max_students: i64,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateClassDto {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub semester: Option<String>,
    #[validate(range(min = 1))]
    pub max_students: Option<i64>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct EnrollDto {
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub class_id: i64,
    pub enrolled_at: DateTime<Utc>,
}

/// One student on a class roster.
#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct RosterEntry {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub enrolled_at: DateTime<Utc>,
}
