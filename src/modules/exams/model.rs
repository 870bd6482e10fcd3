use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct Exam {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub class_id: i64,
    pub deadline: DateTime<Utc>,
    pub material_url: Option<String>,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateExamDto {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    pub class_id: i64,
    pub deadline: DateTime<Utc>,
    #[validate(url(message = "material_url must be a valid URL"))]
    pub material_url: Option<String>,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct Submission {
    pub id: i64,
    pub exam_id: i64,
    pub student_id: i64,
    pub file_url: String,
    pub comment: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// The artifact is an upload-sink URL obtained from the files endpoint.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateSubmissionDto {
    #[validate(url(message = "file_url must be a valid URL"))]
    pub file_url: String,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct Grading {
    pub id: i64,
    pub submission_id: i64,
    pub student_id: i64,
    pub grade: f64,
    pub feedback: Option<String>,
    pub graded_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct GradeDto {
    #[validate(range(min = 0.0, max = 100.0, message = "grade must be between 0 and 100"))]
    pub grade: f64,
    #[validate(length(max = 2000))]
    pub feedback: Option<String>,
}
