use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentDashboard {
    pub enrolled_classes: i64,
    pub submissions: i64,
    pub graded_submissions: i64,
    pub average_grade: Option<f64>,
    pub unread_notifications: i64,
}

/// A class the student is enrolled in, with the owning teacher's name.
#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct CourseEntry {
    pub class_id: i64,
    pub name: String,
    pub semester: String,
    pub slug: String,
    pub teacher_name: String,
    pub enrolled_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct GradeEntry {
    pub submission_id: i64,
    pub exam_id: i64,
    pub exam_title: String,
    pub class_name: String,
    pub grade: f64,
    pub feedback: Option<String>,
    pub graded_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct SubmissionEntry {
    pub id: i64,
    pub exam_id: i64,
    pub exam_title: String,
    pub file_url: String,
    pub comment: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub grade: Option<f64>,
}
