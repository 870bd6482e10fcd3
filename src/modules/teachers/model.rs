use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct TeacherDashboard {
    pub classes: i64,
    pub students: i64,
    pub exams: i64,
    pub ungraded_submissions: i64,
    pub unread_notifications: i64,
}

/// A student enrolled in one of the teacher's classes.
#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct TaughtStudent {
    pub student_id: i64,
    pub name: String,
    pub email: String,
    pub class_id: i64,
    pub class_name: String,
    pub enrolled_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct ClassAnalytics {
    pub class_id: i64,
    pub class_name: String,
    pub enrolled: i64,
    pub max_students: i64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct ExamAnalytics {
    pub exam_id: i64,
    pub exam_title: String,
    pub class_id: i64,
    pub submissions: i64,
    pub graded: i64,
    pub average_grade: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TeacherAnalytics {
    pub classes: Vec<ClassAnalytics>,
    pub exams: Vec<ExamAnalytics>,
}
