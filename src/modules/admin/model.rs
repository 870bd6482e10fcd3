use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct StudentRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub is_active: bool,
    pub enrollment_date: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct TeacherRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub department: String,
    pub is_admin: bool,
    pub is_active: bool,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateStudentDto {
    #[validate(range(min = 1))]
    pub student_id: i64,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateTeacherDto {
    #[validate(range(min = 1))]
    pub teacher_id: i64,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
    pub department: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateStatusDto {
    pub is_active: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardCounts {
    pub students: i64,
    pub teachers: i64,
    pub classes: i64,
    pub exams: i64,
    pub submissions: i64,
    pub enrollments: i64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct ClassEnrollmentStat {
    pub class_id: i64,
    pub class_name: String,
    pub enrolled: i64,
    pub max_students: i64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct ClassGradeStat {
    pub class_id: i64,
    pub class_name: String,
    pub graded_submissions: i64,
    pub average_grade: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlatformStats {
    pub enrollment_by_class: Vec<ClassEnrollmentStat>,
    pub grades_by_class: Vec<ClassGradeStat>,
}
