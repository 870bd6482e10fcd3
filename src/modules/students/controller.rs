use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use crate::middleware::auth::CurrentStudent;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::response::ApiResponse;

use super::model::{CourseEntry, GradeEntry, StudentDashboard, SubmissionEntry};
use super::service::StudentService;

/// Students may only address their own record; any other id reads as absent.
fn require_self(student: &CurrentStudent, id: i64) -> Result<(), AppError> {
    if student.id != id {
        return Err(AppError::not_found(anyhow::anyhow!("Student not found")));
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/students/{id}/dashboard",
    params(("id" = i64, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Dashboard summary", body = StudentDashboard),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state, student))]
pub async fn student_dashboard(
    State(state): State<AppState>,
    student: CurrentStudent,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<StudentDashboard>>, AppError> {
    require_self(&student, id)?;
    let dashboard = StudentService::dashboard(&state.db, id).await?;
    Ok(Json(ApiResponse::new(dashboard)))
}

#[utoipa::path(
    get,
    path = "/api/students/{id}/courses",
    params(("id" = i64, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Enrolled classes"),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state, student))]
pub async fn student_courses(
    State(state): State<AppState>,
    student: CurrentStudent,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<CourseEntry>>>, AppError> {
    require_self(&student, id)?;
    let courses = StudentService::courses(&state.db, id).await?;
    Ok(Json(ApiResponse::new(courses)))
}

#[utoipa::path(
    get,
    path = "/api/students/{id}/grades",
    params(("id" = i64, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Graded work, newest first"),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state, student))]
pub async fn student_grades(
    State(state): State<AppState>,
    student: CurrentStudent,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<GradeEntry>>>, AppError> {
    require_self(&student, id)?;
    let grades = StudentService::grades(&state.db, id).await?;
    Ok(Json(ApiResponse::new(grades)))
}

#[utoipa::path(
    get,
    path = "/api/students/{id}/submissions",
    params(("id" = i64, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Submission history"),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state, student))]
pub async fn student_submissions(
    State(state): State<AppState>,
    student: CurrentStudent,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<SubmissionEntry>>>, AppError> {
    require_self(&student, id)?;
    let submissions = StudentService::submissions(&state.db, id).await?;
    Ok(Json(ApiResponse::new(submissions)))
}
