use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use crate::middleware::auth::CurrentTeacher;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::classes::model::Class;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::response::ApiResponse;

use super::model::{TaughtStudent, TeacherAnalytics, TeacherDashboard};
use super::service::TeacherService;

/// Teachers may only address their own record; any other id reads as absent.
fn require_self(teacher: &CurrentTeacher, id: i64) -> Result<(), AppError> {
    if teacher.id != id {
        return Err(AppError::not_found(anyhow::anyhow!("Teacher not found")));
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/teachers/{id}/dashboard",
    params(("id" = i64, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Dashboard summary", body = TeacherDashboard),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    tag = "Teachers"
)]
#[instrument(skip(state, teacher))]
pub async fn teacher_dashboard(
    State(state): State<AppState>,
    teacher: CurrentTeacher,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<TeacherDashboard>>, AppError> {
    require_self(&teacher, id)?;
    let dashboard = TeacherService::dashboard(&state.db, id).await?;
    Ok(Json(ApiResponse::new(dashboard)))
}

#[utoipa::path(
    get,
    path = "/api/teachers/{id}/classes",
    params(("id" = i64, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Classes taught by this teacher"),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    tag = "Teachers"
)]
#[instrument(skip(state, teacher))]
pub async fn teacher_classes(
    State(state): State<AppState>,
    teacher: CurrentTeacher,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<Class>>>, AppError> {
    require_self(&teacher, id)?;
    let classes = TeacherService::classes(&state.db, id).await?;
    Ok(Json(ApiResponse::new(classes)))
}

#[utoipa::path(
    get,
    path = "/api/teachers/{id}/students",
    params(("id" = i64, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Students across this teacher's classes"),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    tag = "Teachers"
)]
#[instrument(skip(state, teacher))]
pub async fn teacher_students(
    State(state): State<AppState>,
    teacher: CurrentTeacher,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<TaughtStudent>>>, AppError> {
    require_self(&teacher, id)?;
    let students = TeacherService::students(&state.db, id).await?;
    Ok(Json(ApiResponse::new(students)))
}

/// Per-class enrollment plus per-exam submission and grade aggregates.
#[utoipa::path(
    get,
    path = "/api/teachers/{id}/analytics",
    params(("id" = i64, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Teaching analytics", body = TeacherAnalytics),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    tag = "Teachers"
)]
#[instrument(skip(state, teacher))]
pub async fn teacher_analytics(
    State(state): State<AppState>,
    teacher: CurrentTeacher,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<TeacherAnalytics>>, AppError> {
    require_self(&teacher, id)?;
    let analytics = TeacherService::analytics(&state.db, id).await?;
    Ok(Json(ApiResponse::new(analytics)))
}
