use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use crate::middleware::auth::CurrentAdmin;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::pagination::{Page, PaginationParams};
use crate::utils::response::{ApiResponse, MessageResponse};
use crate::validator::ValidatedJson;

use super::model::{
    CreateStudentDto, CreateTeacherDto, DashboardCounts, PlatformStats, StudentRecord,
    TeacherRecord, UpdateStatusDto,
};
use super::service::AdminService;

#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    responses(
        (status = 200, description = "Entity counts", body = DashboardCounts),
        (status = 403, description = "Admin privileges required", body = ErrorResponse)
    ),
    tag = "Admin"
)]
#[instrument(skip(state, _admin))]
pub async fn admin_dashboard(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
) -> Result<Json<ApiResponse<DashboardCounts>>, AppError> {
    let counts = AdminService::dashboard_counts(&state.db).await?;
    Ok(Json(ApiResponse::new(counts)))
}

#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses(
        (status = 200, description = "Per-class aggregates", body = PlatformStats),
        (status = 403, description = "Admin privileges required", body = ErrorResponse)
    ),
    tag = "Admin"
)]
#[instrument(skip(state, _admin))]
pub async fn admin_stats(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
) -> Result<Json<ApiResponse<PlatformStats>>, AppError> {
    let stats = AdminService::platform_stats(&state.db).await?;
    Ok(Json(ApiResponse::new(stats)))
}

/// All student accounts, active or not.
#[utoipa::path(
    get,
    path = "/api/admin/students",
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of students"),
        (status = 403, description = "Admin privileges required", body = ErrorResponse)
    ),
    tag = "Admin"
)]
#[instrument(skip(state, _admin))]
pub async fn list_students(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<Page<StudentRecord>>>, AppError> {
    let (students, total) =
        AdminService::list_students(&state.db, params.limit(), params.offset()).await?;
    Ok(Json(ApiResponse::new(Page::new(students, &params, total))))
}

#[utoipa::path(
    get,
    path = "/api/admin/teachers",
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of teachers"),
        (status = 403, description = "Admin privileges required", body = ErrorResponse)
    ),
    tag = "Admin"
)]
#[instrument(skip(state, _admin))]
pub async fn list_teachers(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<Page<TeacherRecord>>>, AppError> {
    let (teachers, total) =
        AdminService::list_teachers(&state.db, params.limit(), params.offset()).await?;
    Ok(Json(ApiResponse::new(Page::new(teachers, &params, total))))
}

#[utoipa::path(
    post,
    path = "/api/admin/students",
    request_body = CreateStudentDto,
    responses(
        (status = 201, description = "Student created", body = StudentRecord),
        (status = 409, description = "ID or email already taken", body = ErrorResponse)
    ),
    tag = "Admin"
)]
#[instrument(skip(state, _admin, dto))]
pub async fn create_student(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ValidatedJson(dto): ValidatedJson<CreateStudentDto>,
) -> Result<(StatusCode, Json<ApiResponse<StudentRecord>>), AppError> {
    let student = AdminService::create_student(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(student))))
}

/// Creates a teacher account with the teacher flag already granted.
#[utoipa::path(
    post,
    path = "/api/admin/teachers",
    request_body = CreateTeacherDto,
    responses(
        (status = 201, description = "Teacher created", body = TeacherRecord),
        (status = 409, description = "ID or email already taken", body = ErrorResponse)
    ),
    tag = "Admin"
)]
#[instrument(skip(state, _admin, dto))]
pub async fn create_teacher(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ValidatedJson(dto): ValidatedJson<CreateTeacherDto>,
) -> Result<(StatusCode, Json<ApiResponse<TeacherRecord>>), AppError> {
    let teacher = AdminService::create_teacher(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(teacher))))
}

#[utoipa::path(
    put,
    path = "/api/admin/users/{user_type}/{id}/status",
    params(
        ("user_type" = String, Path, description = "student or teacher"),
        ("id" = i64, Path, description = "User ID")
    ),
    request_body = UpdateStatusDto,
    responses(
        (status = 200, description = "Status updated", body = MessageResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Admin"
)]
#[instrument(skip(state, _admin, dto))]
pub async fn update_user_status(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Path((user_type, id)): Path<(String, i64)>,
    ValidatedJson(dto): ValidatedJson<UpdateStatusDto>,
) -> Result<Json<MessageResponse>, AppError> {
    AdminService::set_status(&state.db, &user_type, id, dto.is_active).await?;
    Ok(Json(MessageResponse::new("User status updated")))
}

/// Soft delete: the account is deactivated, never removed.
#[utoipa::path(
    delete,
    path = "/api/admin/users/{user_type}/{id}",
    params(
        ("user_type" = String, Path, description = "student or teacher"),
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deactivated", body = MessageResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Admin"
)]
#[instrument(skip(state, _admin))]
pub async fn delete_user(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Path((user_type, id)): Path<(String, i64)>,
) -> Result<Json<MessageResponse>, AppError> {
    AdminService::soft_delete(&state.db, &user_type, id).await?;
    Ok(Json(MessageResponse::new("User deactivated")))
}
