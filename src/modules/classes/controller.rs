use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use crate::middleware::auth::{CurrentStudent, CurrentTeacher, CurrentUser};
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::pagination::{Page, PaginationParams};
use crate::utils::response::{ApiResponse, MessageResponse};
use crate::validator::ValidatedJson;

use super::model::{Class, CreateClassDto, EnrollDto, Enrollment, RosterEntry, UpdateClassDto};
use super::service::ClassService;

/// Create a class owned by the session teacher.
#[utoipa::path(
    post,
    path = "/api/classes",
    request_body = CreateClassDto,
    responses(
        (status = 201, description = "Class created", body = Class),
        (status = 403, description = "Teacher account required", body = ErrorResponse)
    ),
    tag = "Classes"
)]
#[instrument(skip(state, teacher, dto))]
pub async fn create_class(
    State(state): State<AppState>,
    teacher: CurrentTeacher,
    ValidatedJson(dto): ValidatedJson<CreateClassDto>,
) -> Result<(StatusCode, Json<ApiResponse<Class>>), AppError> {
    let class = ClassService::create_class(&state.db, teacher.id, dto).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(class))))
}

/// List active classes.
#[utoipa::path(
    get,
    path = "/api/classes",
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of classes"),
        (status = 401, description = "Unauthenticated", body = ErrorResponse)
    ),
    tag = "Classes"
)]
#[instrument(skip(state, _user))]
pub async fn list_classes(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<Page<Class>>>, AppError> {
    let (classes, total) =
        ClassService::list_classes(&state.db, params.limit(), params.offset()).await?;
    Ok(Json(ApiResponse::new(Page::new(classes, &params, total))))
}

/// Class detail, addressable by numeric id or slug.
#[utoipa::path(
    get,
    path = "/api/classes/{key}",
    params(("key" = String, Path, description = "Class ID or slug")),
    responses(
        (status = 200, description = "Class detail", body = Class),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    tag = "Classes"
)]
#[instrument(skip(state, _user))]
pub async fn get_class(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(key): Path<String>,
) -> Result<Json<ApiResponse<Class>>, AppError> {
    let class = ClassService::resolve_class(&state.db, &key).await?;
    Ok(Json(ApiResponse::new(class)))
}

#[utoipa::path(
    put,
    path = "/api/classes/{id}",
    params(("id" = i64, Path, description = "Class ID")),
    request_body = UpdateClassDto,
    responses(
        (status = 200, description = "Class updated", body = Class),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    tag = "Classes"
)]
#[instrument(skip(state, teacher, dto))]
pub async fn update_class(
    State(state): State<AppState>,
    teacher: CurrentTeacher,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateClassDto>,
) -> Result<Json<ApiResponse<Class>>, AppError> {
    let class = ClassService::update_class(&state.db, teacher.id, id, dto).await?;
    Ok(Json(ApiResponse::new(class)))
}

#[utoipa::path(
    delete,
    path = "/api/classes/{id}",
    params(("id" = i64, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Class deleted", body = MessageResponse),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    tag = "Classes"
)]
#[instrument(skip(state, teacher))]
pub async fn delete_class(
    State(state): State<AppState>,
    teacher: CurrentTeacher,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    ClassService::delete_class(&state.db, teacher.id, id).await?;
    Ok(Json(MessageResponse::new("Class deleted")))
}

/// Roster of enrolled students. Owner teacher only.
#[utoipa::path(
    get,
    path = "/api/classes/{id}/students",
    params(("id" = i64, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Enrolled students", body = [RosterEntry]),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    tag = "Classes"
)]
#[instrument(skip(state, teacher))]
pub async fn class_roster(
    State(state): State<AppState>,
    teacher: CurrentTeacher,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<RosterEntry>>>, AppError> {
    let roster = ClassService::roster(&state.db, teacher.id, id).await?;
    Ok(Json(ApiResponse::new(roster)))
}

/// Join a class with its shared secret.
#[utoipa::path(
    post,
    path = "/api/classes/{key}/enroll",
    params(("key" = String, Path, description = "Class ID or slug")),
    request_body = EnrollDto,
    responses(
        (status = 201, description = "Enrolled", body = Enrollment),
        (status = 400, description = "Class is full", body = ErrorResponse),
        (status = 401, description = "Invalid class password", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse),
        (status = 409, description = "Already enrolled", body = ErrorResponse)
    ),
    tag = "Classes"
)]
#[instrument(skip(state, student, dto))]
pub async fn enroll(
    State(state): State<AppState>,
    student: CurrentStudent,
    Path(key): Path<String>,
    ValidatedJson(dto): ValidatedJson<EnrollDto>,
) -> Result<(StatusCode, Json<ApiResponse<Enrollment>>), AppError> {
    let enrollment = ClassService::enroll(&state.db, student.id, &key, &dto.password).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(enrollment))))
}
