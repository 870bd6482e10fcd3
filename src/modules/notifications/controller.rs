use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;

use crate::middleware::auth::{CurrentAdmin, CurrentTeacher, CurrentUser};
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::pagination::{Page, PaginationParams};
use crate::utils::response::{ApiResponse, MessageResponse};
use crate::validator::ValidatedJson;

use super::model::{
    BulkCreateResponse, BulkNotificationDto, CreateNotificationDto, Notification,
    UnreadCountResponse,
};
use super::service::NotificationService;

/// List the session identity's notifications, newest first.
#[utoipa::path(
    get,
    path = "/api/notifications",
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of notifications"),
        (status = 401, description = "Unauthenticated", body = ErrorResponse)
    ),
    tag = "Notifications"
)]
#[instrument(skip(state, user))]
pub async fn list_notifications(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<Page<Notification>>>, AppError> {
    let (notifications, total) = NotificationService::list(
        &state.db,
        user.user_id(),
        user.user_type(),
        params.limit(),
        params.offset(),
    )
    .await?;

    Ok(Json(ApiResponse::new(Page::new(
        notifications,
        &params,
        total,
    ))))
}

/// Targeted notification creation.
#[utoipa::path(
    post,
    path = "/api/notifications",
    request_body = CreateNotificationDto,
    responses(
        (status = 200, description = "Notification created", body = Notification),
        (status = 403, description = "Teacher account required", body = ErrorResponse)
    ),
    tag = "Notifications"
)]
#[instrument(skip(state, _teacher, dto))]
pub async fn create_notification(
    State(state): State<AppState>,
    _teacher: CurrentTeacher,
    ValidatedJson(dto): ValidatedJson<CreateNotificationDto>,
) -> Result<Json<ApiResponse<Notification>>, AppError> {
    let notification = NotificationService::create(&state.db, dto).await?;
    Ok(Json(ApiResponse::new(notification)))
}

/// Bulk fan-out to an audience. Admin only.
#[utoipa::path(
    post,
    path = "/api/notifications/bulk",
    request_body = BulkNotificationDto,
    responses(
        (status = 200, description = "Notifications created", body = BulkCreateResponse),
        (status = 403, description = "Admin privileges required", body = ErrorResponse)
    ),
    tag = "Notifications"
)]
#[instrument(skip(state, _admin, dto))]
pub async fn bulk_create_notifications(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ValidatedJson(dto): ValidatedJson<BulkNotificationDto>,
) -> Result<Json<ApiResponse<BulkCreateResponse>>, AppError> {
    let created = NotificationService::bulk_create(&state.db, dto).await?;
    Ok(Json(ApiResponse::new(BulkCreateResponse { created })))
}

/// Mark one of the caller's notifications as read. Idempotent.
#[utoipa::path(
    put,
    path = "/api/notifications/{id}/read",
    params(("id" = i64, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Marked read", body = MessageResponse),
        (status = 404, description = "Notification not found", body = ErrorResponse)
    ),
    tag = "Notifications"
)]
#[instrument(skip(state, user))]
pub async fn mark_notification_read(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    NotificationService::mark_read(&state.db, user.user_id(), user.user_type(), id).await?;
    Ok(Json(MessageResponse::new("Notification marked as read")))
}

/// Mark all of the caller's notifications as read. Idempotent.
#[utoipa::path(
    put,
    path = "/api/notifications/read-all",
    responses(
        (status = 200, description = "All marked read", body = MessageResponse)
    ),
    tag = "Notifications"
)]
#[instrument(skip(state, user))]
pub async fn mark_all_notifications_read(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<MessageResponse>, AppError> {
    NotificationService::mark_all_read(&state.db, user.user_id(), user.user_type()).await?;
    Ok(Json(MessageResponse::new("All notifications marked as read")))
}

/// Current unread count, computed fresh per call.
#[utoipa::path(
    get,
    path = "/api/notifications/unread-count",
    responses(
        (status = 200, description = "Unread count", body = UnreadCountResponse)
    ),
    tag = "Notifications"
)]
#[instrument(skip(state, user))]
pub async fn unread_notification_count(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<UnreadCountResponse>>, AppError> {
    let count =
        NotificationService::unread_count(&state.db, user.user_id(), user.user_type()).await?;
    Ok(Json(ApiResponse::new(UnreadCountResponse { count })))
}

#[utoipa::path(
    delete,
    path = "/api/notifications/{id}",
    params(("id" = i64, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification deleted", body = MessageResponse),
        (status = 404, description = "Notification not found", body = ErrorResponse)
    ),
    tag = "Notifications"
)]
#[instrument(skip(state, user))]
pub async fn delete_notification(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    NotificationService::delete(&state.db, user.user_id(), user.user_type(), id).await?;
    Ok(Json(MessageResponse::new("Notification deleted")))
}
