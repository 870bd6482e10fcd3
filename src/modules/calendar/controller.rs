use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use crate::middleware::auth::CurrentUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::response::{ApiResponse, MessageResponse};
use crate::validator::ValidatedJson;

use super::model::{CalendarEvent, CreateEventDto, EventQuery, UpdateEventDto};
use super::service::CalendarService;

#[utoipa::path(
    post,
    path = "/api/calendar/events",
    request_body = CreateEventDto,
    responses(
        (status = 201, description = "Event created", body = CalendarEvent),
        (status = 400, description = "end_date before start_date", body = ErrorResponse),
        (status = 403, description = "Class events require a teacher account", body = ErrorResponse)
    ),
    tag = "Calendar"
)]
#[instrument(skip(state, user, dto))]
pub async fn create_event(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(dto): ValidatedJson<CreateEventDto>,
) -> Result<(StatusCode, Json<ApiResponse<CalendarEvent>>), AppError> {
    let event = CalendarService::create_event(&state.db, &user, dto).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(event))))
}

/// List events, soonest first, optionally windowed by start_date.
#[utoipa::path(
    get,
    path = "/api/calendar/events",
    params(EventQuery),
    responses(
        (status = 200, description = "Events in range"),
        (status = 401, description = "Unauthenticated", body = ErrorResponse)
    ),
    tag = "Calendar"
)]
#[instrument(skip(state, _user))]
pub async fn list_events(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<EventQuery>,
) -> Result<Json<ApiResponse<Vec<CalendarEvent>>>, AppError> {
    let events = CalendarService::list_events(&state.db, &query).await?;
    Ok(Json(ApiResponse::new(events)))
}

#[utoipa::path(
    get,
    path = "/api/calendar/events/{id}",
    params(("id" = i64, Path, description = "Event ID")),
    responses(
        (status = 200, description = "The event", body = CalendarEvent),
        (status = 404, description = "Event not found", body = ErrorResponse)
    ),
    tag = "Calendar"
)]
#[instrument(skip(state, _user))]
pub async fn get_event(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<CalendarEvent>>, AppError> {
    let event = CalendarService::get_event(&state.db, id).await?;
    Ok(Json(ApiResponse::new(event)))
}

/// Partial update. Only the creator may modify an event.
#[utoipa::path(
    put,
    path = "/api/calendar/events/{id}",
    params(("id" = i64, Path, description = "Event ID")),
    request_body = UpdateEventDto,
    responses(
        (status = 200, description = "Event updated", body = CalendarEvent),
        (status = 400, description = "end_date before start_date", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse)
    ),
    tag = "Calendar"
)]
#[instrument(skip(state, user, dto))]
pub async fn update_event(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateEventDto>,
) -> Result<Json<ApiResponse<CalendarEvent>>, AppError> {
    let event = CalendarService::update_event(&state.db, &user, id, dto).await?;
    Ok(Json(ApiResponse::new(event)))
}

#[utoipa::path(
    delete,
    path = "/api/calendar/events/{id}",
    params(("id" = i64, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event deleted", body = MessageResponse),
        (status = 404, description = "Event not found", body = ErrorResponse)
    ),
    tag = "Calendar"
)]
#[instrument(skip(state, user))]
pub async fn delete_event(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    CalendarService::delete_event(&state.db, &user, id).await?;
    Ok(Json(MessageResponse::new("Event deleted")))
}
