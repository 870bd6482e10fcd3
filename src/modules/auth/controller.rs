use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use crate::middleware::auth::CurrentUser;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::response::{ApiResponse, MessageResponse};
use crate::validator::ValidatedJson;

use super::model::{Identity, LoginDto, SignupDto, StudentProfile};
use super::service::AuthService;

/// Error envelope returned by every failing endpoint.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build((state.session_config.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .build()
}

/// Student self-signup
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupDto,
    responses(
        (status = 201, description = "Student account created", body = StudentProfile),
        (status = 409, description = "Email or student id already registered", body = ErrorResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<SignupDto>,
) -> Result<(StatusCode, Json<ApiResponse<StudentProfile>>), AppError> {
    let student = AuthService::signup(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(student))))
}

/// Student login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Login successful, session cookie set"),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, jar, dto))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(dto): ValidatedJson<LoginDto>,
) -> Result<(CookieJar, Json<ApiResponse<Identity>>), AppError> {
    let (identity, session) =
        AuthService::login_student(&state.db, dto, &state.session_config).await?;
    let jar = jar.add(session_cookie(&state, session.token));

    Ok((jar, Json(ApiResponse::new(identity))))
}

/// Teacher login
#[utoipa::path(
    post,
    path = "/api/auth/teacher-login",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Login successful, session cookie set"),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 403, description = "Account is not a teacher", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, jar, dto))]
pub async fn teacher_login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(dto): ValidatedJson<LoginDto>,
) -> Result<(CookieJar, Json<ApiResponse<Identity>>), AppError> {
    let (identity, session) =
        AuthService::login_teacher(&state.db, dto, &state.session_config).await?;
    let jar = jar.add(session_cookie(&state, session.token));

    Ok((jar, Json(ApiResponse::new(identity))))
}

/// Logout. Idempotent: succeeds with or without a live session.
#[utoipa::path(
    get,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session destroyed", body = MessageResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<MessageResponse>), AppError> {
    if let Some(cookie) = jar.get(&state.session_config.cookie_name) {
        AuthService::destroy_session(&state.db, cookie.value()).await?;
    }

    let jar = jar.remove(
        Cookie::build((state.session_config.cookie_name.clone(), ""))
            .path("/")
            .build(),
    );

    Ok((jar, Json(MessageResponse::new("Logged out"))))
}

/// Returns the identity bound to the current session.
#[utoipa::path(
    get,
    path = "/api/auth/verify",
    responses(
        (status = 200, description = "Session is valid"),
        (status = 401, description = "No valid session", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(user))]
pub async fn verify(
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<Identity>>, AppError> {
    Ok(Json(ApiResponse::new(user)))
}
