use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;

use crate::modules::auth::model::Identity;
use crate::modules::auth::service::AuthService;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Extractor that resolves the session cookie to the acting [`Identity`].
///
/// Business logic receives the identity as an explicit value; nothing reads
/// ambient session state. Missing, unknown, and expired tokens all reject
/// with 401.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let token = jar
            .get(&state.session_config.cookie_name)
            .map(|c| c.value().to_string())
            .ok_or_else(|| AppError::unauthorized(anyhow::anyhow!("Not authenticated")))?;

        let session = AuthService::find_valid_session(&state.db, &token)
            .await?
            .ok_or_else(|| AppError::unauthorized(anyhow::anyhow!("Not authenticated")))?;

        Ok(CurrentUser(session.identity()?))
    }
}

/// Role-gated extractor: the session identity must be a student.
#[derive(Debug, Clone)]
pub struct CurrentStudent {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl FromRequestParts<AppState> for CurrentStudent {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(identity) = CurrentUser::from_request_parts(parts, state).await?;

        match identity {
            Identity::Student { id, name, email } => Ok(CurrentStudent { id, name, email }),
            Identity::Teacher { .. } => Err(AppError::forbidden(anyhow::anyhow!(
                "Student account required"
            ))),
        }
    }
}

/// Role-gated extractor: the session identity must be a teacher.
#[derive(Debug, Clone)]
pub struct CurrentTeacher {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
}

impl FromRequestParts<AppState> for CurrentTeacher {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(identity) = CurrentUser::from_request_parts(parts, state).await?;

        match identity {
            Identity::Teacher {
                id,
                name,
                email,
                is_admin,
            } => Ok(CurrentTeacher {
                id,
                name,
                email,
                is_admin,
            }),
            Identity::Student { .. } => Err(AppError::forbidden(anyhow::anyhow!(
                "Teacher account required"
            ))),
        }
    }
}

/// Role-gated extractor: a teacher carrying the admin privilege flag.
#[derive(Debug, Clone)]
pub struct CurrentAdmin(pub CurrentTeacher);

impl FromRequestParts<AppState> for CurrentAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let teacher = CurrentTeacher::from_request_parts(parts, state).await?;

        if !teacher.is_admin {
            return Err(AppError::forbidden(anyhow::anyhow!(
                "Admin privileges required"
            )));
        }

        Ok(CurrentAdmin(teacher))
    }
}
