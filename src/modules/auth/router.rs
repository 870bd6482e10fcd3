use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{login, logout, signup, teacher_login, verify};

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/teacher-login", post(teacher_login))
        .route("/logout", get(logout))
        .route("/verify", get(verify))
}
