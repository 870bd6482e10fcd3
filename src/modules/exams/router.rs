use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_exam, get_exam, grade_submission, list_exams, list_submissions, submit,
};

pub fn init_exams_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_exam).get(list_exams))
        .route("/{id}", get(get_exam))
        .route("/{id}/submissions", post(submit).get(list_submissions))
}

/// Mounted separately at `/api/submissions`.
pub fn init_submissions_router() -> Router<AppState> {
    Router::new().route("/{id}/grade", post(grade_submission))
}
