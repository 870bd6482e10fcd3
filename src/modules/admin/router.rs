use axum::{
    Router,
    routing::{delete, get, put},
};

use crate::state::AppState;

use super::controller::{
    admin_dashboard, admin_stats, create_student, create_teacher, delete_user, list_students,
    list_teachers, update_user_status,
};

pub fn init_admin_router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(admin_dashboard))
        .route("/stats", get(admin_stats))
        .route("/students", get(list_students).post(create_student))
        .route("/teachers", get(list_teachers).post(create_teacher))
        .route("/users/{user_type}/{id}/status", put(update_user_status))
        .route("/users/{user_type}/{id}", delete(delete_user))
}
