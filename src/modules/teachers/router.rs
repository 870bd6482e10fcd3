use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    teacher_analytics, teacher_classes, teacher_dashboard, teacher_students,
};

pub fn init_teachers_router() -> Router<AppState> {
    Router::new()
        .route("/{id}/dashboard", get(teacher_dashboard))
        .route("/{id}/classes", get(teacher_classes))
        .route("/{id}/students", get(teacher_students))
        .route("/{id}/analytics", get(teacher_analytics))
}
