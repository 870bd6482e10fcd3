use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    student_courses, student_dashboard, student_grades, student_submissions,
};

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/{id}/dashboard", get(student_dashboard))
        .route("/{id}/courses", get(student_courses))
        .route("/{id}/grades", get(student_grades))
        .route("/{id}/submissions", get(student_submissions))
}
