use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::modules::admin::router::init_admin_router;
use crate::modules::auth::router::init_auth_router;
use crate::modules::calendar::router::init_calendar_router;
use crate::modules::classes::router::init_classes_router;
use crate::modules::exams::router::{init_exams_router, init_submissions_router};
use crate::modules::files::router::init_files_router;
use crate::modules::notifications::router::init_notifications_router;
use crate::modules::students::router::init_students_router;
use crate::modules::teachers::router::init_teachers_router;
use crate::state::AppState;

pub fn init_router(state: AppState) -> Router {
    // Multipart bodies may exceed the per-file cap; leave headroom for the
    // form framing and reject oversized files in the storage layer.
    let upload_body_limit = state.upload_config.max_file_size * 2;

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api",
            Router::new()
                .nest("/auth", init_auth_router())
                .nest("/classes", init_classes_router())
                .nest("/exams", init_exams_router())
                .nest("/submissions", init_submissions_router())
                .nest("/notifications", init_notifications_router())
                .nest("/calendar", init_calendar_router())
                .nest(
                    "/files",
                    init_files_router().layer(DefaultBodyLimit::max(upload_body_limit)),
                )
                .nest("/admin", init_admin_router())
                .nest("/students", init_students_router())
                .nest("/teachers", init_teachers_router()),
        )
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(logging_middleware))
}
