use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

use super::controller::{bulk_upload_files, delete_file, download_file, list_files, upload_file};

pub fn init_files_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_files))
        .route("/upload", post(upload_file))
        .route("/upload/bulk", post(bulk_upload_files))
        .route("/{id}", delete(delete_file))
        .route("/{id}/download", get(download_file))
}
