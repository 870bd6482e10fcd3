use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::Redirect,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::CurrentUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::Identity;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::response::{ApiResponse, MessageResponse};

use super::model::{BulkUploadResponse, FileQuery, StoredFile, UploadMeta, classify_file_type};
use super::service::{FileService, NewFileRecord};
use super::storage::{FileStorage, StorageError};

/// One decoded multipart file part.
struct UploadedPart {
    original_name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

/// Drains a multipart body into file parts plus the optional metadata fields.
async fn read_upload(mut multipart: Multipart) -> Result<(Vec<UploadedPart>, UploadMeta), AppError> {
    let mut parts = Vec::new();
    let mut meta = UploadMeta::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" | "files" => {
                let original_name = field
                    .file_name()
                    .map(str::to_string)
                    .filter(|n| !n.is_empty())
                    .ok_or_else(|| {
                        AppError::bad_request(anyhow::anyhow!("File part requires a filename"))
                    })?;
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::bad_request(anyhow::anyhow!("Failed to read file data: {e}"))
                })?;

                parts.push(UploadedPart {
                    original_name,
                    mime_type,
                    bytes: bytes.to_vec(),
                });
            }
            "class_id" => meta.class_id = Some(read_number(field).await?),
            "exam_id" => meta.exam_id = Some(read_number(field).await?),
            "submission_id" => meta.submission_id = Some(read_number(field).await?),
            "folder_path" => {
                meta.folder_path = Some(read_text(field).await?);
            }
            "is_public" => {
                let text = read_text(field).await?;
                meta.is_public = Some(text == "true" || text == "1");
            }
            _ => {}
        }
    }

    Ok((parts, meta))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Malformed multipart field: {e}")))
}

async fn read_number(field: axum::extract::multipart::Field<'_>) -> Result<i64, AppError> {
    let name = field.name().unwrap_or("").to_string();
    read_text(field).await?.parse().map_err(|_| {
        AppError::bad_request(anyhow::anyhow!("Field '{name}' must be an integer"))
    })
}

/// Derives the storage key: a fresh UUID keeps uploads from colliding, the
/// sanitized extension keeps the served URL recognizable.
fn storage_key(original_name: &str) -> String {
    let ext: String = original_name
        .rsplit_once('.')
        .map(|(_, e)| e)
        .unwrap_or("")
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(10)
        .collect::<String>()
        .to_ascii_lowercase();

    if ext.is_empty() {
        format!("attachments/{}", Uuid::new_v4())
    } else {
        format!("attachments/{}.{ext}", Uuid::new_v4())
    }
}

async fn persist_part(
    state: &AppState,
    user: &Identity,
    part: UploadedPart,
    meta: &UploadMeta,
) -> Result<StoredFile, AppError> {
    let key = storage_key(&part.original_name);
    let key = state
        .storage
        .save(&key, &part.bytes)
        .await
        .map_err(StorageError::into_app_error)?;
    let file_url = state
        .storage
        .get_url(&key)
        .map_err(StorageError::into_app_error)?;

    let record = NewFileRecord {
        filename: key,
        original_name: part.original_name,
        file_url,
        file_size: part.bytes.len() as i64,
        file_type: classify_file_type(&part.mime_type).to_string(),
        mime_type: part.mime_type,
    };

    FileService::record(&state.db, user, record, meta).await
}

/// Single-file upload. Expects one `file` part plus optional metadata fields.
#[utoipa::path(
    post,
    path = "/api/files/upload",
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "File stored", body = StoredFile),
        (status = 400, description = "Missing or malformed file part", body = ErrorResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse)
    ),
    tag = "Files"
)]
#[instrument(skip(state, user, multipart))]
pub async fn upload_file(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<StoredFile>>), AppError> {
    let (mut parts, meta) = read_upload(multipart).await?;
    let part = match (parts.pop(), parts.is_empty()) {
        (Some(part), true) => part,
        (Some(_), false) => {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Expected exactly one file part; use the bulk endpoint for multiple files"
            )));
        }
        (None, _) => {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "A 'file' part is required"
            )));
        }
    };

    let file = persist_part(&state, &user, part, &meta).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(file))))
}

/// Bulk upload: every `files` part is stored with the shared metadata fields.
#[utoipa::path(
    post,
    path = "/api/files/upload/bulk",
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Files stored", body = BulkUploadResponse),
        (status = 400, description = "No file parts present", body = ErrorResponse)
    ),
    tag = "Files"
)]
#[instrument(skip(state, user, multipart))]
pub async fn bulk_upload_files(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<BulkUploadResponse>>), AppError> {
    let (parts, meta) = read_upload(multipart).await?;
    if parts.is_empty() {
        return Err(AppError::bad_request(anyhow::anyhow!(
            "At least one 'files' part is required"
        )));
    }

    let mut files = Vec::with_capacity(parts.len());
    for part in parts {
        files.push(persist_part(&state, &user, part, &meta).await?);
    }

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(BulkUploadResponse { files })),
    ))
}

#[utoipa::path(
    get,
    path = "/api/files",
    params(FileQuery),
    responses(
        (status = 200, description = "Visible files"),
        (status = 401, description = "Unauthenticated", body = ErrorResponse)
    ),
    tag = "Files"
)]
#[instrument(skip(state, user))]
pub async fn list_files(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<FileQuery>,
) -> Result<Json<ApiResponse<Vec<StoredFile>>>, AppError> {
    let files = FileService::list(&state.db, &user, &query).await?;
    Ok(Json(ApiResponse::new(files)))
}

/// Bumps the download counter and redirects to the stored URL.
#[utoipa::path(
    get,
    path = "/api/files/{id}/download",
    params(("id" = i64, Path, description = "File ID")),
    responses(
        (status = 303, description = "Redirect to the file URL"),
        (status = 404, description = "File not found", body = ErrorResponse)
    ),
    tag = "Files"
)]
#[instrument(skip(state, user))]
pub async fn download_file(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    let file = FileService::start_download(&state.db, &user, id).await?;
    Ok(Redirect::to(&file.file_url))
}

#[utoipa::path(
    delete,
    path = "/api/files/{id}",
    params(("id" = i64, Path, description = "File ID")),
    responses(
        (status = 200, description = "File deleted", body = MessageResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    ),
    tag = "Files"
)]
#[instrument(skip(state, user))]
pub async fn delete_file(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    FileService::delete(&state.db, &state.storage, &user, id).await?;
    Ok(Json(MessageResponse::new("File deleted")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key_keeps_sanitized_extension() {
        let key = storage_key("Report Final.PDF");
        assert!(key.starts_with("attachments/"));
        assert!(key.ends_with(".pdf"));
    }

    #[test]
    fn test_storage_key_without_extension() {
        let key = storage_key("README");
        assert!(key.starts_with("attachments/"));
        assert!(!key.contains('.'));
    }
}
