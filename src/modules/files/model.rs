use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct StoredFile {
    pub id: i64,
    /// Storage key under the upload sink, unique per upload.
    pub filename: String,
    /// Name the client supplied, kept for display.
    pub original_name: String,
    pub file_url: String,
    pub file_size: i64,
    pub mime_type: String,
    pub file_type: String,
    pub uploaded_by: i64,
    pub uploader_type: String,
    pub class_id: Option<i64>,
    pub exam_id: Option<i64>,
    pub submission_id: Option<i64>,
    pub folder_path: String,
    pub is_public: bool,
    pub download_count: i64,
    pub uploaded_at: DateTime<Utc>,
}

/// Multipart fields accompanying an upload, all optional.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UploadMeta {
    pub class_id: Option<i64>,
    pub exam_id: Option<i64>,
    pub submission_id: Option<i64>,
    pub folder_path: Option<String>,
    pub is_public: Option<bool>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct FileQuery {
    pub class_id: Option<i64>,
    pub folder_path: Option<String>,
    pub file_type: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BulkUploadResponse {
    pub files: Vec<StoredFile>,
}

/// Buckets a MIME type into the coarse category stored on the row.
pub fn classify_file_type(mime_type: &str) -> &'static str {
    let mime = mime_type.to_ascii_lowercase();
    if mime.starts_with("image/") {
        "image"
    } else if mime.starts_with("video/") {
        "video"
    } else if mime.starts_with("audio/") {
        "audio"
    } else if matches!(
        mime.as_str(),
        "application/zip"
            | "application/gzip"
            | "application/x-tar"
            | "application/x-7z-compressed"
            | "application/x-rar-compressed"
    ) {
        "archive"
    } else {
        "document"
    }
}
