use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{instrument, warn};

use crate::modules::auth::model::Identity;
use crate::utils::errors::AppError;

use super::model::{FileQuery, StoredFile, UploadMeta};
use super::storage::FileStorage;

const FILE_COLUMNS: &str = "id, filename, original_name, file_url, file_size, mime_type, \
     file_type, uploaded_by, uploader_type, class_id, exam_id, submission_id, folder_path, \
     is_public, download_count, uploaded_at";

/// Everything the controller computed about one persisted blob.
pub struct NewFileRecord {
    pub filename: String,
    pub original_name: String,
    pub file_url: String,
    pub file_size: i64,
    pub mime_type: String,
    pub file_type: String,
}

pub struct FileService;

impl FileService {
    #[instrument(skip(db, record, meta))]
    pub async fn record(
        db: &SqlitePool,
        identity: &Identity,
        record: NewFileRecord,
        meta: &UploadMeta,
    ) -> Result<StoredFile, AppError> {
        let file = sqlx::query_as::<_, StoredFile>(&format!(
            "INSERT INTO files (filename, original_name, file_url, file_size, mime_type, \
                 file_type, uploaded_by, uploader_type, class_id, exam_id, submission_id, \
                 folder_path, is_public, download_count, uploaded_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, 0, ?14)
             RETURNING {FILE_COLUMNS}"
        ))
        .bind(&record.filename)
        .bind(&record.original_name)
        .bind(&record.file_url)
        .bind(record.file_size)
        .bind(&record.mime_type)
        .bind(&record.file_type)
        .bind(identity.user_id())
        .bind(identity.user_type())
        .bind(meta.class_id)
        .bind(meta.exam_id)
        .bind(meta.submission_id)
        .bind(meta.folder_path.as_deref().unwrap_or("/"))
        .bind(meta.is_public.unwrap_or(false))
        .bind(Utc::now())
        .fetch_one(db)
        .await
        .map_err(AppError::database)?;

        Ok(file)
    }

    /// Lists files the caller may see: public ones plus their own uploads.
    #[instrument(skip(db))]
    pub async fn list(
        db: &SqlitePool,
        identity: &Identity,
        query: &FileQuery,
    ) -> Result<Vec<StoredFile>, AppError> {
        let files = sqlx::query_as::<_, StoredFile>(&format!(
            "SELECT {FILE_COLUMNS} FROM files
             WHERE (is_public = TRUE OR (uploaded_by = ?1 AND uploader_type = ?2))
               AND (?3 IS NULL OR class_id = ?3)
               AND (?4 IS NULL OR folder_path = ?4)
               AND (?5 IS NULL OR file_type = ?5)
             ORDER BY uploaded_at DESC, id DESC"
        ))
        .bind(identity.user_id())
        .bind(identity.user_type())
        .bind(query.class_id)
        .bind(&query.folder_path)
        .bind(&query.file_type)
        .fetch_all(db)
        .await
        .map_err(AppError::database)?;

        Ok(files)
    }

    /// Resolves a downloadable file for the caller and bumps its counter.
    /// Files invisible to the caller read as absent.
    #[instrument(skip(db))]
    pub async fn start_download(
        db: &SqlitePool,
        identity: &Identity,
        id: i64,
    ) -> Result<StoredFile, AppError> {
        let file = Self::visible_file(db, identity, id).await?;

        sqlx::query("UPDATE files SET download_count = download_count + 1 WHERE id = ?1")
            .bind(id)
            .execute(db)
            .await
            .map_err(AppError::database)?;

        Ok(file)
    }

    #[instrument(skip(db, storage))]
    pub async fn delete(
        db: &SqlitePool,
        storage: &impl FileStorage,
        identity: &Identity,
        id: i64,
    ) -> Result<(), AppError> {
        let file = sqlx::query_as::<_, StoredFile>(&format!(
            "DELETE FROM files WHERE id = ?1 AND uploaded_by = ?2 AND uploader_type = ?3
             RETURNING {FILE_COLUMNS}"
        ))
        .bind(id)
        .bind(identity.user_id())
        .bind(identity.user_type())
        .fetch_optional(db)
        .await
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("File not found")))?;

        // The row is the source of truth; a failed sink delete only leaves an
        // orphaned blob behind.
        if let Err(e) = storage.delete(&file.filename).await {
            warn!(file_id = id, error = %e, "Failed to delete stored blob");
        }

        Ok(())
    }

    async fn visible_file(
        db: &SqlitePool,
        identity: &Identity,
        id: i64,
    ) -> Result<StoredFile, AppError> {
        sqlx::query_as::<_, StoredFile>(&format!(
            "SELECT {FILE_COLUMNS} FROM files
             WHERE id = ?1 AND (is_public = TRUE OR (uploaded_by = ?2 AND uploader_type = ?3))"
        ))
        .bind(id)
        .bind(identity.user_id())
        .bind(identity.user_type())
        .fetch_optional(db)
        .await
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("File not found")))
    }
}
