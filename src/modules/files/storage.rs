//! Upload sink abstraction.
//!
//! Attachment bytes go through the [`FileStorage`] trait so the backing store
//! (local disk today, object storage later) can change without touching the
//! files module's business logic.

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use tokio::fs;

use crate::config::uploads::UploadConfig;
use crate::utils::errors::AppError;

pub trait FileStorage: Send + Sync {
    /// Persist `content` under `key` and return the storage key.
    fn save<'a>(
        &'a self,
        key: &'a str,
        content: &'a [u8],
    ) -> Pin<Box<dyn Future<Output = Result<String, StorageError>> + Send + 'a>>;

    /// Remove the blob for `key`. Missing blobs are not an error.
    fn delete<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), StorageError>> + Send + 'a>>;

    /// Public URL the blob is served under.
    fn get_url(&self, key: &str) -> Result<String, StorageError>;
}

#[derive(Debug)]
pub enum StorageError {
    TooLarge { max_bytes: usize },
    Io(std::io::Error),
    InvalidKey(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLarge { max_bytes } => {
                write!(f, "File exceeds maximum size of {max_bytes} bytes")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::InvalidKey(msg) => write!(f, "Invalid storage key: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl StorageError {
    /// Caller-rejectable failures map to 400; I/O faults stay internal.
    pub fn into_app_error(self) -> AppError {
        match self {
            Self::TooLarge { .. } | Self::InvalidKey(_) => AppError::bad_request(self),
            Self::Io(_) => AppError::internal(self),
        }
    }
}

/// Writes blobs under a base directory and serves them from a URL prefix.
#[derive(Clone, Debug)]
pub struct LocalFileStorage {
    base_dir: PathBuf,
    base_url: String,
    max_file_size: usize,
}

impl LocalFileStorage {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            base_dir: config.base_dir.clone(),
            base_url: config.base_url.clone(),
            max_file_size: config.max_file_size,
        }
    }

    /// Keys are relative paths; anything that could escape the base
    /// directory is rejected.
    fn validate_key(key: &str) -> Result<(), StorageError> {
        if key.is_empty() || key.contains("..") || key.starts_with('/') {
            return Err(StorageError::InvalidKey(
                "Key must not be empty, contain '..', or start with '/'".to_string(),
            ));
        }
        if !key
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '/' || c == '.')
        {
            return Err(StorageError::InvalidKey(
                "Key contains invalid characters".to_string(),
            ));
        }
        Ok(())
    }
}

impl FileStorage for LocalFileStorage {
    fn save<'a>(
        &'a self,
        key: &'a str,
        content: &'a [u8],
    ) -> Pin<Box<dyn Future<Output = Result<String, StorageError>> + Send + 'a>> {
        Box::pin(async move {
            Self::validate_key(key)?;

            if content.len() > self.max_file_size {
                return Err(StorageError::TooLarge {
                    max_bytes: self.max_file_size,
                });
            }

            let file_path = self.base_dir.join(key);
            if let Some(parent) = file_path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::write(&file_path, content).await?;

            Ok(key.to_string())
        })
    }

    fn delete<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), StorageError>> + Send + 'a>> {
        Box::pin(async move {
            Self::validate_key(key)?;

            let file_path = self.base_dir.join(key);
            match fs::remove_file(&file_path).await {
                Ok(_) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn get_url(&self, key: &str) -> Result<String, StorageError> {
        Self::validate_key(key)?;
        Ok(format!("{}/{}", self.base_url.trim_end_matches('/'), key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> LocalFileStorage {
        LocalFileStorage {
            base_dir: PathBuf::from("./storage/uploads"),
            base_url: "http://localhost:3000/uploads".to_string(),
            max_file_size: 1024,
        }
    }

    #[test]
    fn test_validate_key_accepts_relative_paths() {
        assert!(LocalFileStorage::validate_key("exams/brief.pdf").is_ok());
        assert!(LocalFileStorage::validate_key("exams/abc-123_v2.pdf").is_ok());
    }

    #[test]
    fn test_validate_key_rejects_traversal_and_absolute() {
        assert!(LocalFileStorage::validate_key("../../../etc/passwd").is_err());
        assert!(LocalFileStorage::validate_key("/etc/passwd").is_err());
        assert!(LocalFileStorage::validate_key("").is_err());
        assert!(LocalFileStorage::validate_key("a b.txt").is_err());
    }

    #[test]
    fn test_get_url_joins_without_double_slash() {
        let url = storage().get_url("exams/brief.pdf").unwrap();
        assert_eq!(url, "http://localhost:3000/uploads/exams/brief.pdf");
    }

    #[tokio::test]
    async fn test_save_rejects_oversized_content() {
        let err = storage().save("big.bin", &[0u8; 2048]).await.unwrap_err();
        assert!(matches!(err, StorageError::TooLarge { .. }));
    }

    #[test]
    fn test_into_app_error_status_mapping() {
        use axum::http::StatusCode;

        let too_large = StorageError::TooLarge { max_bytes: 1024 };
        assert_eq!(too_large.into_app_error().status, StatusCode::BAD_REQUEST);

        let bad_key = StorageError::InvalidKey("nope".to_string());
        assert_eq!(bad_key.into_app_error().status, StatusCode::BAD_REQUEST);

        let io = StorageError::Io(std::io::Error::other("disk"));
        assert_eq!(
            io.into_app_error().status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
