use std::env;
use std::path::PathBuf;

/// Upload sink configuration: where blobs land on disk and the public URL
/// prefix they are served under.
#[derive(Clone, Debug)]
pub struct UploadConfig {
    pub base_dir: PathBuf,
    pub base_url: String,
    pub max_file_size: usize,
}

impl UploadConfig {
    pub fn from_env() -> Self {
        let base_dir = env::var("UPLOAD_DIR")
            .unwrap_or_else(|_| "storage/uploads".to_string())
            .into();
        let base_url = env::var("UPLOAD_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000/uploads".to_string());
        let max_file_size = env::var("UPLOAD_MAX_BYTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10 * 1024 * 1024);

        Self {
            base_dir,
            base_url,
            max_file_size,
        }
    }
}
