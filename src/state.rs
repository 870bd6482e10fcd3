use sqlx::SqlitePool;

use crate::config::cors::CorsConfig;
use crate::config::database::init_db_pool;
use crate::config::session::SessionConfig;
use crate::config::uploads::UploadConfig;
use crate::modules::files::storage::LocalFileStorage;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: SqlitePool,
    pub cors_config: CorsConfig,
    pub session_config: SessionConfig,
    pub upload_config: UploadConfig,
    pub storage: LocalFileStorage,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        cors_config: CorsConfig,
        session_config: SessionConfig,
        upload_config: UploadConfig,
    ) -> Self {
        let storage = LocalFileStorage::new(&upload_config);
        Self {
            db,
            cors_config,
            session_config,
            upload_config,
            storage,
        }
    }
}

pub async fn init_app_state() -> AppState {
    AppState::new(
        init_db_pool().await,
        CorsConfig::from_env(),
        SessionConfig::from_env(),
        UploadConfig::from_env(),
    )
}
