//! Database connection pool initialization.
//!
//! The connection string is read from `DATABASE_URL` and defaults to a local
//! SQLite file. Migrations under `./migrations` are applied on startup, so a
//! fresh checkout boots without tooling.

use std::env;
use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

/// Initializes the SQLite connection pool and runs pending migrations.
///
/// # Panics
///
/// Panics if the database cannot be opened or a migration fails; there is
/// no useful way to continue serving without a store.
pub async fn init_db_pool() -> SqlitePool {
    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://classhub.db".to_string());

    let options = SqliteConnectOptions::from_str(&database_url)
        .expect("Invalid DATABASE_URL")
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}
