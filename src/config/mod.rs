//! Configuration modules.
//!
//! Each submodule handles one aspect of configuration, loaded from
//! environment variables with sensible local defaults.
//!
//! - [`cors`]: allowed CORS origins
//! - [`database`]: SQLite connection pool and migrations
//! - [`session`]: session cookie name and absolute TTL
//! - [`uploads`]: upload sink directory and public URL prefix

pub mod cors;
pub mod database;
pub mod session;
pub mod uploads;
