use std::env;

/// Session cookie configuration.
///
/// Sessions use an opaque token delivered via an HttpOnly cookie and expire
/// absolutely `ttl_hours` after creation (no sliding refresh).
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub ttl_hours: i64,
}

impl SessionConfig {
    pub fn from_env() -> Self {
        let cookie_name =
            env::var("SESSION_COOKIE_NAME").unwrap_or_else(|_| "sid".to_string());
        let ttl_hours = env::var("SESSION_TTL_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(24);

        Self {
            cookie_name,
            ttl_hours,
        }
    }
}
