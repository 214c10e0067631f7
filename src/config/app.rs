//! Application configuration loaded from environment variables.
//!
//! Every setting has a sensible local-development default so the server can
//! start from a bare checkout; a `.env` file is honored when present.

use std::path::PathBuf;

/// Runtime settings for the HTTP server.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Socket address the server binds to (`BIND_ADDR`)
    pub bind_addr: String,
    /// Directory uploaded files are written to (`UPLOAD_DIR`)
    pub upload_dir: PathBuf,
    /// Session lifetime in days (`SESSION_TTL_DAYS`)
    pub session_ttl_days: i64,
}

impl AppConfig {
    /// Loads the configuration from the environment, falling back to
    /// defaults for anything unset.
    #[must_use]
    pub fn from_env() -> Self {
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string());
        let upload_dir = std::env::var("UPLOAD_DIR")
            .map_or_else(|_| PathBuf::from("uploads"), PathBuf::from);
        let session_ttl_days = std::env::var("SESSION_TTL_DAYS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(7);

        Self {
            bind_addr,
            upload_dir,
            session_ttl_days,
        }
    }
}
