//! Client configuration

use std::path::PathBuf;

use crate::error::{ClientError, ClientResult};

/// Environment variable carrying the backend project URL
pub const ENV_BACKEND_URL: &str = "LMS_BACKEND_URL";
/// Environment variable carrying the publishable (anon) API key
pub const ENV_ANON_KEY: &str = "LMS_ANON_KEY";
/// Environment variable overriding the local cache directory
pub const ENV_CACHE_DIR: &str = "LMS_CACHE_DIR";

/// Client configuration for connecting to the hosted backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL (e.g., "https://project.example.co")
    pub base_url: String,

    /// Publishable anon key. Safe to embed in the client: row-level
    /// security on the backend is what actually protects the tables.
    pub anon_key: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Directory for local caches (role cache, persisted session)
    pub cache_dir: PathBuf,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            anon_key: anon_key.into(),
            timeout: 30,
            cache_dir: PathBuf::from(".lms-cache"),
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the local cache directory
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    /// Load configuration from the environment (reading `.env` if present).
    ///
    /// Requires `LMS_BACKEND_URL` and `LMS_ANON_KEY`; auth and table calls
    /// will fail until both are configured.
    pub fn from_env() -> ClientResult<Self> {
        dotenv::dotenv().ok();

        let base_url = std::env::var(ENV_BACKEND_URL).map_err(|_| {
            tracing::warn!("missing {ENV_BACKEND_URL}; set it in the environment or .env");
            ClientError::Config(format!("{ENV_BACKEND_URL} is not set"))
        })?;
        let anon_key = std::env::var(ENV_ANON_KEY).map_err(|_| {
            tracing::warn!("missing {ENV_ANON_KEY}; set it in the environment or .env");
            ClientError::Config(format!("{ENV_ANON_KEY} is not set"))
        })?;

        let mut config = Self::new(base_url, anon_key);
        if let Ok(dir) = std::env::var(ENV_CACHE_DIR) {
            config.cache_dir = PathBuf::from(dir);
        }
        Ok(config)
    }

    /// Create a backend client from this configuration
    pub fn build_client(&self) -> ClientResult<crate::BackendClient> {
        crate::BackendClient::new(self.clone())
    }
}
