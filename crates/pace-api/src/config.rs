//! API configuration.

use std::path::PathBuf;

use pace_models::MAX_VIDEO_BYTES;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Gemini model identifier used for analysis
    pub model: String,
    /// Per-IP request allowance on the analyze route
    pub rate_limit_per_minute: u32,
    /// Max accepted upload size in bytes
    pub max_upload_bytes: usize,
    /// Directory for in-flight upload temp files
    pub temp_dir: PathBuf,
    /// Directory served as the static site root
    pub public_dir: PathBuf,
    /// Environment (development/production)
    pub environment: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            model: "gemini-2.5-flash".to_string(),
            rate_limit_per_minute: 10,
            max_upload_bytes: MAX_VIDEO_BYTES,
            temp_dir: PathBuf::from(".tmp-uploads"),
            public_dir: PathBuf::from("public"),
            environment: "development".to_string(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3000),
            model: std::env::var("GEMINI_MODEL")
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "gemini-2.5-flash".to_string()),
            rate_limit_per_minute: std::env::var("RATE_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_VIDEO_BYTES),
            temp_dir: std::env::var("TEMP_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".tmp-uploads")),
            public_dir: std::env::var("PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("public")),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}
