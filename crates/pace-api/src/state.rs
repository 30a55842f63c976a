//! Application state.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use pace_analysis::Analyzer;
use pace_gemini::{GeminiClient, PollConfig};

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    /// `None` when no provider credential is configured; analyze requests
    /// then fail with a 500 instead of the process refusing to boot.
    pub analyzer: Option<Arc<Analyzer>>,
    pub started_at: Instant,
}

impl AppState {
    /// Create application state, preparing the temp upload directory.
    pub async fn new(config: ApiConfig) -> std::io::Result<Self> {
        prepare_temp_dir(&config).await?;

        let analyzer = match GeminiClient::from_env() {
            Ok(client) => Some(Arc::new(Analyzer::new(
                Arc::new(client),
                PollConfig::default(),
            ))),
            Err(e) => {
                warn!("Gemini client unavailable, analyze requests will fail: {}", e);
                None
            }
        };

        Ok(Self::with_analyzer(config, analyzer))
    }

    /// Assemble state from parts. Used directly by tests.
    pub fn with_analyzer(config: ApiConfig, analyzer: Option<Arc<Analyzer>>) -> Self {
        Self {
            config,
            analyzer,
            started_at: Instant::now(),
        }
    }
}

/// Create the temp dir and purge leftovers from interrupted runs.
async fn prepare_temp_dir(config: &ApiConfig) -> std::io::Result<()> {
    tokio::fs::create_dir_all(&config.temp_dir).await?;

    let mut stale = 0usize;
    let mut entries = tokio::fs::read_dir(&config.temp_dir).await?;
    while let Ok(Some(entry)) = entries.next_entry().await {
        if tokio::fs::remove_file(entry.path()).await.is_ok() {
            stale += 1;
        }
    }

    if stale > 0 {
        info!(count = stale, "Purged stale temp uploads");
    }
    Ok(())
}
