//! Readiness polling for uploaded files.

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::error::{GeminiError, GeminiResult};
use crate::types::{FileState, RemoteFile};

/// Polling cadence and wall-clock bound.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Pause between status fetches.
    pub interval: Duration,
    /// Hard deadline measured from the first fetch.
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(1500),
            timeout: Duration::from_secs(180),
        }
    }
}

/// Fetch a file's state until it leaves `PROCESSING`.
///
/// `fetch` is called once per iteration and must return a fresh snapshot.
/// The returned snapshot is the one callers must use afterwards; its `uri`
/// and `mime_type` can differ from the upload-time values.
///
/// # Errors
///
/// - [`GeminiError::ProcessingFailed`] when the provider reports `FAILED`.
/// - [`GeminiError::ProcessingTimeout`] when the deadline passes while the
///   file is still `PROCESSING`.
pub async fn wait_until_active<F, Fut>(config: &PollConfig, mut fetch: F) -> GeminiResult<RemoteFile>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = GeminiResult<RemoteFile>>,
{
    let deadline = Instant::now() + config.timeout;
    let mut file = fetch().await?;

    while file.state == FileState::Processing {
        if Instant::now() >= deadline {
            return Err(GeminiError::ProcessingTimeout);
        }
        sleep(config.interval).await;
        file = fetch().await?;
        debug!(name = %file.name, state = ?file.state, "Polled file state");
    }

    if file.state == FileState::Failed {
        return Err(GeminiError::ProcessingFailed);
    }

    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_in(state: FileState, uri: &str) -> RemoteFile {
        RemoteFile {
            name: "files/abc".to_string(),
            uri: uri.to_string(),
            mime_type: "video/mp4".to_string(),
            state,
        }
    }

    #[tokio::test]
    async fn test_active_on_first_poll_returns_immediately() {
        let config = PollConfig::default();
        let file = wait_until_active(&config, || async {
            Ok(file_in(FileState::Active, "https://files/ready"))
        })
        .await
        .unwrap();
        assert_eq!(file.state, FileState::Active);
    }

    #[tokio::test]
    async fn test_failed_on_first_poll_errors_immediately() {
        let config = PollConfig::default();
        let start = Instant::now();
        let err = wait_until_active(&config, || async {
            Ok(file_in(FileState::Failed, ""))
        })
        .await
        .unwrap_err();
        assert!(matches!(err, GeminiError::ProcessingFailed));
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stuck_processing_times_out_at_deadline() {
        let config = PollConfig::default();
        let start = Instant::now();
        let err = wait_until_active(&config, || async {
            Ok(file_in(FileState::Processing, ""))
        })
        .await
        .unwrap_err();
        assert!(matches!(err, GeminiError::ProcessingTimeout));
        // Not a moment earlier than the 180s deadline.
        assert!(start.elapsed() >= Duration::from_secs(178));
        assert!(start.elapsed() <= Duration::from_secs(182));
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_latest_snapshot_after_processing() {
        let config = PollConfig::default();
        let mut polls = 0;
        let file = wait_until_active(&config, move || {
            polls += 1;
            let state = if polls <= 2 {
                file_in(FileState::Processing, "https://files/stale")
            } else {
                file_in(FileState::Active, "https://files/fresh")
            };
            async move { Ok(state) }
        })
        .await
        .unwrap();
        // The caller must see the post-processing snapshot, not the
        // upload-time one.
        assert_eq!(file.uri, "https://files/fresh");
    }

    #[tokio::test]
    async fn test_fetch_errors_propagate() {
        let config = PollConfig::default();
        let err = wait_until_active(&config, || async {
            Err(GeminiError::request_failed("boom"))
        })
        .await
        .unwrap_err();
        assert!(matches!(err, GeminiError::RequestFailed(_)));
    }
}
