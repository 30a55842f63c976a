//! Gemini HTTP client.

use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info};

use crate::error::{GeminiError, GeminiResult};
use crate::poll::{wait_until_active, PollConfig};
use crate::types::{GenerateContentRequest, GenerateContentResponse, RemoteFile, UploadResponse};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Configuration for the Gemini client.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API base URL, overridable for tests.
    pub base_url: String,
    /// Request timeout. Generous because video uploads are large.
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(300),
        }
    }
}

impl GeminiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            timeout: Duration::from_secs(
                std::env::var("GEMINI_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(300),
            ),
        }
    }
}

/// Client for the Gemini Files and generateContent APIs.
#[derive(Debug)]
pub struct GeminiClient {
    api_key: String,
    http: Client,
    base_url: String,
}

impl GeminiClient {
    /// Create a new client with an explicit key.
    pub fn new(api_key: impl Into<String>, config: GeminiConfig) -> GeminiResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GeminiError::CredentialMissing);
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(GeminiError::Network)?;

        Ok(Self {
            api_key,
            http,
            base_url: config.base_url,
        })
    }

    /// Create from environment variables (`GEMINI_API_KEY` required).
    pub fn from_env() -> GeminiResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| GeminiError::CredentialMissing)?;
        Self::new(api_key.trim().to_string(), GeminiConfig::from_env())
    }

    /// Register a local video with the Files API.
    ///
    /// Uses the resumable upload protocol: a start request that yields a
    /// session URL, then one `upload, finalize` call carrying the bytes.
    /// The returned handle usually starts in the `PROCESSING` state.
    pub async fn upload_file(&self, path: &Path, mime_type: &str) -> GeminiResult<RemoteFile> {
        let bytes = tokio::fs::read(path).await?;
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        debug!(size = bytes.len(), mime = mime_type, "Starting resumable upload");

        let start_url = format!("{}/upload/v1beta/files?key={}", self.base_url, self.api_key);
        let start = self
            .http
            .post(&start_url)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", bytes.len())
            .header("X-Goog-Upload-Header-Content-Type", mime_type)
            .json(&serde_json::json!({ "file": { "display_name": display_name } }))
            .send()
            .await?;

        if !start.status().is_success() {
            return Err(self.error_from_response(start).await);
        }

        let session_url = start
            .headers()
            .get("x-goog-upload-url")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                GeminiError::invalid_response("upload start response missing session URL")
            })?;

        let finalize = self
            .http
            .post(&session_url)
            .header("X-Goog-Upload-Command", "upload, finalize")
            .header("X-Goog-Upload-Offset", "0")
            .body(bytes)
            .send()
            .await?;

        if !finalize.status().is_success() {
            return Err(self.error_from_response(finalize).await);
        }

        let uploaded: UploadResponse = finalize.json().await?;
        info!(name = %uploaded.file.name, "Uploaded video to Gemini");
        Ok(uploaded.file)
    }

    /// Fetch the current snapshot of an uploaded file.
    ///
    /// `name` is the provider-assigned resource name, e.g. `files/abc123`.
    pub async fn get_file(&self, name: &str) -> GeminiResult<RemoteFile> {
        let url = format!("{}/v1beta/{}?key={}", self.base_url, name, self.api_key);
        let response = self.http.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(self.error_from_response(response).await);
        }

        Ok(response.json().await?)
    }

    /// Poll an uploaded file until it leaves `PROCESSING`.
    pub async fn wait_for_file(&self, name: &str, config: &PollConfig) -> GeminiResult<RemoteFile> {
        wait_until_active(config, || self.get_file(name)).await
    }

    /// Delete an uploaded file from the provider.
    pub async fn delete_file(&self, name: &str) -> GeminiResult<()> {
        let url = format!("{}/v1beta/{}?key={}", self.base_url, name, self.api_key);
        let response = self.http.delete(&url).send().await?;

        if !response.status().is_success() {
            return Err(self.error_from_response(response).await);
        }

        debug!(name = %name, "Deleted remote file");
        Ok(())
    }

    /// Issue a `generateContent` call against `model`.
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> GeminiResult<GenerateContentResponse> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );

        let response = self.http.post(&url).json(request).send().await?;

        if !response.status().is_success() {
            return Err(self.error_from_response(response).await);
        }

        Ok(response.json().await?)
    }

    async fn error_from_response(&self, response: reqwest::Response) -> GeminiError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        GeminiError::request_failed(format!("Gemini API returned {}: {}", status, body))
    }
}
