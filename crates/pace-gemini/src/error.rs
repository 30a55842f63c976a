//! Gemini client error types.

use thiserror::Error;

pub type GeminiResult<T> = Result<T, GeminiError>;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("Server Gemini API key is not configured. Contact the administrator.")]
    CredentialMissing,

    #[error("Gemini failed to process this video file.")]
    ProcessingFailed,

    #[error("Video processing timed out. Try a shorter clip.")]
    ProcessingTimeout,

    #[error("Gemini API request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid Gemini response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GeminiError {
    pub fn request_failed(msg: impl Into<String>) -> Self {
        Self::RequestFailed(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Whether the failure is a provider/configuration problem rather than
    /// something the user can correct by re-uploading.
    pub fn is_configuration(&self) -> bool {
        matches!(self, GeminiError::CredentialMissing)
    }
}
