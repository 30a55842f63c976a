//! Orchestration error types.

use thiserror::Error;

pub type AnalysisResult<T> = Result<T, AnalysisError>;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Gemini(#[from] pace_gemini::GeminiError),

    #[error("Analysis cancelled by the client.")]
    Cancelled,
}

impl AnalysisError {
    /// Whether the failure stems from server configuration rather than the
    /// provider or the clip itself.
    pub fn is_configuration(&self) -> bool {
        matches!(self, AnalysisError::Gemini(e) if e.is_configuration())
    }
}
