//! Analysis orchestrator.

use std::path::PathBuf;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use pace_gemini::{
    GeminiClient, GenerateContentRequest, Part, PollConfig, RemoteFile,
};
use pace_models::AnalysisReport;

use crate::error::{AnalysisError, AnalysisResult};
use crate::prompt::{reformat_prompt, COACH_PROMPT};
use crate::repair::{repair, RepairPath};

/// One analysis invocation. Owns the local temp file path for its lifetime;
/// the caller removes the file at request end regardless of outcome.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub file_path: PathBuf,
    pub mime_type: String,
    pub model: String,
}

/// Sequences upload, readiness wait, generation, repair, and cleanup.
pub struct Analyzer {
    client: Arc<GeminiClient>,
    poll: PollConfig,
}

impl Analyzer {
    pub fn new(client: Arc<GeminiClient>, poll: PollConfig) -> Self {
        Self { client, poll }
    }

    /// Analyze one uploaded clip and return a guaranteed-structured report.
    ///
    /// The remote file created by the upload is deleted on every exit path,
    /// success or failure; deletion errors are logged and never replace the
    /// primary result. Once `cancel` fires no further provider calls are
    /// issued except that mandatory delete.
    pub async fn analyze(
        &self,
        request: &AnalysisRequest,
        cancel: CancellationToken,
    ) -> AnalysisResult<AnalysisReport> {
        if cancel.is_cancelled() {
            return Err(AnalysisError::Cancelled);
        }

        let uploaded = self
            .client
            .upload_file(&request.file_path, &request.mime_type)
            .await?;

        let result = self.run(&uploaded, request, &cancel).await;

        if let Err(e) = self.client.delete_file(&uploaded.name).await {
            warn!(name = %uploaded.name, error = %e, "Failed to delete remote file");
        }

        result
    }

    async fn run(
        &self,
        uploaded: &RemoteFile,
        request: &AnalysisRequest,
        cancel: &CancellationToken,
    ) -> AnalysisResult<AnalysisReport> {
        // A client disconnect stops the poll loop early; the in-flight
        // status fetch is simply dropped and cleanup proceeds with the
        // handle from the upload.
        let ready = tokio::select! {
            result = self.client.wait_for_file(&uploaded.name, &self.poll) => result?,
            _ = cancel.cancelled() => return Err(AnalysisError::Cancelled),
        };

        if cancel.is_cancelled() {
            return Err(AnalysisError::Cancelled);
        }

        // The polled snapshot, not the upload-time handle: uri and mime type
        // can change once the file turns ACTIVE.
        let generation = GenerateContentRequest::from_parts(vec![
            Part::from_file(&ready),
            Part::text(COACH_PROMPT),
        ]);
        let response = self
            .client
            .generate_content(&request.model, &generation)
            .await?;
        let raw = response.text().trim().to_string();

        if cancel.is_cancelled() {
            return Err(AnalysisError::Cancelled);
        }

        let outcome = repair(raw, |text| {
            let client = Arc::clone(&self.client);
            let model = request.model.clone();
            async move {
                let body =
                    GenerateContentRequest::from_parts(vec![Part::text(reformat_prompt(&text))]);
                let response = client.generate_content(&model, &body).await?;
                Ok(response.text().trim().to_string())
            }
        })
        .await?;

        match outcome.path {
            RepairPath::Accepted => {}
            RepairPath::Reformatted => info!("Model output repaired via reformat pass"),
            RepairPath::Fallback => warn!("Model output discarded, returning fallback analysis"),
        }

        Ok(AnalysisReport::new(outcome.text))
    }
}
