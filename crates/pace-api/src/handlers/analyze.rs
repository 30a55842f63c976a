//! Video analysis handler.

use std::path::{Path, PathBuf};

use axum::extract::multipart::{Field, Multipart, MultipartError};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use uuid::Uuid;

use pace_analysis::AnalysisRequest;
use pace_models::is_allowed_video_type;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Successful analysis response.
#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub analysis: String,
}

struct SavedUpload {
    path: PathBuf,
    mime_type: String,
}

struct ParsedForm {
    video: Option<SavedUpload>,
    side_on_confirmed: bool,
}

/// `POST /api/analyze` — analyze one uploaded side-on bowling clip.
///
/// Input validation happens entirely before the provider is contacted:
/// file presence, MIME allow-list, size cap, and the side-on confirmation.
pub async fn analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<AnalyzeResponse>> {
    let form = parse_form(&state, multipart).await?;

    let Some(upload) = form.video else {
        return Err(ApiError::bad_request("Please upload a video file."));
    };

    if !form.side_on_confirmed {
        remove_temp_file(&upload.path).await;
        return Err(ApiError::bad_request(
            "Please confirm the uploaded clip is side-on for reliable analysis.",
        ));
    }

    let Some(analyzer) = state.analyzer.clone() else {
        remove_temp_file(&upload.path).await;
        return Err(ApiError::CredentialMissing);
    };

    let request = AnalysisRequest {
        file_path: upload.path,
        mime_type: upload.mime_type,
        model: state.config.model.clone(),
    };

    // Run the analysis on a detached task. A client disconnect drops this
    // handler future, but the remote-file deletion and the local temp file
    // removal must still happen; the drop guard turns the disconnect into a
    // cancellation signal the orchestrator observes between provider calls.
    let cancel = CancellationToken::new();
    let _disconnect_guard = cancel.clone().drop_guard();
    let task = tokio::spawn(async move {
        let result = analyzer.analyze(&request, cancel).await;
        remove_temp_file(&request.file_path).await;
        result
    });

    let report = task
        .await
        .map_err(|e| ApiError::internal(format!("Analysis task failed: {e}")))?
        .map_err(|e| {
            if e.is_configuration() {
                ApiError::CredentialMissing
            } else {
                ApiError::from(e)
            }
        })?;

    Ok(Json(AnalyzeResponse {
        analysis: report.text,
    }))
}

async fn parse_form(state: &AppState, mut multipart: Multipart) -> ApiResult<ParsedForm> {
    let mut form = ParsedForm {
        video: None,
        side_on_confirmed: false,
    };

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                abandon_upload(&form).await;
                return Err(multipart_error(e, state.config.max_upload_bytes));
            }
        };

        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("video") => match save_video_field(state, field).await {
                Ok(upload) => form.video = Some(upload),
                Err(e) => {
                    abandon_upload(&form).await;
                    return Err(e);
                }
            },
            Some("sideOnConfirmed") => match field.text().await {
                Ok(value) => form.side_on_confirmed = value == "true",
                Err(e) => {
                    abandon_upload(&form).await;
                    return Err(multipart_error(e, state.config.max_upload_bytes));
                }
            },
            _ => {
                // Unknown fields are drained and ignored.
                if let Err(e) = field.bytes().await {
                    abandon_upload(&form).await;
                    return Err(multipart_error(e, state.config.max_upload_bytes));
                }
            }
        }
    }

    Ok(form)
}

/// Stream the video field to a uuid-named temp file, enforcing the MIME
/// allow-list up front and the size cap while writing.
async fn save_video_field(state: &AppState, mut field: Field<'_>) -> ApiResult<SavedUpload> {
    let mime_type = field.content_type().unwrap_or("").to_string();
    if !is_allowed_video_type(&mime_type) {
        return Err(ApiError::bad_request(format!(
            "Unsupported file type \"{mime_type}\". Please upload a video."
        )));
    }

    let path = state.config.temp_dir.join(Uuid::new_v4().to_string());
    let mut file = tokio::fs::File::create(&path)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to store upload: {e}")))?;
    let mut written = 0usize;

    loop {
        let chunk = match field.chunk().await {
            Ok(Some(chunk)) => chunk,
            Ok(None) => break,
            Err(e) => {
                remove_temp_file(&path).await;
                return Err(multipart_error(e, state.config.max_upload_bytes));
            }
        };

        written += chunk.len();
        if written > state.config.max_upload_bytes {
            remove_temp_file(&path).await;
            return Err(ApiError::payload_too_large(state.config.max_upload_bytes));
        }

        if let Err(e) = file.write_all(&chunk).await {
            remove_temp_file(&path).await;
            return Err(ApiError::internal(format!("Failed to store upload: {e}")));
        }
    }

    if let Err(e) = file.flush().await {
        remove_temp_file(&path).await;
        return Err(ApiError::internal(format!("Failed to store upload: {e}")));
    }

    Ok(SavedUpload { path, mime_type })
}

async fn abandon_upload(form: &ParsedForm) {
    if let Some(upload) = &form.video {
        remove_temp_file(&upload.path).await;
    }
}

async fn remove_temp_file(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!(path = %path.display(), error = %e, "Failed to remove temp upload");
    }
}

fn multipart_error(e: MultipartError, max_bytes: usize) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large(max_bytes)
    } else {
        ApiError::bad_request(format!("Invalid upload: {e}"))
    }
}
