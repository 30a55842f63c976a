//! Wire types for the Files and generateContent APIs.

use serde::{Deserialize, Serialize};

/// Processing state of a file registered with the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileState {
    Processing,
    Active,
    Failed,
    #[default]
    #[serde(other)]
    Unspecified,
}

/// A video registered with the provider (the remote media handle).
///
/// Created by upload, refreshed by polling. The `uri` and `mime_type`
/// reported once the file turns `ACTIVE` may differ from the upload-time
/// values; callers must use the polled snapshot when building a generation
/// request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFile {
    pub name: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub state: FileState,
}

/// Body of a `generateContent` call.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// Build a single-turn request from an ordered list of parts.
    pub fn from_parts(parts: Vec<Part>) -> Self {
        Self {
            contents: vec![Content { parts }],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

/// One part of a content turn: either inline text or a reference to an
/// uploaded file.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    FileData {
        #[serde(rename = "fileData")]
        file_data: FileData,
    },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Reference a ready remote file by its provider URI.
    pub fn from_file(file: &RemoteFile) -> Self {
        Self::FileData {
            file_data: FileData {
                file_uri: file.uri.clone(),
                mime_type: file.mime_type.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileData {
    pub file_uri: String,
    pub mime_type: String,
}

/// Response of a `generateContent` call.
///
/// The provider has shipped several response shapes over time: a direct
/// top-level `text` field and the candidate/part structure. Both are kept
/// here and normalized by [`crate::extract::response_text`] so nothing
/// downstream branches on shape again.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Normalized plain text of this response.
    pub fn text(&self) -> String {
        crate::extract::response_text(Some(self))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

/// Response part; `text` is absent for non-text parts (inline data,
/// function calls), which the extractor skips.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

/// Envelope returned by the Files upload endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponse {
    pub file: RemoteFile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_state_wire_form() {
        let state: FileState = serde_json::from_str("\"PROCESSING\"").unwrap();
        assert_eq!(state, FileState::Processing);

        // Unknown states collapse to Unspecified instead of failing.
        let state: FileState = serde_json::from_str("\"SOMETHING_NEW\"").unwrap();
        assert_eq!(state, FileState::Unspecified);
    }

    #[test]
    fn test_remote_file_camel_case() {
        let file: RemoteFile = serde_json::from_str(
            r#"{"name":"files/abc","uri":"https://files/abc","mimeType":"video/mp4","state":"ACTIVE"}"#,
        )
        .unwrap();
        assert_eq!(file.mime_type, "video/mp4");
        assert_eq!(file.state, FileState::Active);
    }

    #[test]
    fn test_part_serialization() {
        let text = serde_json::to_value(Part::text("hello")).unwrap();
        assert_eq!(text, serde_json::json!({"text": "hello"}));

        let file = RemoteFile {
            name: "files/abc".to_string(),
            uri: "https://files/abc".to_string(),
            mime_type: "video/mp4".to_string(),
            state: FileState::Active,
        };
        let part = serde_json::to_value(Part::from_file(&file)).unwrap();
        assert_eq!(
            part,
            serde_json::json!({"fileData": {"fileUri": "https://files/abc", "mimeType": "video/mp4"}})
        );
    }
}
