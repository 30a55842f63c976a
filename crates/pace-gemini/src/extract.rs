//! Response-text extraction.

use crate::types::GenerateContentResponse;

/// Normalize a provider response into plain text.
///
/// Precedence (load-bearing, covers historical response shapes):
/// 1. Absent response → empty string.
/// 2. Direct top-level `text` field → returned as-is.
/// 3. First candidate's content parts, text fragments joined by newlines
///    and trimmed, skipping non-text parts.
pub fn response_text(response: Option<&GenerateContentResponse>) -> String {
    let Some(response) = response else {
        return String::new();
    };

    if let Some(text) = &response.text {
        return text.clone();
    }

    let parts = response
        .candidates
        .first()
        .and_then(|candidate| candidate.content.as_ref())
        .map(|content| content.parts.as_slice())
        .unwrap_or_default();

    parts
        .iter()
        .filter_map(|part| part.text.as_deref())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
