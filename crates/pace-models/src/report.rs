//! Analysis result type.

use serde::{Deserialize, Serialize};

use crate::section::has_required_structure;

/// Final analysis produced for one uploaded clip.
///
/// Immutable once constructed; `structurally_valid` records whether the text
/// passed the section contract at creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub text: String,
    pub structurally_valid: bool,
}

impl AnalysisReport {
    /// Build a report, evaluating the section contract once.
    pub fn new(text: String) -> Self {
        let structurally_valid = has_required_structure(&text);
        Self {
            text,
            structurally_valid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::{fallback_analysis, SECTION_HEADINGS};

    #[test]
    fn test_report_records_validity() {
        let valid = AnalysisReport::new(SECTION_HEADINGS.join("\n"));
        assert!(valid.structurally_valid);

        let invalid = AnalysisReport::new("free-form prose".to_string());
        assert!(!invalid.structurally_valid);
    }

    #[test]
    fn test_fallback_report_is_valid() {
        let report = AnalysisReport::new(fallback_analysis().to_string());
        assert!(report.structurally_valid);
    }
}
