//! The structural contract for analysis output.
//!
//! Every analysis shown to a user must contain all five section headings.
//! The browser renders the text verbatim, so the contract is enforced
//! server-side before a response ever leaves the repair pipeline.

/// Required section headings, in the order the model is asked to emit them.
///
/// Validation only checks presence; ordering is the model's responsibility
/// and is not re-verified here.
pub const SECTION_HEADINGS: [&str; 5] = [
    "1. Action Overview",
    "2. Observed Technical Points",
    "3. Performance & Risk Implications",
    "4. Coaching Cues & Focus Areas",
    "5. Disclaimer",
];

/// Check whether `text` contains every required section heading as a
/// literal substring.
pub fn has_required_structure(text: &str) -> bool {
    SECTION_HEADINGS.iter().all(|heading| text.contains(heading))
}

/// Fixed placeholder returned when the model output could not be repaired
/// into the required structure.
///
/// Always satisfies [`has_required_structure`].
pub fn fallback_analysis() -> &'static str {
    "1. Action Overview
   - A reliable action summary could not be generated from the current model response.

2. Observed Technical Points
   - Visual cues could not be extracted with enough confidence from this run.

3. Performance & Risk Implications
   - Because observations were limited, performance or loading implications remain uncertain.

4. Coaching Cues & Focus Areas
   - Re-check video quality and side-on alignment, then re-run analysis with a shorter, clearer clip.

5. Disclaimer
   - This feedback is informational and should be reviewed with a qualified cricket coach.
"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_text_is_valid() {
        let text = SECTION_HEADINGS.join("\nsome observations\n");
        assert!(has_required_structure(&text));
    }

    #[test]
    fn test_missing_single_heading_is_invalid() {
        let text = SECTION_HEADINGS[..4].join("\n");
        assert!(!has_required_structure(&text));
    }

    #[test]
    fn test_order_is_not_enforced() {
        let mut reversed: Vec<&str> = SECTION_HEADINGS.to_vec();
        reversed.reverse();
        assert!(has_required_structure(&reversed.join("\n")));
    }

    #[test]
    fn test_empty_text_is_invalid() {
        assert!(!has_required_structure(""));
    }

    #[test]
    fn test_fallback_satisfies_contract() {
        assert!(has_required_structure(fallback_analysis()));
    }
}
