//! Structural repair of model output.
//!
//! The contract with the browser is "always five well-formed sections",
//! never raw model prose. The pipeline is a small state machine:
//!
//! ```text
//! Raw ──valid──▶ done (Accepted)
//!  │
//!  └─invalid──▶ Reformatting ──valid──▶ done (Reformatted)
//!                    │
//!                    └─invalid──▶ Fallback ──▶ done (canned text)
//! ```
//!
//! Exactly one reformat attempt is made per analysis.

use std::future::Future;

use pace_models::{fallback_analysis, has_required_structure};

use crate::error::AnalysisResult;

/// How the terminal text was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairPath {
    /// First-pass output already satisfied the contract.
    Accepted,
    /// One reformat call produced conforming text.
    Reformatted,
    /// Model output was discarded for the canned placeholder.
    Fallback,
}

/// Terminal result of the repair pipeline. The text always satisfies the
/// section contract.
#[derive(Debug, Clone)]
pub struct RepairOutcome {
    pub text: String,
    pub path: RepairPath,
}

enum RepairState {
    Raw(String),
    Reformatting(String),
    Fallback,
}

/// Run raw model output through the repair pipeline.
///
/// `reformat` issues the single extra generation call; its transport errors
/// propagate, while a structurally invalid reformat result moves the machine
/// to the fallback instead.
pub async fn repair<F, Fut>(raw: String, mut reformat: F) -> AnalysisResult<RepairOutcome>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = AnalysisResult<String>>,
{
    let mut state = RepairState::Raw(raw);

    loop {
        state = match state {
            RepairState::Raw(text) => {
                if has_required_structure(&text) {
                    return Ok(RepairOutcome {
                        text,
                        path: RepairPath::Accepted,
                    });
                }
                RepairState::Reformatting(text)
            }
            RepairState::Reformatting(text) => {
                let reformatted = reformat(text).await?;
                if has_required_structure(&reformatted) {
                    return Ok(RepairOutcome {
                        text: reformatted,
                        path: RepairPath::Reformatted,
                    });
                }
                RepairState::Fallback
            }
            RepairState::Fallback => {
                return Ok(RepairOutcome {
                    text: fallback_analysis().to_string(),
                    path: RepairPath::Fallback,
                });
            }
        };
    }
}
