//! Core analysis orchestration.
//!
//! Drives one uploaded clip through the full provider round trip:
//! upload, readiness wait, generation, structural repair, and guaranteed
//! cleanup of the remote file. The result handed back to the HTTP layer is
//! always well-structured text satisfying the five-section contract.

pub mod analyzer;
pub mod error;
pub mod prompt;
pub mod repair;

pub use analyzer::{AnalysisRequest, Analyzer};
pub use error::{AnalysisError, AnalysisResult};
pub use prompt::{reformat_prompt, COACH_PROMPT};
pub use repair::{repair, RepairOutcome, RepairPath};
