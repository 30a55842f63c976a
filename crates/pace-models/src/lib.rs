//! Shared data models for the PaceCoach backend.
//!
//! This crate provides:
//! - The mandatory five-section contract every analysis must satisfy
//! - The canned fallback analysis used when the model output cannot be repaired
//! - Upload constraints (size cap and the video MIME allow-list)
//! - The analysis report type returned to callers

pub mod report;
pub mod section;
pub mod upload;

// Re-export common types
pub use report::AnalysisReport;
pub use section::{fallback_analysis, has_required_structure, SECTION_HEADINGS};
pub use upload::{is_allowed_video_type, is_video_mime, ALLOWED_VIDEO_TYPES, MAX_VIDEO_BYTES};
