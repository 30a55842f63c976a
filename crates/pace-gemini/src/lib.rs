//! Client for Google's Gemini API.
//!
//! This crate drives the two provider surfaces the analysis flow needs:
//! the Files API (upload, status, delete — videos must be registered with
//! the provider and reach the `ACTIVE` state before they can be referenced)
//! and `generateContent`.
//!
//! The readiness poller and the response-text extractor live here too, so
//! callers never branch on provider-specific shapes.

pub mod client;
pub mod error;
pub mod extract;
pub mod poll;
pub mod types;

pub use client::{GeminiClient, GeminiConfig};
pub use error::{GeminiError, GeminiResult};
pub use extract::response_text;
pub use poll::{wait_until_active, PollConfig};
pub use types::{FileState, GenerateContentRequest, GenerateContentResponse, Part, RemoteFile};
