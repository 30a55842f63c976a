//! Upload constraints for incoming video files.

/// Maximum accepted upload size (250 MiB).
pub const MAX_VIDEO_BYTES: usize = 250 * 1024 * 1024;

/// Video MIME types the server accepts. This allow-list is the source of
/// truth for enforcement; anything else is rejected before the provider is
/// contacted.
pub const ALLOWED_VIDEO_TYPES: [&str; 7] = [
    "video/mp4",
    "video/quicktime",
    "video/x-msvideo",
    "video/webm",
    "video/x-matroska",
    "video/mpeg",
    "video/3gpp",
];

/// Check a MIME type against the server-side allow-list.
pub fn is_allowed_video_type(mime: &str) -> bool {
    ALLOWED_VIDEO_TYPES.contains(&mime)
}

/// Loose `video/` prefix check. Advisory only, mirroring the browser-side
/// hint; never used for server enforcement.
pub fn is_video_mime(mime: &str) -> bool {
    mime.starts_with("video/")
}
