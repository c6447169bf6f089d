//! API base URL validation and artifact URL resolution.
//!
//! The status endpoint returns annotated-video paths relative to the
//! API host (e.g. `/videos/annotated_x.mp4`); joining them with the
//! configured base URL happens here so every consumer agrees on the
//! result.

use crate::error::CoreError;

/// Validate that an API base URL is non-empty and uses http(s).
pub fn validate_api_url(url: &str) -> Result<(), CoreError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "API base URL must not be empty".to_string(),
        ));
    }
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return Err(CoreError::Validation(format!(
            "API base URL must start with http:// or https://, got: '{trimmed}'"
        )));
    }
    Ok(())
}

/// Join an artifact path returned by the API with the API base URL.
///
/// Already-absolute URLs pass through unchanged; trailing/leading
/// slashes are normalized so `base/` + `/path` yields a single slash.
pub fn resolve_artifact_url(base_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = base_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}
