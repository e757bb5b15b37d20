//! Language detection using whatlang.
//!
//! Detection is best-effort and must never fail a request: every problem
//! (empty input, ambiguous text, low confidence) collapses to `"unknown"`.

use whatlang::detect;

use crate::config::LanguageConfig;

/// Sentinel returned whenever no language can be determined.
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Detect the dominant language of `text` as an ISO 639-3 code.
///
/// Empty or whitespace-only input yields `"unknown"` without invoking the
/// detector - statistical detection on empty input is undefined. Detections
/// below the configured confidence floor are also reported as `"unknown"`.
pub fn detect_language(text: &str, config: &LanguageConfig) -> String {
    if text.trim().is_empty() {
        return UNKNOWN_LANGUAGE.to_string();
    }

    match detect(text) {
        Some(info) if info.confidence() >= config.min_confidence => info.lang().code().to_string(),
        _ => UNKNOWN_LANGUAGE.to_string(),
    }
}
