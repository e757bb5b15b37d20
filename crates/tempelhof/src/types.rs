//! Core data types shared across the extraction pipeline.

use serde::{Deserialize, Serialize};

use crate::error::TempelhofError;

/// Canonical document type, derived from content sniffing only.
///
/// The client-declared filename and content-type header are never consulted:
/// renaming a PDF to `.txt` must not change its classification. `Unknown` is
/// a valid result, not an error - it short-circuits extraction to empty text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectedType {
    Pdf,
    Docx,
    #[serde(rename = "txt")]
    PlainText,
    Image,
    Unknown,
}

impl DetectedType {
    /// Wire representation used in API responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectedType::Pdf => "pdf",
            DetectedType::Docx => "docx",
            DetectedType::PlainText => "txt",
            DetectedType::Image => "image",
            DetectedType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for DetectedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final result of one pipeline invocation.
///
/// Immutable once constructed; returned to the caller and then discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Extracted plain text. Empty for `Unknown` inputs.
    pub text: String,
    /// ISO 639-3 language code of the extracted text, or `"unknown"`.
    pub language: String,
    /// Content-derived document type.
    #[serde(rename = "type")]
    pub detected_type: DetectedType,
    /// Sanitized client-declared filename.
    #[serde(rename = "filename")]
    pub source_filename: String,
}

/// Result of running one extraction strategy under the bounded executor.
#[derive(Debug)]
pub enum ExtractionOutcome {
    /// The strategy finished within the deadline and produced text.
    Completed(String),
    /// The deadline elapsed; the in-flight work was abandoned.
    TimedOut,
    /// The strategy failed on the given input.
    Failed(TempelhofError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detected_type_wire_names() {
        assert_eq!(DetectedType::Pdf.as_str(), "pdf");
        assert_eq!(DetectedType::Docx.as_str(), "docx");
        assert_eq!(DetectedType::PlainText.as_str(), "txt");
        assert_eq!(DetectedType::Image.as_str(), "image");
        assert_eq!(DetectedType::Unknown.as_str(), "unknown");
    }

    #[test]
    fn test_detected_type_serde_roundtrip() {
        let json = serde_json::to_string(&DetectedType::PlainText).unwrap();
        assert_eq!(json, "\"txt\"");
        let back: DetectedType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, DetectedType::PlainText);
    }

    #[test]
    fn test_extraction_result_serializes_wire_field_names() {
        let result = ExtractionResult {
            text: "hello".to_string(),
            language: "eng".to_string(),
            detected_type: DetectedType::Pdf,
            source_filename: "report.pdf".to_string(),
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["text"], "hello");
        assert_eq!(value["language"], "eng");
        assert_eq!(value["type"], "pdf");
        assert_eq!(value["filename"], "report.pdf");
    }
}
