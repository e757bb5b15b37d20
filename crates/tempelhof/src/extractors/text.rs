//! Plain text extraction with heuristic encoding detection.
//!
//! Naive UTF-8 assumptions silently corrupt regional single-byte encodings,
//! so decoding is two-tiered: a clean decode with the detected encoding, and
//! a salvage path for content no detector is confident about. The salvage
//! path never fails - plain text extraction always recovers something.

use async_trait::async_trait;
use chardetng::EncodingDetector;
use encoding_rs::Encoding;

use crate::config::ExtractionConfig;
use crate::error::Result;

use super::{Extractor, run_blocking};

/// Regional encodings probed by the salvage path, most likely first.
const SALVAGE_ENCODINGS: &[&str] = &[
    "windows-1250",
    "iso-8859-2",
    "windows-1252",
    "windows-1251",
    "iso-8859-5",
];

/// Minimum quality score for a salvage candidate to be accepted.
const MIN_SALVAGE_CONFIDENCE: f64 = 0.5;

/// Plain text extractor.
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlainTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Extractor for PlainTextExtractor {
    async fn extract(&self, content: &[u8], _config: &ExtractionConfig) -> Result<String> {
        let data = content.to_vec();
        run_blocking(move || {
            Ok(match try_decode(&data) {
                Ok(text) => text,
                Err(err) => {
                    tracing::debug!(
                        "Clean decode as {} failed, salvaging text content",
                        err.encoding
                    );
                    salvage_decode(&data)
                }
            })
        })
        .await
    }
}

/// A clean decode attempt that did not succeed.
#[derive(Debug)]
pub(crate) struct DecodeError {
    /// Name of the encoding that was tried.
    pub(crate) encoding: &'static str,
}

/// Attempt a clean decode using BOM sniffing, then statistical detection.
///
/// Returns `Err` when the chosen encoding cannot represent the input without
/// replacement characters; the caller decides how to fall back.
pub(crate) fn try_decode(content: &[u8]) -> std::result::Result<String, DecodeError> {
    if content.is_empty() {
        return Ok(String::new());
    }

    if let Some((encoding, _bom_length)) = Encoding::for_bom(content) {
        let (decoded, _, had_errors) = encoding.decode(content);
        if had_errors {
            return Err(DecodeError {
                encoding: encoding.name(),
            });
        }
        return Ok(decoded.into_owned());
    }

    let mut detector = EncodingDetector::new();
    detector.feed(content, true);
    let encoding = detector.guess(None, true);

    let (decoded, _, had_errors) = encoding.decode(content);
    if had_errors {
        return Err(DecodeError {
            encoding: encoding.name(),
        });
    }

    Ok(decoded.into_owned())
}

/// General-purpose recovery for content the detector could not decode.
///
/// Probes a fixed set of regional encodings and keeps the first clean decode
/// that looks like text; as a last resort, decodes lossily and scrubs the
/// residue.
pub(crate) fn salvage_decode(content: &[u8]) -> String {
    for name in SALVAGE_ENCODINGS {
        if let Some(encoding) = Encoding::for_label(name.as_bytes()) {
            let (decoded, _, had_errors) = encoding.decode(content);
            if !had_errors && text_confidence(&decoded) > MIN_SALVAGE_CONFIDENCE {
                return decoded.into_owned();
            }
        }
    }

    scrub(&String::from_utf8_lossy(content))
}

/// Share of characters that are neither replacement markers nor stray
/// control characters.
fn text_confidence(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }

    let mut total = 0usize;
    let mut bad = 0usize;
    for ch in text.chars() {
        total += 1;
        if ch == '\u{FFFD}' || (ch.is_control() && !matches!(ch, '\n' | '\r' | '\t')) {
            bad += 1;
        }
    }

    1.0 - (bad as f64 / total as f64)
}

/// Remove replacement markers and non-whitespace control characters.
fn scrub(text: &str) -> String {
    text.chars()
        .filter(|&ch| ch != '\u{FFFD}' && (!ch.is_control() || matches!(ch, '\n' | '\r' | '\t')))
        .collect()
}
