//! Request-scoped extraction orchestration.
//!
//! One [`Pipeline::extract`] call drives a single upload through
//! sniffing, bounded extraction, and language detection:
//!
//! ```text
//! Received -> Sniffed -> Extracting -> Completed | Failed | TimedOut
//! ```
//!
//! The spooled upload is removed on every terminal transition - success,
//! failure, timeout, or unwind - via the spool guard. Concurrent invocations
//! are fully independent: each owns its spool file and its deadline.

use crate::config::ExtractionConfig;
use crate::error::{Result, TempelhofError};
use crate::extractors;
use crate::language::detect_language;
use crate::sniff::sniff_bytes;
use crate::types::{DetectedType, ExtractionOutcome, ExtractionResult};

mod bounded;
mod spool;

pub use bounded::run_bounded;
pub use spool::{SpooledUpload, sanitize_filename};

/// The extraction pipeline. Cheap to share behind an `Arc`.
#[derive(Debug)]
pub struct Pipeline {
    config: ExtractionConfig,
}

impl Pipeline {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Run one upload through the full pipeline.
    ///
    /// # Errors
    ///
    /// - [`TempelhofError::Validation`] for an empty declared filename
    /// - [`TempelhofError::PayloadTooLarge`] when the payload exceeds the
    ///   configured maximum
    /// - [`TempelhofError::Timeout`] when the extraction deadline elapses
    /// - extraction errors for malformed content of a recognized type
    ///
    /// An unrecognized content type is *not* an error: the result carries
    /// empty text and `DetectedType::Unknown`.
    pub async fn extract(&self, content: &[u8], declared_filename: &str) -> Result<ExtractionResult> {
        if declared_filename.trim().is_empty() {
            return Err(TempelhofError::validation("empty filename"));
        }

        if content.len() > self.config.max_upload_bytes {
            tracing::debug!(
                actual = content.len(),
                limit = self.config.max_upload_bytes,
                "Rejecting oversized payload"
            );
            return Err(TempelhofError::PayloadTooLarge {
                limit: self.config.max_upload_bytes,
            });
        }

        // Guard armed before any fallible extraction work; dropping it on any
        // exit path below deletes the stored upload exactly once.
        let upload =
            SpooledUpload::write(&self.config.spool_dir, declared_filename, content).await?;

        let data = tokio::fs::read(upload.path()).await?;
        let detected = sniff_bytes(&data);

        tracing::debug!(
            filename = upload.sanitized_name(),
            detected = %detected,
            size = data.len(),
            "Dispatching upload"
        );

        let outcome = match detected {
            // Unknown short-circuits extraction: empty text, no failure.
            DetectedType::Unknown => ExtractionOutcome::Completed(String::new()),
            kind => {
                run_bounded(
                    self.config.extraction_deadline(),
                    extractors::extract_with(kind, &data, &self.config),
                )
                .await
            }
        };

        match outcome {
            ExtractionOutcome::Completed(text) => {
                let language = detect_language(&text, &self.config.language);
                Ok(ExtractionResult {
                    text,
                    language,
                    detected_type: detected,
                    source_filename: upload.sanitized_name().to_string(),
                })
            }
            ExtractionOutcome::TimedOut => Err(TempelhofError::Timeout {
                seconds: self.config.extraction_timeout_secs,
            }),
            ExtractionOutcome::Failed(error) => Err(error),
        }
    }
}
