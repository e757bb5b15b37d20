//! Tempelhof - Document Ingestion Service Core
//!
//! Tempelhof takes an uploaded file, determines its type from content alone,
//! extracts plain text (falling back to OCR for scanned documents), detects
//! the dominant language, and returns a structured result. Extraction runs
//! under a per-request wall-clock deadline so malformed or adversarial input
//! cannot hang the service, and every temporarily stored upload is removed on
//! every exit path.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tempelhof::{ExtractionConfig, Pipeline};
//!
//! # #[tokio::main]
//! # async fn main() -> tempelhof::Result<()> {
//! let pipeline = Pipeline::new(ExtractionConfig::default());
//! let result = pipeline.extract(b"Plain text payload", "note.txt").await?;
//! println!("{} [{}]", result.text, result.language);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Sniffer** (`sniff`): content-only type detection
//! - **Extractors** (`extractors`): one strategy per supported type, with the
//!   PDF strategy falling back to per-page OCR when no text layer exists
//! - **Language detection** (`language`): best-effort, never fails a request
//! - **Pipeline** (`pipeline`): orchestration, bounded execution, spool
//!   storage with scoped cleanup
//! - **API** (`api`, feature-gated): Axum HTTP surface

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod language;
pub mod ocr;
pub mod pipeline;
pub mod sniff;
pub mod types;

#[cfg(feature = "api")]
pub mod api;

pub use config::{ExtractionConfig, LanguageConfig};
pub use error::{Result, TempelhofError};
pub use language::detect_language;
pub use pipeline::{Pipeline, run_bounded};
pub use sniff::sniff_bytes;
pub use types::{DetectedType, ExtractionOutcome, ExtractionResult};
