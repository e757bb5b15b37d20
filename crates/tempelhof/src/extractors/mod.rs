//! Extraction strategies, one per supported document type.
//!
//! Dispatch is a closed `match` over [`DetectedType`] so that adding a type is
//! a compile-time-checked extension point. Every strategy runs its native or
//! CPU-heavy work on the blocking thread pool, which keeps the bounded
//! executor's deadline enforceable: the awaiting caller can always be released
//! while an abandoned blocking task drains in the background.

use async_trait::async_trait;

use crate::config::ExtractionConfig;
use crate::error::{Result, TempelhofError};
use crate::types::DetectedType;

pub mod docx;
pub mod image;
pub mod pdf;
pub mod text;

pub use docx::DocxExtractor;
pub use image::ImageExtractor;
pub use pdf::PdfExtractor;
pub use text::PlainTextExtractor;

/// One extraction strategy.
///
/// Implementations operate only on content already matched to their type and
/// must map corrupt input to an error instead of panicking.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Extract plain text from raw document content.
    async fn extract(&self, content: &[u8], config: &ExtractionConfig) -> Result<String>;
}

/// Dispatch `content` to the strategy matching `detected`.
///
/// `Unknown` yields empty text: absence of a known type is a valid outcome,
/// not a failure.
pub async fn extract_with(
    detected: DetectedType,
    content: &[u8],
    config: &ExtractionConfig,
) -> Result<String> {
    match detected {
        DetectedType::Pdf => PdfExtractor::new().extract(content, config).await,
        DetectedType::Docx => DocxExtractor::new().extract(content, config).await,
        DetectedType::PlainText => PlainTextExtractor::new().extract(content, config).await,
        DetectedType::Image => ImageExtractor::new().extract(content, config).await,
        DetectedType::Unknown => Ok(String::new()),
    }
}

/// Run a blocking extraction closure on the blocking thread pool.
pub(crate) async fn run_blocking<T, F>(task: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| TempelhofError::Other(format!("Extraction task failed: {}", e)))?
}
