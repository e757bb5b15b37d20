//! Image extraction: OCR straight over the pixel data.

use async_trait::async_trait;

use crate::config::ExtractionConfig;
use crate::error::Result;
use crate::ocr::OcrEngine;

use super::{Extractor, run_blocking};

/// Image extractor; uses the same language hint set as the PDF OCR fallback.
pub struct ImageExtractor;

impl ImageExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Extractor for ImageExtractor {
    async fn extract(&self, content: &[u8], config: &ExtractionConfig) -> Result<String> {
        let data = content.to_vec();
        let engine = OcrEngine::new(config.ocr_languages.clone());

        run_blocking(move || engine.recognize(&data)).await
    }
}
