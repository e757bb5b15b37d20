//! PDF extraction with OCR fallback for scanned documents.
//!
//! The embedded text layer is extracted first, all pages in order. When the
//! document has no usable text layer (a scan), every page is rasterized and
//! run through OCR instead - many real-world PDFs carry no text at all, so
//! the fallback is a correctness requirement, not an optimization.

use std::io::Cursor;

use async_trait::async_trait;
use image::ImageEncoder;
use image::codecs::png::PngEncoder;
use pdfium_render::prelude::*;

use crate::config::ExtractionConfig;
use crate::error::{Result, TempelhofError};
use crate::ocr::OcrEngine;

use super::{Extractor, run_blocking};

const PDF_POINTS_PER_INCH: f32 = 72.0;
const TARGET_DPI: i32 = 300;
const MAX_IMAGE_DIMENSION: i32 = 16384;
const MIN_DPI: i32 = 72;
const MAX_DPI: i32 = 600;

/// PDF extractor backed by pdfium.
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Extractor for PdfExtractor {
    async fn extract(&self, content: &[u8], config: &ExtractionConfig) -> Result<String> {
        let data = content.to_vec();
        let languages = config.ocr_languages.clone();

        run_blocking(move || extract_blocking(&data, &languages)).await
    }
}

fn extract_blocking(content: &[u8], ocr_languages: &str) -> Result<String> {
    let pdfium = bind_pdfium()?;
    let document = load_document(&pdfium, content)?;

    let native_text = extract_native_text(&document)?;
    if !needs_ocr_fallback(&native_text) {
        return Ok(native_text);
    }

    tracing::debug!("PDF has no embedded text layer, rasterizing pages for OCR");
    ocr_document(&document, ocr_languages)
}

/// A document falls back to OCR only when its text layer is empty or
/// whitespace-only; any usable embedded text skips OCR entirely.
fn needs_ocr_fallback(native_text: &str) -> bool {
    native_text.trim().is_empty()
}

fn bind_pdfium() -> Result<Pdfium> {
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| {
            TempelhofError::MissingDependency(format!("Failed to initialize Pdfium: {}", e))
        })?;

    Ok(Pdfium::new(bindings))
}

fn load_document<'a>(pdfium: &'a Pdfium, content: &'a [u8]) -> Result<PdfDocument<'a>> {
    pdfium.load_pdf_from_byte_slice(content, None).map_err(|e| {
        let message = e.to_string();
        if message.contains("password") || message.contains("Password") {
            TempelhofError::parsing("PDF is password protected")
        } else {
            TempelhofError::parsing(format!("Invalid PDF: {}", message))
        }
    })
}

/// Extract the embedded text layer of all pages, concatenated in page order.
fn extract_native_text(document: &PdfDocument<'_>) -> Result<String> {
    let mut content = String::new();

    for (page_index, page) in document.pages().iter().enumerate() {
        let text = page
            .text()
            .map_err(|e| TempelhofError::parsing(format!("Page text extraction failed: {}", e)))?;

        if page_index > 0 {
            content.push_str("\n\n");
        }
        content.push_str(&text.all());
    }

    Ok(content)
}

/// Rasterize every page and OCR it, joining page texts with a newline.
fn ocr_document(document: &PdfDocument<'_>, ocr_languages: &str) -> Result<String> {
    let engine = OcrEngine::new(ocr_languages);
    let page_count = document.pages().len();
    let mut page_texts = Vec::with_capacity(page_count as usize);

    for page_index in 0..page_count {
        let page = document
            .pages()
            .get(page_index)
            .map_err(|e| TempelhofError::parsing(format!("Failed to open page {}: {}", page_index, e)))?;

        let png = render_page_to_png(&page)?;
        page_texts.push(engine.recognize(&png)?);
    }

    Ok(page_texts.join("\n"))
}

fn render_page_to_png(page: &PdfPage<'_>) -> Result<Vec<u8>> {
    let width_points = page.width().value;
    let height_points = page.height().value;

    let dpi = calculate_render_dpi(width_points, height_points);
    let scale = dpi as f32 / PDF_POINTS_PER_INCH;

    let render_config = PdfRenderConfig::new()
        .set_target_width(((width_points * scale) as i32).max(1))
        .set_target_height(((height_points * scale) as i32).max(1))
        .rotate_if_landscape(PdfPageRenderRotation::None, false);

    let bitmap = page
        .render_with_config(&render_config)
        .map_err(|e| TempelhofError::parsing(format!("Failed to render page: {}", e)))?;

    let rgb_image = bitmap.as_image().into_rgb8();
    let (width, height) = rgb_image.dimensions();

    let mut png_bytes = Cursor::new(Vec::new());
    PngEncoder::new(&mut png_bytes)
        .write_image(&rgb_image, width, height, image::ColorType::Rgb8.into())
        .map_err(|e| {
            TempelhofError::image_processing_with_source("Failed to encode page image", e)
        })?;

    Ok(png_bytes.into_inner())
}

/// Pick a render DPI that keeps the bitmap under the dimension cap.
fn calculate_render_dpi(width_points: f32, height_points: f32) -> i32 {
    let width_inches = width_points / PDF_POINTS_PER_INCH;
    let height_inches = height_points / PDF_POINTS_PER_INCH;

    let width_at_target = (width_inches * TARGET_DPI as f32) as i32;
    let height_at_target = (height_inches * TARGET_DPI as f32) as i32;

    if width_at_target <= MAX_IMAGE_DIMENSION && height_at_target <= MAX_IMAGE_DIMENSION {
        return TARGET_DPI;
    }

    let width_limited = (MAX_IMAGE_DIMENSION as f32 / width_inches) as i32;
    let height_limited = (MAX_IMAGE_DIMENSION as f32 / height_inches) as i32;

    width_limited.min(height_limited).clamp(MIN_DPI, MAX_DPI)
}
