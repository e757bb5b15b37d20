//! Tesseract OCR engine.
//!
//! Thin wrapper around `kreuzberg-tesseract` used by the image extractor and
//! the PDF OCR fallback. One engine instance carries the process-wide language
//! hint set; every [`OcrEngine::recognize`] call is self-contained and
//! blocking - callers run it on the blocking thread pool.

use std::path::Path;

use kreuzberg_tesseract::{TessPageSegMode, TesseractAPI};

use crate::error::{Result, TempelhofError};

/// Fully automatic page segmentation (Tesseract PSM 3).
const DEFAULT_PSM: i32 = 3;

/// Well-known tessdata locations checked when `TESSDATA_PREFIX` is unset.
const TESSDATA_FALLBACK_PATHS: &[&str] = &[
    "/opt/homebrew/share/tessdata",
    "/opt/homebrew/opt/tesseract/share/tessdata",
    "/usr/local/opt/tesseract/share/tessdata",
    "/usr/share/tesseract-ocr/5/tessdata",
    "/usr/share/tesseract-ocr/4/tessdata",
    "/usr/share/tessdata",
    "/usr/local/share/tessdata",
    r#"C:\Program Files\Tesseract-OCR\tessdata"#,
    r#"C:\ProgramData\Tesseract-OCR\tessdata"#,
];

/// OCR engine with a fixed language hint set.
pub struct OcrEngine {
    languages: String,
}

impl OcrEngine {
    /// Create an engine for the given `+`-separated language hints
    /// (e.g. `"ces+eng"`).
    pub fn new(languages: impl Into<String>) -> Self {
        Self {
            languages: languages.into(),
        }
    }

    /// The configured language hint set.
    pub fn languages(&self) -> &str {
        &self.languages
    }

    /// Run OCR over encoded image bytes and return the recognized plain text.
    ///
    /// Blocking: decodes the image, initializes Tesseract, recognizes, and
    /// tears the API down again. Call from `spawn_blocking`.
    pub fn recognize(&self, image_bytes: &[u8]) -> Result<String> {
        let img = image::load_from_memory(image_bytes).map_err(|e| {
            TempelhofError::image_processing_with_source("Failed to decode image", e)
        })?;

        let rgb_image = img.to_rgb8();
        let (width, height) = rgb_image.dimensions();
        let bytes_per_pixel = 3u32;
        let bytes_per_line = width * bytes_per_pixel;

        let tessdata_path = resolve_tessdata_dir(std::env::var("TESSDATA_PREFIX").ok());
        validate_languages(tessdata_path.as_deref(), &self.languages)?;

        let api = TesseractAPI::new();

        api.init(tessdata_path.as_deref().unwrap_or(""), &self.languages)
            .map_err(|e| {
                TempelhofError::ocr(format!(
                    "Failed to initialize Tesseract for '{}': {}",
                    self.languages, e
                ))
            })?;

        api.set_page_seg_mode(TessPageSegMode::from_int(DEFAULT_PSM))
            .map_err(|e| TempelhofError::ocr(format!("Failed to set page segmentation mode: {}", e)))?;

        api.set_image(
            rgb_image.as_raw(),
            width as i32,
            height as i32,
            bytes_per_pixel as i32,
            bytes_per_line as i32,
        )
        .map_err(|e| TempelhofError::ocr(format!("Failed to set image: {}", e)))?;

        api.recognize()
            .map_err(|e| TempelhofError::ocr(format!("Failed to recognize text: {}", e)))?;

        let text = api
            .get_utf8_text()
            .map_err(|e| TempelhofError::ocr(format!("Failed to extract text: {}", e)))?;

        Ok(strip_control_characters(&text))
    }
}

/// Resolve the tessdata directory from the environment or well-known paths.
fn resolve_tessdata_dir(env_value: Option<String>) -> Option<String> {
    env_value
        .filter(|v| !v.trim().is_empty())
        .or_else(|| {
            TESSDATA_FALLBACK_PATHS
                .iter()
                .find(|p| Path::new(p).exists())
                .map(|p| (*p).to_string())
        })
}

/// Validate the language hint set before touching the native API.
///
/// Tesseract can crash on an empty language string or a missing traineddata
/// file instead of returning an error, so both are rejected up front.
fn validate_languages(tessdata_dir: Option<&str>, languages: &str) -> Result<()> {
    if languages.trim().is_empty() {
        return Err(TempelhofError::ocr(
            "Language hint set cannot be empty. Specify a valid language code (e.g. 'eng')",
        ));
    }

    if let Some(dir) = tessdata_dir {
        for lang in languages.split('+') {
            let lang = lang.trim();
            if lang.is_empty() {
                continue;
            }
            let traineddata = Path::new(dir).join(format!("{}.traineddata", lang));
            if !traineddata.exists() {
                return Err(TempelhofError::MissingDependency(format!(
                    "Tesseract language '{}' not found: {}",
                    lang,
                    traineddata.display()
                )));
            }
        }
    }

    Ok(())
}

fn strip_control_characters(text: &str) -> String {
    if text
        .chars()
        .any(|c| matches!(c, '\u{0000}'..='\u{001F}' | '\u{007F}') && c != '\n' && c != '\r' && c != '\t')
    {
        text.chars()
            .filter(|c| !matches!(c, '\u{0000}'..='\u{001F}' | '\u{007F}') || matches!(c, '\n' | '\r' | '\t'))
            .collect()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_control_characters_preserves_whitespace() {
        let input = "line one\nline\ttwo\r\n";
        assert_eq!(strip_control_characters(input), input);
    }

    #[test]
    fn test_strip_control_characters_removes_garbage() {
        let input = "he\u{0000}llo\u{0007} world\u{007F}";
        assert_eq!(strip_control_characters(input), "hello world");
    }

    #[test]
    fn test_validate_languages_rejects_empty() {
        let result = validate_languages(None, "   ");
        assert!(matches!(result.unwrap_err(), TempelhofError::Ocr { .. }));
    }

    #[test]
    fn test_validate_languages_missing_traineddata() {
        let dir = tempfile::tempdir().unwrap();
        let result = validate_languages(dir.path().to_str(), "eng");
        assert!(matches!(
            result.unwrap_err(),
            TempelhofError::MissingDependency(_)
        ));
    }

    #[test]
    fn test_validate_languages_present_traineddata() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("eng.traineddata"), b"stub").unwrap();
        std::fs::write(dir.path().join("ces.traineddata"), b"stub").unwrap();
        assert!(validate_languages(dir.path().to_str(), "ces+eng").is_ok());
    }

    #[test]
    fn test_validate_languages_unknown_dir_skips_file_check() {
        // Without a tessdata directory the file check cannot run; init will
        // report the real failure instead.
        assert!(validate_languages(None, "eng").is_ok());
    }

    #[test]
    fn test_resolve_tessdata_prefers_env() {
        let resolved = resolve_tessdata_dir(Some("/custom/tessdata".to_string()));
        assert_eq!(resolved.as_deref(), Some("/custom/tessdata"));
    }

    #[test]
    fn test_resolve_tessdata_ignores_blank_env() {
        let resolved = resolve_tessdata_dir(Some("   ".to_string()));
        // Result depends on which fallback paths exist on the host; the blank
        // env value must not be returned as-is.
        assert_ne!(resolved.as_deref(), Some("   "));
    }

    #[test]
    fn test_engine_languages_accessor() {
        let engine = OcrEngine::new("ces+eng");
        assert_eq!(engine.languages(), "ces+eng");
    }
}
