//! Service configuration.
//!
//! Configuration can be loaded from a `tempelhof.toml` file (discovered in the
//! current directory or any parent), and individual values can be overridden
//! through `TEMPELHOF_*` environment variables at startup. All knobs are fixed
//! per process: in particular the extraction deadline and OCR language hints
//! are never taken from a request.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TempelhofError};

const CONFIG_FILE_NAME: &str = "tempelhof.toml";

fn default_ocr_languages() -> String {
    "ces+eng".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_upload_bytes() -> usize {
    50 * 1024 * 1024
}

fn default_spool_dir() -> PathBuf {
    std::env::temp_dir().join("tempelhof-spool")
}

fn default_min_confidence() -> f64 {
    0.1
}

/// Language detection tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageConfig {
    /// Detections below this confidence are reported as `"unknown"`.
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            min_confidence: default_min_confidence(),
        }
    }
}

/// Extraction pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Tesseract language hint set for OCR (e.g. `"ces+eng"`).
    ///
    /// Shared by the image extractor and the PDF OCR fallback.
    #[serde(default = "default_ocr_languages")]
    pub ocr_languages: String,

    /// Hard wall-clock deadline for one extraction strategy invocation.
    #[serde(default = "default_timeout_secs")]
    pub extraction_timeout_secs: u64,

    /// Maximum accepted upload size in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Directory for transient upload storage (write-then-delete per request).
    #[serde(default = "default_spool_dir")]
    pub spool_dir: PathBuf,

    /// Language detection tuning.
    #[serde(default)]
    pub language: LanguageConfig,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            ocr_languages: default_ocr_languages(),
            extraction_timeout_secs: default_timeout_secs(),
            max_upload_bytes: default_max_upload_bytes(),
            spool_dir: default_spool_dir(),
            language: LanguageConfig::default(),
        }
    }
}

impl ExtractionConfig {
    /// The extraction deadline as a [`Duration`].
    pub fn extraction_deadline(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            TempelhofError::validation_with_source(
                format!("Invalid config file {}: {}", path.display(), e),
                e,
            )
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Search for `tempelhof.toml` in the current directory and its parents.
    ///
    /// Returns `Ok(None)` when no config file exists.
    pub fn discover() -> Result<Option<Self>> {
        let mut dir = std::env::current_dir()?;
        loop {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                return Self::from_toml_file(&candidate).map(Some);
            }
            if !dir.pop() {
                return Ok(None);
            }
        }
    }

    /// Apply `TEMPELHOF_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Apply overrides from an arbitrary variable source.
    ///
    /// Invalid values are skipped with a warning rather than aborting startup.
    pub fn apply_overrides_from(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(value) = var("TEMPELHOF_OCR_LANGUAGES") {
            if value.trim().is_empty() {
                tracing::warn!("Ignoring empty TEMPELHOF_OCR_LANGUAGES");
            } else {
                tracing::info!("OCR languages configured from environment: {}", value);
                self.ocr_languages = value;
            }
        }

        if let Some(value) = var("TEMPELHOF_TIMEOUT_SECS") {
            match value.parse::<u64>() {
                Ok(secs) if secs > 0 => {
                    tracing::info!("Extraction timeout configured from environment: {}s", secs);
                    self.extraction_timeout_secs = secs;
                }
                _ => tracing::warn!(
                    "Failed to parse TEMPELHOF_TIMEOUT_SECS='{}', must be a positive integer",
                    value
                ),
            }
        }

        if let Some(value) = var("TEMPELHOF_MAX_UPLOAD_BYTES") {
            match value.parse::<usize>() {
                Ok(bytes) if bytes > 0 => {
                    tracing::info!(
                        "Upload size limit configured from environment: {} bytes ({:.1} MB)",
                        bytes,
                        bytes as f64 / (1024.0 * 1024.0)
                    );
                    self.max_upload_bytes = bytes;
                }
                _ => tracing::warn!(
                    "Failed to parse TEMPELHOF_MAX_UPLOAD_BYTES='{}', must be a positive integer",
                    value
                ),
            }
        }

        if let Some(value) = var("TEMPELHOF_SPOOL_DIR") {
            if value.trim().is_empty() {
                tracing::warn!("Ignoring empty TEMPELHOF_SPOOL_DIR");
            } else {
                self.spool_dir = PathBuf::from(value);
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.ocr_languages.trim().is_empty() {
            return Err(TempelhofError::validation("ocr_languages must not be empty"));
        }
        if self.extraction_timeout_secs == 0 {
            return Err(TempelhofError::validation(
                "extraction_timeout_secs must be greater than zero",
            ));
        }
        if self.max_upload_bytes == 0 {
            return Err(TempelhofError::validation(
                "max_upload_bytes must be greater than zero",
            ));
        }
        Ok(())
    }
}
