//! Error types for tempelhof.
//!
//! All fallible operations in the crate return [`Result`], which uses
//! [`TempelhofError`].
//!
//! # Error Handling Philosophy
//!
//! **System errors bubble up unchanged:**
//! - `TempelhofError::Io` (from `std::io::Error`) - file system errors, permission errors
//! - These indicate real system problems and must surface to enable bug reports
//!
//! **Application errors are wrapped with context:**
//! - `Parsing` - document format errors, corrupt files
//! - `Ocr` - OCR processing failures
//! - `Validation` - invalid input (missing file, empty filename)
//!
//! **Request-outcome errors carry their HTTP meaning:**
//! - `Timeout` - the extraction deadline elapsed (maps to 408)
//! - `PayloadTooLarge` - the upload exceeded the configured maximum (maps to 413)
use thiserror::Error;

/// Result type alias using `TempelhofError`.
pub type Result<T> = std::result::Result<T, TempelhofError>;

/// Main error type for all tempelhof operations.
#[derive(Debug, Error)]
pub enum TempelhofError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parsing error: {message}")]
    Parsing {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("OCR error: {message}")]
    Ocr {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Image processing error: {message}")]
    ImageProcessing {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Extraction timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Payload exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: usize },

    #[error("Missing dependency: {0}")]
    MissingDependency(String),

    #[error("{0}")]
    Other(String),
}

impl TempelhofError {
    /// Create a Parsing error.
    pub fn parsing<S: Into<String>>(message: S) -> Self {
        Self::Parsing {
            message: message.into(),
            source: None,
        }
    }

    /// Create a Parsing error with source.
    pub fn parsing_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Parsing {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an Ocr error.
    pub fn ocr<S: Into<String>>(message: S) -> Self {
        Self::Ocr {
            message: message.into(),
            source: None,
        }
    }

    /// Create an Ocr error with source.
    pub fn ocr_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Ocr {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a Validation error.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
            source: None,
        }
    }

    /// Create a Validation error with source.
    pub fn validation_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Validation {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an ImageProcessing error.
    pub fn image_processing<S: Into<String>>(message: S) -> Self {
        Self::ImageProcessing {
            message: message.into(),
            source: None,
        }
    }

    /// Create an ImageProcessing error with source.
    pub fn image_processing_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageProcessing {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
