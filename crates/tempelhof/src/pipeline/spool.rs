//! Transient upload storage.
//!
//! Each request writes its payload to a uniquely named file under the spool
//! directory and removes it again on every exit path. Orphaned uploads are a
//! disk-exhaustion risk over the service's lifetime, so deletion is tied to
//! the guard's `Drop` rather than to any happy-path code.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::Result;

/// One spooled upload, deleted when the guard goes out of scope.
#[derive(Debug)]
pub struct SpooledUpload {
    path: PathBuf,
    sanitized_name: String,
}

impl SpooledUpload {
    /// Write `content` under `spool_dir` as `<uuid>_<sanitized-name>`.
    ///
    /// The random prefix keeps concurrent uploads that share a declared base
    /// name from colliding; sanitization keeps the declared name from
    /// escaping the spool directory.
    pub async fn write(spool_dir: &Path, declared_filename: &str, content: &[u8]) -> Result<Self> {
        tokio::fs::create_dir_all(spool_dir).await?;

        let sanitized_name = sanitize_filename(declared_filename);
        let stored_name = format!("{}_{}", Uuid::new_v4(), sanitized_name);
        let path = spool_dir.join(stored_name);

        tokio::fs::write(&path, content).await?;

        Ok(Self {
            path,
            sanitized_name,
        })
    }

    /// Location of the stored upload.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The sanitized client-declared filename (without the unique prefix).
    pub fn sanitized_name(&self) -> &str {
        &self.sanitized_name
    }
}

impl Drop for SpooledUpload {
    fn drop(&mut self) {
        if let Err(error) = std::fs::remove_file(&self.path) {
            if error.kind() != std::io::ErrorKind::NotFound {
                // Cleanup must never mask the request outcome.
                tracing::debug!(
                    "Failed to remove spooled upload {}: {}",
                    self.path.display(),
                    error
                );
            }
        }
    }
}

/// Reduce an untrusted declared filename to a safe single path component.
///
/// Directory components are stripped, non-filename characters become `_`,
/// and leading/trailing dots and underscores are trimmed so the result can
/// neither traverse nor hide. An unusable name falls back to `"upload"`.
pub fn sanitize_filename(declared: &str) -> String {
    let base = declared
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = cleaned.trim_matches(['.', '_']);
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}
