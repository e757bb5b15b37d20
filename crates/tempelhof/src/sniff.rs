//! Content-based type detection.
//!
//! Classification looks at file content only - magic bytes and container
//! structure - never at the filename suffix or a client-declared content
//! type. An attacker who renames a file must not be able to change how it is
//! processed.

use std::io::Cursor;

use crate::types::DetectedType;

pub const PDF_MIME_TYPE: &str = "application/pdf";
pub const DOCX_MIME_TYPE: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const ZIP_MIME_TYPE: &str = "application/zip";

/// Number of leading bytes inspected by the text-vs-binary heuristic.
const TEXT_SNIFF_WINDOW: usize = 8192;

/// Maximum tolerated ratio of non-text control bytes in the sniff window.
const MAX_CONTROL_RATIO: f64 = 0.02;

/// Detect the canonical document type from raw content.
///
/// Unknown or unsupported binary content maps to [`DetectedType::Unknown`],
/// which is a valid outcome rather than an error. No side effects.
pub fn sniff_bytes(content: &[u8]) -> DetectedType {
    if content.is_empty() {
        return DetectedType::Unknown;
    }

    if let Some(kind) = infer::get(content) {
        let mime = kind.mime_type();
        if mime == PDF_MIME_TYPE {
            return DetectedType::Pdf;
        }
        if mime == DOCX_MIME_TYPE {
            return DetectedType::Docx;
        }
        if mime.starts_with("image/") {
            return DetectedType::Image;
        }
        if mime == ZIP_MIME_TYPE {
            // OOXML documents are ZIP containers; infer does not always tell
            // them apart from plain archives, so check the entry table.
            return classify_zip(content);
        }
        // Recognized binary format with no extractor (tar, gzip, elf, ...).
        return DetectedType::Unknown;
    }

    if looks_textual(content) {
        DetectedType::PlainText
    } else {
        DetectedType::Unknown
    }
}

/// Distinguish a Word document from a generic ZIP archive.
fn classify_zip(content: &[u8]) -> DetectedType {
    match zip::ZipArchive::new(Cursor::new(content)) {
        Ok(archive) => {
            if archive.file_names().any(|name| name == "word/document.xml") {
                DetectedType::Docx
            } else {
                DetectedType::Unknown
            }
        }
        // Truncated or corrupt central directory: not extractable either way.
        Err(_) => DetectedType::Unknown,
    }
}

/// Heuristic text check over the leading window.
///
/// UTF-16 byte-order marks are accepted; otherwise NUL bytes or a significant
/// share of control bytes classify the content as binary.
fn looks_textual(content: &[u8]) -> bool {
    if content.starts_with(&[0xFF, 0xFE]) || content.starts_with(&[0xFE, 0xFF]) {
        return true;
    }

    let window = &content[..content.len().min(TEXT_SNIFF_WINDOW)];
    let mut control = 0usize;

    for &byte in window {
        if byte == 0 {
            return false;
        }
        if byte < 0x20 && byte != b'\t' && byte != b'\n' && byte != b'\r' {
            control += 1;
        } else if byte == 0x7F {
            control += 1;
        }
    }

    (control as f64 / window.len() as f64) <= MAX_CONTROL_RATIO
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn minimal_docx_bytes() -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            let options = SimpleFileOptions::default();
            writer.start_file("[Content_Types].xml", options).unwrap();
            writer
                .write_all(b"<?xml version=\"1.0\"?><Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\"/>")
                .unwrap();
            writer.start_file("word/document.xml", options).unwrap();
            writer
                .write_all(b"<?xml version=\"1.0\"?><w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\"><w:body/></w:document>")
                .unwrap();
            writer.finish().unwrap();
        }
        cursor.into_inner()
    }

    fn plain_zip_bytes() -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            let options = SimpleFileOptions::default();
            writer.start_file("readme.txt", options).unwrap();
            writer.write_all(b"hello").unwrap();
            writer.finish().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_sniff_pdf_magic() {
        let content = b"%PDF-1.7\n1 0 obj\n<< /Type /Catalog >>\nendobj\n";
        assert_eq!(sniff_bytes(content), DetectedType::Pdf);
    }

    #[test]
    fn test_sniff_png() {
        let content = [
            0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D,
        ];
        assert_eq!(sniff_bytes(&content), DetectedType::Image);
    }

    #[test]
    fn test_sniff_jpeg() {
        let content = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
        assert_eq!(sniff_bytes(&content), DetectedType::Image);
    }

    #[test]
    fn test_sniff_docx_container() {
        assert_eq!(sniff_bytes(&minimal_docx_bytes()), DetectedType::Docx);
    }

    #[test]
    fn test_sniff_plain_zip_is_unknown() {
        assert_eq!(sniff_bytes(&plain_zip_bytes()), DetectedType::Unknown);
    }

    #[test]
    fn test_sniff_text() {
        assert_eq!(
            sniff_bytes(b"Just an ordinary sentence.\nSecond line.\n"),
            DetectedType::PlainText
        );
    }

    #[test]
    fn test_sniff_utf16_bom_is_text() {
        let mut content = vec![0xFF, 0xFE];
        for unit in "hello".encode_utf16() {
            content.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(sniff_bytes(&content), DetectedType::PlainText);
    }

    #[test]
    fn test_sniff_empty_is_unknown() {
        assert_eq!(sniff_bytes(b""), DetectedType::Unknown);
    }

    #[test]
    fn test_sniff_binary_garbage_is_unknown() {
        let content: Vec<u8> = (0u8..=255).cycle().take(4096).collect();
        assert_eq!(sniff_bytes(&content), DetectedType::Unknown);
    }

    #[test]
    fn test_sniff_ignores_declared_name() {
        // The sniffer takes no filename at all: the same bytes always give
        // the same answer, so a renamed PDF cannot become text.
        let pdf = b"%PDF-1.4\nrenamed to .txt but still a pdf";
        assert_eq!(sniff_bytes(pdf), DetectedType::Pdf);
    }
}
