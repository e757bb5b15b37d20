//! Content-based type detection across formats.
//!
//! The detection contract: classification depends only on byte content,
//! never on the filename or a declared content type.

use std::io::{Cursor, Write};

use tempelhof::{DetectedType, sniff_bytes};
use zip::write::SimpleFileOptions;

fn docx_bytes() -> Vec<u8> {
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

fn zip_bytes() -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut cursor);
        writer
            .start_file("archive-member.txt", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"archived text").unwrap();
        writer.finish().unwrap();
    }
    cursor.into_inner()
}

#[test]
fn test_pdf_magic_bytes() {
    assert_eq!(
        sniff_bytes(b"%PDF-1.5\n1 0 obj\n<<>>\nendobj\ntrailer\n"),
        DetectedType::Pdf
    );
}

#[test]
fn test_image_formats() {
    let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];
    let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00];
    let gif = *b"GIF89a\x01\x00\x01\x00";
    let bmp = *b"BM\x36\x00\x00\x00\x00\x00";
    let tiff_le = *b"II*\x00\x08\x00\x00\x00";

    assert_eq!(sniff_bytes(&png), DetectedType::Image);
    assert_eq!(sniff_bytes(&jpeg), DetectedType::Image);
    assert_eq!(sniff_bytes(&gif), DetectedType::Image);
    assert_eq!(sniff_bytes(&bmp), DetectedType::Image);
    assert_eq!(sniff_bytes(&tiff_le), DetectedType::Image);
}

#[test]
fn test_docx_container() {
    assert_eq!(sniff_bytes(&docx_bytes()), DetectedType::Docx);
}

#[test]
fn test_plain_zip_is_unknown() {
    assert_eq!(sniff_bytes(&zip_bytes()), DetectedType::Unknown);
}

#[test]
fn test_plain_text() {
    assert_eq!(
        sniff_bytes(b"An ordinary file.\nNothing but text in here.\n"),
        DetectedType::PlainText
    );
}

#[test]
fn test_empty_content_is_unknown() {
    assert_eq!(sniff_bytes(b""), DetectedType::Unknown);
}

#[test]
fn test_detection_ignores_any_declared_name() {
    // There is no filename parameter to lie through: identical bytes always
    // classify identically, which is the property the renamed-file attack
    // depends on being absent.
    let pdf = b"%PDF-1.4\nthis was uploaded as totally-a-text-file.txt";
    assert_eq!(sniff_bytes(pdf), DetectedType::Pdf);
    assert_eq!(sniff_bytes(pdf), sniff_bytes(pdf));
}

#[test]
fn test_truncated_zip_is_unknown() {
    let mut truncated = zip_bytes();
    truncated.truncate(10);
    assert_eq!(sniff_bytes(&truncated), DetectedType::Unknown);
}

#[test]
fn test_elf_binary_is_unknown() {
    let elf = [0x7F, b'E', b'L', b'F', 0x02, 0x01, 0x01, 0x00];
    assert_eq!(sniff_bytes(&elf), DetectedType::Unknown);
}
