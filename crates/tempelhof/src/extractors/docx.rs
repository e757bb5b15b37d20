//! DOCX extraction via streaming the document part.
//!
//! Reads `word/document.xml` out of the OOXML container and collects the text
//! of body-level paragraphs in document order. Tables, headers/footers, and
//! embedded objects are intentionally dropped.

use std::io::{Cursor, Read};

use async_trait::async_trait;
use roxmltree::Node;

use crate::config::ExtractionConfig;
use crate::error::{Result, TempelhofError};

use super::{Extractor, run_blocking};

const WORDPROCESSING_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const DOCUMENT_PART: &str = "word/document.xml";

/// Word document extractor.
pub struct DocxExtractor;

impl DocxExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DocxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Extractor for DocxExtractor {
    async fn extract(&self, content: &[u8], _config: &ExtractionConfig) -> Result<String> {
        let data = content.to_vec();
        run_blocking(move || extract_blocking(&data)).await
    }
}

fn extract_blocking(content: &[u8]) -> Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(content))
        .map_err(|e| TempelhofError::parsing_with_source("Invalid DOCX container", e))?;

    let mut document_xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| {
            TempelhofError::parsing_with_source("DOCX container has no word/document.xml", e)
        })?
        .read_to_string(&mut document_xml)
        .map_err(|e| {
            TempelhofError::parsing_with_source("Failed to read word/document.xml", e)
        })?;

    parse_document_xml(&document_xml)
}

/// Collect body-level `<w:p>` paragraph texts, joined by newline.
///
/// Only direct children of `<w:body>` are considered, so paragraphs nested in
/// tables do not appear in the output.
fn parse_document_xml(xml: &str) -> Result<String> {
    let document = roxmltree::Document::parse(xml)
        .map_err(|e| TempelhofError::parsing_with_source("Invalid DOCX document XML", e))?;

    let body = document
        .root_element()
        .children()
        .find(|node| node.has_tag_name((WORDPROCESSING_NS, "body")));

    let mut paragraphs = Vec::new();
    if let Some(body) = body {
        for node in body.children() {
            if node.has_tag_name((WORDPROCESSING_NS, "p")) {
                paragraphs.push(paragraph_text(&node));
            }
        }
    }

    Ok(paragraphs.join("\n"))
}

/// Concatenate the runs of one paragraph; tabs and breaks become `\t`/`\n`.
fn paragraph_text(paragraph: &Node<'_, '_>) -> String {
    let mut text = String::new();

    for node in paragraph.descendants() {
        if node.has_tag_name((WORDPROCESSING_NS, "t")) {
            if let Some(run_text) = node.text() {
                text.push_str(run_text);
            }
        } else if node.has_tag_name((WORDPROCESSING_NS, "tab")) {
            text.push('\t');
        } else if node.has_tag_name((WORDPROCESSING_NS, "br")) {
            text.push('\n');
        }
    }

    text
}
