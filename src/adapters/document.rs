//! Plain-text extraction from uploaded health records.

use crate::domain::ports::TextExtractor;
use crate::utils::error::{Result, TriageError};
use quick_xml::events::Event;
use quick_xml::Reader as XmlReader;
use std::io::{Cursor, Read};
use std::path::Path;

/// Supported document formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Txt,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            "txt" => Some(DocumentKind::Txt),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentExtractor;

impl DocumentExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract text from in-memory file contents, dispatching on `file_name`.
    pub fn extract_bytes(&self, file_name: &str, bytes: &[u8]) -> Result<String> {
        let kind = DocumentKind::from_path(Path::new(file_name)).ok_or_else(|| {
            TriageError::ExtractionError {
                file: file_name.to_string(),
                message: "unsupported file type".to_string(),
            }
        })?;

        match kind {
            DocumentKind::Pdf => extract_pdf(file_name, bytes),
            DocumentKind::Docx => extract_docx(file_name, bytes),
            DocumentKind::Txt => {
                String::from_utf8(bytes.to_vec()).map_err(|e| TriageError::ExtractionError {
                    file: file_name.to_string(),
                    message: e.to_string(),
                })
            }
        }
    }

    fn try_extract(&self, path: &Path) -> Result<String> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        self.extract_bytes(file_name, &bytes)
    }
}

impl TextExtractor for DocumentExtractor {
    fn extract_text(&self, path: &Path) -> String {
        match self.try_extract(path) {
            Ok(text) => {
                tracing::debug!("📄 Extracted {} characters from {}", text.len(), path.display());
                text
            }
            Err(e) => {
                tracing::warn!("⚠️ Error extracting text from {}: {}", path.display(), e);
                String::new()
            }
        }
    }
}

fn extract_pdf(file_name: &str, bytes: &[u8]) -> Result<String> {
    let text =
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| TriageError::ExtractionError {
            file: file_name.to_string(),
            message: e.to_string(),
        })?;

    // 各頁以空白連接
    Ok(text.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// DOCX is a zip archive; paragraph text lives in `word/document.xml`.
fn extract_docx(file_name: &str, bytes: &[u8]) -> Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive.by_name("word/document.xml")?.read_to_string(&mut xml)?;

    document_xml_text(&xml).map_err(|e| TriageError::ExtractionError {
        file: file_name.to_string(),
        message: e.to_string(),
    })
}

/// Text of every `w:t` run, one entry per `w:p`, paragraphs joined by spaces.
/// Paragraphs nested in text boxes are emitted when their own `w:p` closes.
fn document_xml_text(xml: &str) -> std::result::Result<String, quick_xml::Error> {
    let mut reader = XmlReader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_text_run = true,
            Event::Text(e) if in_text_run => current.push_str(&e.unescape()?),
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => current.push('\t'),
                b"w:br" | b"w:cr" => current.push('\n'),
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => {
                    let paragraph = std::mem::take(&mut current);
                    if !paragraph.trim().is_empty() {
                        paragraphs.push(paragraph);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    // 未關閉的段落
    if !current.trim().is_empty() {
        paragraphs.push(current);
    }

    Ok(paragraphs.join(" "))
}
