//! Glosa Document Reader
//!
//! Turns uploaded document bytes into plain text for extraction.
//!
//! # Supported formats
//!
//! - **PDF**: text layer only, page by page (scanned pages yield nothing)
//! - **DOCX**: paragraphs of `word/document.xml`
//! - **TXT**: UTF-8
//!
//! # Examples
//!
//! ```
//! use glosa_reader::{read_document, DocumentKind};
//!
//! let kind = DocumentKind::from_filename("notes.TXT").unwrap();
//! let text = read_document(b"Gravity\nForce between masses.", kind).unwrap();
//! assert_eq!(text, "Gravity\nForce between masses.");
//! ```

#![warn(missing_docs)]

mod docx;
mod error;
mod pdf;

use std::fmt;
use std::path::Path;
use tracing::debug;

pub use error::ReaderError;

/// Document formats accepted for upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Portable Document Format
    Pdf,
    /// Office Open XML word processing document
    Docx,
    /// UTF-8 plain text
    Text,
}

impl DocumentKind {
    /// Detect the kind from a file name's extension (case-insensitive)
    pub fn from_filename(filename: &str) -> Result<Self, ReaderError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("pdf") => Ok(DocumentKind::Pdf),
            Some("docx") => Ok(DocumentKind::Docx),
            Some("txt") => Ok(DocumentKind::Text),
            _ => Err(ReaderError::UnsupportedType(filename.to_string())),
        }
    }

    /// Canonical file extension
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Docx => "docx",
            DocumentKind::Text => "txt",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Extract the full text of a document
///
/// The result may be blank (e.g. a scanned PDF); callers decide whether that
/// is an error.
pub fn read_document(bytes: &[u8], kind: DocumentKind) -> Result<String, ReaderError> {
    debug!("Reading {} document ({} bytes)", kind, bytes.len());

    match kind {
        DocumentKind::Pdf => pdf::read_pdf(bytes),
        DocumentKind::Docx => docx::read_docx(bytes),
        DocumentKind::Text => read_text(bytes),
    }
}

fn read_text(bytes: &[u8]) -> Result<String, ReaderError> {
    let text = std::str::from_utf8(bytes).map_err(|e| ReaderError::Encoding(e.to_string()))?;
    Ok(text.strip_prefix('\u{FEFF}').unwrap_or(text).to_string())
}
