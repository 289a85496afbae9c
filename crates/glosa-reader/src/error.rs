//! Error types for document reading

use thiserror::Error;

/// Errors that can occur while reading a document
#[derive(Error, Debug)]
pub enum ReaderError {
    /// The file extension is not one we can read
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    /// The PDF could not be parsed
    #[error("PDF error: {0}")]
    Pdf(String),

    /// The DOCX archive or its XML could not be read
    #[error("DOCX error: {0}")]
    Docx(String),

    /// Text is not valid UTF-8
    #[error("Encoding error: {0}")]
    Encoding(String),
}
