//! DOCX text extraction
//!
//! A DOCX file is a ZIP archive; the body lives in `word/document.xml` as
//! WordprocessingML. Each `<w:p>` paragraph becomes one line made of its
//! `<w:t>` text runs.

use crate::ReaderError;
use regex::Regex;
use std::io::{Cursor, Read};
use std::sync::LazyLock;
use tracing::debug;

const DOCUMENT_PART: &str = "word/document.xml";

/// A paragraph, either self-closing or with content
static PARAGRAPH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<w:p(?:\s[^>]*)?(?:/>|>(.*?)</w:p>)").expect("paragraph pattern")
});

/// Text runs, tabs and line breaks inside a paragraph
static RUN_CONTENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<w:t(?:\s[^>]*)?>(.*?)</w:t>|<w:tab\s*/>|<w:br\s*/>")
        .expect("run content pattern")
});

pub(crate) fn read_docx(bytes: &[u8]) -> Result<String, ReaderError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ReaderError::Docx(format!("Failed to read DOCX as ZIP: {}", e)))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ReaderError::Docx(format!("Missing {}: {}", DOCUMENT_PART, e)))?
        .read_to_string(&mut xml)
        .map_err(|e| ReaderError::Docx(format!("Failed to read {}: {}", DOCUMENT_PART, e)))?;

    let text = paragraphs_to_text(&xml);
    debug!("DOCX body has {} lines", text.lines().count());
    Ok(text)
}

/// Join paragraph texts with newlines, one line per paragraph
fn paragraphs_to_text(xml: &str) -> String {
    let mut text = String::new();

    for paragraph in PARAGRAPH.captures_iter(xml) {
        if let Some(body) = paragraph.get(1) {
            for run in RUN_CONTENT.captures_iter(body.as_str()) {
                match run.get(1) {
                    Some(content) => text.push_str(&decode_entities(content.as_str())),
                    None if run[0].starts_with("<w:tab") => text.push('\t'),
                    None => text.push('\n'),
                }
            }
        }
        text.push('\n');
    }

    text
}

/// Decode the predefined XML entities and numeric character references
fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    let mut decoded = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(amp) = rest.find('&') {
        decoded.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        let replacement = tail.find(';').and_then(|semi| {
            let entity = &tail[1..semi];
            let c = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => entity
                    .strip_prefix("#x")
                    .map(|hex| u32::from_str_radix(hex, 16))
                    .or_else(|| entity.strip_prefix('#').map(str::parse::<u32>))
                    .and_then(Result::ok)
                    .and_then(char::from_u32),
            };
            c.map(|c| (c, semi + 1))
        });

        match replacement {
            Some((c, consumed)) => {
                decoded.push(c);
                rest = &tail[consumed..];
            }
            None => {
                decoded.push('&');
                rest = &tail[1..];
            }
        }
    }

    decoded.push_str(rest);
    decoded
}
