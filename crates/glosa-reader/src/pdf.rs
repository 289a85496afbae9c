//! PDF text extraction using lopdf

use crate::ReaderError;
use lopdf::Document;
use tracing::{debug, warn};

/// Below this many characters a PDF is probably scanned
const SCANNED_THRESHOLD_CHARS: usize = 100;

/// Extract the text layer of every page, in page order
///
/// A page whose content cannot be decoded is logged and skipped.
pub(crate) fn read_pdf(bytes: &[u8]) -> Result<String, ReaderError> {
    let doc = Document::load_mem(bytes)
        .map_err(|e| ReaderError::Pdf(format!("Failed to load PDF: {}", e)))?;

    let pages = doc.get_pages();
    debug!("PDF has {} pages", pages.len());

    let mut text = String::new();
    for page_num in pages.keys() {
        match doc.extract_text(&[*page_num]) {
            Ok(page_text) => {
                let page_text = page_text.trim_end();
                if !page_text.is_empty() {
                    text.push_str(page_text);
                    text.push('\n');
                }
            }
            Err(e) => warn!("Skipping PDF page {}: {}", page_num, e),
        }
    }

    if text.trim().chars().count() < SCANNED_THRESHOLD_CHARS {
        warn!("PDF has almost no text layer; it may be scanned");
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    fn build_pdf(lines: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let kids: Vec<Object> = lines
            .iter()
            .map(|line| {
                let content = Content {
                    operations: vec![
                        Operation::new("BT", vec![]),
                        Operation::new("Tf", vec!["F1".into(), 24.into()]),
                        Operation::new("Td", vec![100.into(), 600.into()]),
                        Operation::new("Tj", vec![Object::string_literal(*line)]),
                        Operation::new("ET", vec![]),
                    ],
                };
                let content_id =
                    doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "Contents" => content_id,
                    "Resources" => resources_id,
                })
                .into()
            })
            .collect();

        let pages = dictionary! {
            "Type" => "Pages",
            "Count" => kids.len() as i64,
            "Kids" => kids,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_pages_are_read_in_order() {
        let bytes = build_pdf(&["Photosynthesis", "Chlorophyll"]);
        let text = read_pdf(&bytes).unwrap();

        let first = text.find("Photosynthesis").unwrap();
        let second = text.find("Chlorophyll").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_garbage_is_an_error() {
        let result = read_pdf(b"definitely not a pdf");
        assert!(matches!(result, Err(ReaderError::Pdf(_))));
    }
}
