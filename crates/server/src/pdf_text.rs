use lopdf::Document;

/// Pages read from the start of a document.
pub const MAX_PAGES: usize = 15;

/// Character budget for text sent to the summarizer.
pub const MAX_CHARS: usize = 12_000;

#[derive(Debug, PartialEq)]
pub enum PdfTextError {
    /// The bytes could not be parsed as a PDF.
    Unreadable(String),
    /// The PDF parsed but contained no extractable text (e.g. a scan).
    NoText,
}

impl std::fmt::Display for PdfTextError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PdfTextError::Unreadable(e) => write!(f, "could not read PDF: {e}"),
            PdfTextError::NoText => write!(f, "no text could be extracted from the PDF"),
        }
    }
}

impl std::error::Error for PdfTextError {}

/// Extract text from at most the first `max_pages` pages. Pages that fail to
/// decode are skipped.
pub fn extract_text(bytes: &[u8], max_pages: usize) -> Result<String, PdfTextError> {
    let doc = Document::load_mem(bytes).map_err(|e| PdfTextError::Unreadable(e.to_string()))?;

    let mut text = String::new();
    for page_number in doc.get_pages().into_keys().take(max_pages) {
        match doc.extract_text(&[page_number]) {
            Ok(page_text) => {
                text.push_str(page_text.trim());
                text.push('\n');
            }
            Err(e) => tracing::debug!(page_number, error = %e, "skipping unreadable PDF page"),
        }
    }

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(PdfTextError::NoText);
    }
    Ok(text)
}

/// Truncate to at most `max_chars` characters, on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Single-page PDF with one line of Courier text.
#[cfg(test)]
pub(crate) fn sample_pdf(text: &str) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

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
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 24.into()]),
            Operation::new("Td", vec![72.into(), 700.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}
