use lopdf::{Document, Object};
use tracing::debug;

use crate::error::{Result, ScrapeError};

/// Text content of a PDF, one normalized string per page.
#[derive(Debug, Clone, Default)]
pub struct PdfText {
    pub title: Option<String>,
    pub pages: Vec<String>,
}

/// Decode PDF bytes held in memory and extract the text of every page.
///
/// Either every page is extracted or the whole document fails, so callers
/// never see a partial page list.
pub fn extract_page_texts(bytes: &[u8]) -> Result<PdfText> {
    let doc = Document::load_mem(bytes).map_err(|e| ScrapeError::Decode(e.to_string()))?;

    let mut pages = Vec::new();
    for page_num in doc.get_pages().keys() {
        let raw = doc
            .extract_text(&[*page_num])
            .map_err(|e| ScrapeError::Decode(format!("page {}: {}", page_num, e)))?;
        pages.push(normalize_page(&raw));
    }

    let title = document_title(&doc);
    debug!(pages = pages.len(), title = ?title, "Extracted PDF text");
    Ok(PdfText { title, pages })
}

/// Collapse whitespace runs inside each line to one space and end every
/// source line with a single newline.
pub fn normalize_page(raw: &str) -> String {
    let mut page = String::with_capacity(raw.len());
    for line in raw.split('\n') {
        let words: Vec<&str> = line.split_whitespace().collect();
        page.push_str(&words.join(" "));
        page.push('\n');
    }
    page
}

fn document_title(doc: &Document) -> Option<String> {
    let info = doc.trailer.get(b"Info").ok()?;
    let (_, info) = doc.dereference(info).ok()?;
    let title = info.as_dict().ok()?.get(b"Title").ok()?;
    match title {
        Object::String(bytes, _) => Some(decode_pdf_string(bytes)).filter(|t| !t.is_empty()),
        _ => None,
    }
}

// Text strings are either UTF-16BE with a BOM or a single-byte encoding.
fn decode_pdf_string(bytes: &[u8]) -> String {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|c| u16::from_be_bytes([c[0], c[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        _ => bytes.iter().map(|&b| b as char).collect(),
    }
}
