//! PDF text extraction using lopdf and pdf-extract.

use std::any::Any;
use std::panic;
use std::path::Path;

use lopdf::Document;
use tracing::{debug, warn};

use super::{ContentSource, PdfProcessor, Result};
use crate::error::PdfError;

/// PDF content extractor using lopdf.
///
/// lopdf parses the structure (encryption, page tree); pdf-extract renders
/// the page text from the plain bytes kept alongside.
pub struct PdfExtractor {
    document: Option<Document>,
    plain_bytes: Vec<u8>,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            plain_bytes: Vec::new(),
        }
    }

    /// Text of each page, in page order.
    ///
    /// pdf-extract panics on some malformed fonts instead of returning an
    /// error. Such a panic is contained here and reported as
    /// [`PdfError::TextExtraction`], so one bad document cannot take down a
    /// whole batch.
    pub fn extract_pages(&self) -> Result<Vec<String>> {
        if self.document.is_none() {
            return Err(PdfError::Parse("No document loaded".to_string()));
        }

        let bytes = self.plain_bytes.as_slice();
        match panic::catch_unwind(move || pdf_extract::extract_text_from_mem_by_pages(bytes)) {
            Ok(pages) => pages.map_err(|e| PdfError::TextExtraction(e.to_string())),
            Err(payload) => {
                let reason = panic_reason(payload.as_ref());
                warn!(reason = %reason, "Text extractor panicked");
                Err(PdfError::TextExtraction(format!(
                    "text extractor panicked: {}",
                    reason
                )))
            }
        }
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown cause".to_string()
    }
}

/// Decrypts a document protected only by an empty user password and returns
/// its re-serialized bytes; pdf-extract reparses from bytes, not from `doc`.
fn decrypt_empty_password(doc: &mut Document) -> Result<Vec<u8>> {
    doc.decrypt("").map_err(|_| PdfError::Encrypted)?;

    let mut plain = Vec::new();
    doc.save_to(&mut plain)
        .map_err(|e| PdfError::Parse(format!("cannot re-serialize decrypted PDF: {}", e)))?;
    Ok(plain)
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        let encrypted = doc.is_encrypted();
        let plain_bytes = if encrypted {
            decrypt_empty_password(&mut doc)?
        } else {
            data.to_vec()
        };

        let pages = doc.get_pages().len();
        if pages == 0 {
            return Err(PdfError::NoPages);
        }

        debug!(pages, encrypted, "Loaded PDF");
        self.plain_bytes = plain_bytes;
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    /// Page texts are joined as-is. No separator is inserted, so a word
    /// split across a page break comes out fused.
    fn extract_text(&self) -> Result<String> {
        Ok(self.extract_pages()?.concat())
    }
}

/// Reads PDF files from disk and returns their text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfContentSource;

impl ContentSource for PdfContentSource {
    fn read_text(&self, path: &Path) -> crate::Result<String> {
        let data = std::fs::read(path)?;
        let mut extractor = PdfExtractor::new();
        extractor.load(&data)?;

        let text = extractor.extract_text()?;
        debug!(
            "Extracted {} chars from {} ({} pages)",
            text.len(),
            path.display(),
            extractor.page_count()
        );
        Ok(text)
    }
}
