pub mod pdftotext;

use crate::error::TenkenError;

/// Content extracted from a single page of a PDF.
#[derive(Debug, Clone)]
pub struct PageContent {
    pub page_number: usize,
    pub lines: Vec<String>,
}

/// Trait for PDF text extraction backends.
pub trait PdfExtractor: Send + Sync {
    /// Extract text content from PDF bytes, returning one PageContent per page.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, TenkenError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Join extracted pages into plain text, one line per source line.
///
/// Trailing layout whitespace is dropped. Returns an empty string when no
/// page carries any visible text.
pub fn document_text(pages: &[PageContent]) -> String {
    let text = pages
        .iter()
        .flat_map(|p| p.lines.iter())
        .map(|l| l.trim_end())
        .collect::<Vec<_>>()
        .join("\n");

    if text.trim().is_empty() {
        String::new()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(number: usize, lines: &[&str]) -> PageContent {
        PageContent {
            page_number: number,
            lines: lines.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_document_text_joins_pages() {
        let pages = vec![page(1, &["点検報告書   ", "配管から漏水"]), page(2, &["以上"])];
        assert_eq!(document_text(&pages), "点検報告書\n配管から漏水\n以上");
    }

    #[test]
    fn test_document_text_blank_pages_are_empty() {
        let pages = vec![page(1, &["   ", ""]), page(2, &[])];
        assert_eq!(document_text(&pages), "");
        assert_eq!(document_text(&[]), "");
    }
}
