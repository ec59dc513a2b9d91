//! Document-level types.

use super::ParsedPage;
use serde::{Deserialize, Serialize};

/// A multi-page document, pages kept in page-number order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Resolved pages
    pub pages: Vec<PageResult>,
}

/// One resolved page with its 1-based number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult {
    /// Page number (1-indexed)
    pub number: u32,

    /// Resolved entities
    pub page: ParsedPage,
}

impl PageResult {
    /// Pair a resolved page with its number.
    pub fn new(number: u32, page: ParsedPage) -> Self {
        Self { number, page }
    }
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from pages in any order; they are sorted by number.
    pub fn from_pages(mut pages: Vec<PageResult>) -> Self {
        pages.sort_by_key(|p| p.number);
        Self { pages }
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, number: u32) -> Option<&ParsedPage> {
        self.pages
            .iter()
            .find(|p| p.number == number)
            .map(|p| &p.page)
    }

    /// Append a page, numbering it after the last one.
    pub fn add_page(&mut self, page: ParsedPage) {
        let number = self.pages.last().map(|p| p.number + 1).unwrap_or(1);
        self.pages.push(PageResult { number, page });
    }

    /// Text of every non-empty page, each prefixed with a page marker.
    pub fn full_text(&self) -> String {
        self.pages
            .iter()
            .filter(|p| !p.page.full_text.is_empty())
            .map(|p| format!("--- Page {} ---\n{}", p.number, p.page.full_text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Entity totals across pages.
    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            total_pages: self.page_count(),
            total_tables: self.pages.iter().map(|p| p.page.tables.len()).sum(),
            total_forms: self.pages.iter().map(|p| p.page.forms.len()).sum(),
            total_checkboxes: self.pages.iter().map(|p| p.page.checkboxes.len()).sum(),
            total_text_length: self.full_text().chars().count(),
        }
    }
}

/// Entity totals of a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Number of pages
    pub total_pages: u32,
    /// Number of tables
    pub total_tables: usize,
    /// Number of form fields
    pub total_forms: usize,
    /// Number of checkboxes
    pub total_checkboxes: usize,
    /// Characters of the page-marked full text
    pub total_text_length: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FormField;

    fn page_with_text(text: &str) -> ParsedPage {
        ParsedPage {
            full_text: text.to_string(),
            ..ParsedPage::default()
        }
    }

    #[test]
    fn test_from_pages_sorts_by_number() {
        let doc = Document::from_pages(vec![
            PageResult {
                number: 2,
                page: page_with_text("second"),
            },
            PageResult {
                number: 1,
                page: page_with_text("first"),
            },
        ]);

        assert_eq!(doc.pages[0].number, 1);
        assert_eq!(doc.get_page(2).map(|p| p.full_text.as_str()), Some("second"));
        assert!(doc.get_page(3).is_none());
    }

    #[test]
    fn test_full_text_skips_empty_pages() {
        let mut doc = Document::new();
        doc.add_page(page_with_text("alpha"));
        doc.add_page(page_with_text(""));
        doc.add_page(page_with_text("gamma"));

        assert_eq!(
            doc.full_text(),
            "--- Page 1 ---\nalpha\n\n--- Page 3 ---\ngamma"
        );
    }

    #[test]
    fn test_summary_counts() {
        let mut page = page_with_text("x");
        page.forms.push(FormField::new("a", "b"));
        let mut doc = Document::new();
        doc.add_page(page);

        let summary = doc.summary();
        assert_eq!(summary.total_pages, 1);
        assert_eq!(summary.total_forms, 1);
        assert_eq!(summary.total_tables, 0);
        assert_eq!(summary.total_text_length, "--- Page 1 ---\nx".len());
    }
}
