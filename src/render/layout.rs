//! Reading-order analysis.
//!
//! Every entity group of a page becomes one [`LayoutElement`] keyed by its
//! `(top, left)` position. Elements are stably sorted so ties keep
//! discovery order: tables, then forms, then checkboxes, then text.

use crate::model::{CheckboxEntity, FormField, ParsedPage, TableEntity};

/// Position used to order layout elements.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SortKey {
    /// Top coordinate
    pub top: f64,
    /// Left coordinate
    pub left: f64,
}

impl SortKey {
    fn compare(&self, other: &Self) -> std::cmp::Ordering {
        self.top
            .total_cmp(&other.top)
            .then(self.left.total_cmp(&other.left))
    }
}

/// A renderable unit of a page.
#[derive(Debug, Clone)]
pub enum LayoutElement<'a> {
    /// A single table
    Table {
        /// Position
        key: SortKey,
        /// The table
        table: &'a TableEntity,
    },

    /// All form fields of the page
    FormGroup {
        /// Position (topmost member)
        key: SortKey,
        /// Member fields in discovery order
        fields: &'a [FormField],
    },

    /// All checkboxes of the page
    CheckboxGroup {
        /// Position (topmost member)
        key: SortKey,
        /// Member checkboxes in discovery order
        checkboxes: &'a [CheckboxEntity],
    },

    /// The page's free text
    TextBlock {
        /// Position (always the page origin)
        key: SortKey,
        /// Full page text
        text: &'a str,
    },
}

impl LayoutElement<'_> {
    /// Sort key of this element.
    pub fn key(&self) -> SortKey {
        match self {
            LayoutElement::Table { key, .. }
            | LayoutElement::FormGroup { key, .. }
            | LayoutElement::CheckboxGroup { key, .. }
            | LayoutElement::TextBlock { key, .. } => *key,
        }
    }
}

/// Orders a page's entities into reading order.
pub struct LayoutAnalyzer;

impl LayoutAnalyzer {
    /// Build and sort the layout elements of a page.
    pub fn analyze(page: &ParsedPage) -> Vec<LayoutElement<'_>> {
        let mut elements = Vec::with_capacity(page.tables.len() + 3);

        for table in &page.tables {
            elements.push(LayoutElement::Table {
                key: SortKey {
                    top: table.bounding_box.top,
                    left: table.bounding_box.left,
                },
                table,
            });
        }

        if !page.forms.is_empty() {
            elements.push(LayoutElement::FormGroup {
                key: group_key(page.forms.iter().map(|f| f.bounding_box.top)),
                fields: &page.forms,
            });
        }

        if !page.checkboxes.is_empty() {
            elements.push(LayoutElement::CheckboxGroup {
                key: group_key(page.checkboxes.iter().map(|c| c.bounding_box.top)),
                checkboxes: &page.checkboxes,
            });
        }

        if !page.full_text.is_empty() {
            elements.push(LayoutElement::TextBlock {
                key: SortKey::default(),
                text: &page.full_text,
            });
        }

        // `sort_by` is stable, which keeps discovery order for equal keys.
        elements.sort_by(|a, b| a.key().compare(&b.key()));
        elements
    }
}

fn group_key(tops: impl Iterator<Item = f64>) -> SortKey {
    SortKey {
        top: tops.fold(f64::INFINITY, f64::min),
        left: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoundingBox;

    fn kinds(elements: &[LayoutElement<'_>]) -> Vec<&'static str> {
        elements
            .iter()
            .map(|e| match e {
                LayoutElement::Table { .. } => "table",
                LayoutElement::FormGroup { .. } => "form",
                LayoutElement::CheckboxGroup { .. } => "checkbox",
                LayoutElement::TextBlock { .. } => "text",
            })
            .collect()
    }

    #[test]
    fn test_orders_by_top() {
        let mut page = ParsedPage::new();
        page.tables
            .push(TableEntity::new("t").with_bbox(BoundingBox::at(0.1, 0.7)));
        page.forms
            .push(FormField::new("a", "b").with_bbox(BoundingBox::at(0.5, 0.4)));
        page.forms
            .push(FormField::new("c", "d").with_bbox(BoundingBox::at(0.5, 0.2)));
        page.checkboxes.push(CheckboxEntity::new(true, 0.1, 0.3));
        page.full_text = "text".into();

        let elements = LayoutAnalyzer::analyze(&page);
        assert_eq!(kinds(&elements), vec!["text", "form", "checkbox", "table"]);
        assert_eq!(elements[1].key().top, 0.2);
    }

    #[test]
    fn test_ties_keep_discovery_order() {
        let mut page = ParsedPage::new();
        page.tables.push(TableEntity::new("t"));
        page.forms.push(FormField::new("a", "b"));
        page.checkboxes.push(CheckboxEntity::new(false, 0.0, 0.0));
        page.full_text = "text".into();

        let elements = LayoutAnalyzer::analyze(&page);
        assert_eq!(kinds(&elements), vec!["table", "form", "checkbox", "text"]);
    }

    #[test]
    fn test_empty_groups_are_skipped() {
        let page = ParsedPage::new();
        assert!(LayoutAnalyzer::analyze(&page).is_empty());
    }
}
