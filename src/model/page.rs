//! Page-level types.

use super::{BlockType, BoundingBox, CheckboxEntity, FormField, TableEntity};
use serde::{Deserialize, Serialize};

/// An entry of the positional index: any text-bearing or structural block
/// flattened with its geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedText {
    /// Source block id
    pub id: String,

    /// Source block kind
    pub block_type: BlockType,

    /// Literal text of the block (empty when it has none)
    pub text: String,

    /// Detection confidence
    pub confidence: f64,

    /// Block geometry
    pub bounding_box: BoundingBox,
}

impl PositionedText {
    /// Create a LINE entry at `(left, top)`.
    pub fn line(text: impl Into<String>, left: f64, top: f64) -> Self {
        Self {
            id: String::new(),
            block_type: BlockType::Line,
            text: text.into(),
            confidence: 0.0,
            bounding_box: BoundingBox::at(left, top),
        }
    }

    /// Set geometry and return self.
    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bounding_box = bbox;
        self
    }

    /// Check whether this entry is a LINE.
    pub fn is_line(&self) -> bool {
        self.block_type == BlockType::Line
    }
}

/// Typed entities resolved from one page's detection graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedPage {
    /// Tables in discovery order
    pub tables: Vec<TableEntity>,

    /// Form fields in discovery order
    pub forms: Vec<FormField>,

    /// Checkboxes in discovery order
    pub checkboxes: Vec<CheckboxEntity>,

    /// Positional index of LINE, WORD, TABLE, CELL, KEY_VALUE_SET and
    /// SELECTION_ELEMENT blocks
    pub lines: Vec<PositionedText>,

    /// LINE texts joined with newlines
    pub full_text: String,
}

impl ParsedPage {
    /// Create an empty page.
    pub fn new() -> Self {
        Self::default()
    }

    /// LINE entries of the positional index.
    pub fn text_lines(&self) -> impl Iterator<Item = &PositionedText> {
        self.lines.iter().filter(|p| p.is_line())
    }

    /// Check whether nothing was resolved on the page.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
            && self.forms.is_empty()
            && self.checkboxes.is_empty()
            && self.full_text.trim().is_empty()
    }

    /// Form keys, form values and table cell texts joined with spaces.
    ///
    /// This is the evidence text used to cross-check generated values.
    pub fn evidence_text(&self) -> String {
        let forms = self.forms.iter().flat_map(|f| [f.key.as_str(), f.value.as_str()]);
        let cells = self.tables.iter().flat_map(|t| t.cell_texts());

        forms
            .chain(cells)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
