//! Table types.

use super::BoundingBox;
use serde::{Deserialize, Serialize};

/// A table resolved from the block graph.
///
/// Rows follow ascending source row index and cells within a row follow
/// ascending column index. Unreferenced slots are absent, not padded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableEntity {
    /// Source block id
    pub id: String,

    /// Rows of cells
    pub rows: Vec<Vec<Cell>>,

    /// Detection confidence of the table block
    pub confidence: f64,

    /// Table geometry
    pub bounding_box: BoundingBox,
}

impl TableEntity {
    /// Create an empty table.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Build a table from text rows, mostly useful for tests and evidence.
    pub fn from_rows<R, S>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Cell::text).collect())
                .collect(),
            ..Self::default()
        }
    }

    /// Set geometry and return self.
    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bounding_box = bbox;
        self
    }

    /// Add a row.
    pub fn add_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Widest row after column-span expansion.
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.iter().map(Cell::width).sum::<usize>())
            .max()
            .unwrap_or(0)
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Check if any cell spans more than one row or column.
    pub fn has_merged_cells(&self) -> bool {
        self.rows.iter().flatten().any(Cell::is_merged)
    }

    /// Iterate over every cell text.
    pub fn cell_texts(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().flatten().map(|c| c.text.as_str())
    }

    /// Tab-separated plain text, one line per row.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|c| c.text.as_str())
                    .collect::<Vec<_>>()
                    .join("\t")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Resolved cell text
    pub text: String,

    /// Number of rows this cell spans
    pub row_span: u32,

    /// Number of columns this cell spans
    pub col_span: u32,

    /// Detection confidence
    pub confidence: f64,
}

impl Cell {
    /// Create a single-slot cell with text content.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            row_span: 1,
            col_span: 1,
            confidence: 0.0,
        }
    }

    /// Create an empty cell.
    pub fn empty() -> Self {
        Self::text("")
    }

    /// Set colspan and return self.
    pub fn colspan(mut self, span: u32) -> Self {
        self.col_span = span;
        self
    }

    /// Set rowspan and return self.
    pub fn rowspan(mut self, span: u32) -> Self {
        self.row_span = span;
        self
    }

    /// Columns occupied once expanded (never less than one).
    pub fn width(&self) -> usize {
        self.col_span.max(1) as usize
    }

    /// Check if the cell has no visible text.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Check if this cell spans multiple rows or columns.
    pub fn is_merged(&self) -> bool {
        self.row_span > 1 || self.col_span > 1
    }
}
