//! Raw detection-graph types.

use serde::{Deserialize, Serialize};

/// Kind of a detection block.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockType {
    /// Whole-page block
    Page,
    /// A line of text
    Line,
    /// A single word (leaf text carrier)
    Word,
    /// A table container
    Table,
    /// A table cell
    Cell,
    /// A merged table cell
    MergedCell,
    /// A key or value of a form field
    KeyValueSet,
    /// A checkbox or radio button
    SelectionElement,
    /// Any other provider-specific block type
    Other(String),
}

impl BlockType {
    /// Provider tag for this block type.
    pub fn as_str(&self) -> &str {
        match self {
            BlockType::Page => "PAGE",
            BlockType::Line => "LINE",
            BlockType::Word => "WORD",
            BlockType::Table => "TABLE",
            BlockType::Cell => "CELL",
            BlockType::MergedCell => "MERGED_CELL",
            BlockType::KeyValueSet => "KEY_VALUE_SET",
            BlockType::SelectionElement => "SELECTION_ELEMENT",
            BlockType::Other(tag) => tag,
        }
    }

    /// Whether blocks of this type belong in the positional index.
    pub fn is_positional(&self) -> bool {
        matches!(
            self,
            BlockType::Line
                | BlockType::Word
                | BlockType::Table
                | BlockType::Cell
                | BlockType::KeyValueSet
                | BlockType::SelectionElement
        )
    }
}

impl From<String> for BlockType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "PAGE" => BlockType::Page,
            "LINE" => BlockType::Line,
            "WORD" => BlockType::Word,
            "TABLE" => BlockType::Table,
            "CELL" => BlockType::Cell,
            "MERGED_CELL" => BlockType::MergedCell,
            "KEY_VALUE_SET" => BlockType::KeyValueSet,
            "SELECTION_ELEMENT" => BlockType::SelectionElement,
            _ => BlockType::Other(tag),
        }
    }
}

impl From<&str> for BlockType {
    fn from(tag: &str) -> Self {
        BlockType::from(tag.to_string())
    }
}

impl From<BlockType> for String {
    fn from(block_type: BlockType) -> Self {
        block_type.as_str().to_string()
    }
}

/// Kind of a reference from one block to others.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RelationshipKind {
    /// Containment (table → cell, line → word, key → word)
    Child,
    /// Form key → form value pairing
    Value,
    /// Anything else the provider emits
    Other(String),
}

impl From<String> for RelationshipKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "CHILD" => RelationshipKind::Child,
            "VALUE" => RelationshipKind::Value,
            _ => RelationshipKind::Other(tag),
        }
    }
}

impl From<RelationshipKind> for String {
    fn from(kind: RelationshipKind) -> Self {
        match kind {
            RelationshipKind::Child => "CHILD".to_string(),
            RelationshipKind::Value => "VALUE".to_string(),
            RelationshipKind::Other(tag) => tag,
        }
    }
}

/// A typed reference to other blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// Relationship kind
    pub kind: RelationshipKind,

    /// Target block ids
    pub ids: Vec<String>,
}

impl Relationship {
    /// Create a CHILD relationship.
    pub fn child<S: Into<String>>(ids: impl IntoIterator<Item = S>) -> Self {
        Self {
            kind: RelationshipKind::Child,
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a VALUE relationship.
    pub fn value<S: Into<String>>(ids: impl IntoIterator<Item = S>) -> Self {
        Self {
            kind: RelationshipKind::Value,
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }
}

/// Normalized page geometry, every coordinate in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Distance from the left page edge
    pub left: f64,
    /// Distance from the top page edge
    pub top: f64,
    /// Box width
    pub width: f64,
    /// Box height
    pub height: f64,
}

impl BoundingBox {
    /// Create a bounding box.
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Box positioned at `(left, top)` with no extent.
    pub fn at(left: f64, top: f64) -> Self {
        Self::new(left, top, 0.0, 0.0)
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Checkbox state reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionStatus {
    /// The box is ticked
    Selected,
    /// The box is empty
    #[default]
    NotSelected,
}

/// A single node of the detection graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Unique id within the page
    pub id: String,

    /// Block kind
    pub block_type: BlockType,

    /// Literal text, when the provider attached one
    pub text: Option<String>,

    /// Outgoing references
    pub relationships: Vec<Relationship>,

    /// Position on the page
    pub bounding_box: BoundingBox,

    /// Detection confidence in `[0, 100]`
    pub confidence: f64,

    /// 1-based table row (cells only)
    pub row_index: Option<u32>,

    /// 1-based table column (cells only)
    pub column_index: Option<u32>,

    /// Rows spanned (cells only)
    pub row_span: Option<u32>,

    /// Columns spanned (cells only)
    pub column_span: Option<u32>,

    /// Entity tags, e.g. `KEY` / `VALUE` on key-value sets
    pub entity_types: Vec<String>,

    /// Checkbox state (selection elements only)
    pub selection_status: Option<SelectionStatus>,
}

impl Block {
    /// Create a block with no text, geometry or relationships.
    pub fn new(id: impl Into<String>, block_type: impl Into<BlockType>) -> Self {
        Self {
            id: id.into(),
            block_type: block_type.into(),
            text: None,
            relationships: Vec::new(),
            bounding_box: BoundingBox::default(),
            confidence: 0.0,
            row_index: None,
            column_index: None,
            row_span: None,
            column_span: None,
            entity_types: Vec::new(),
            selection_status: None,
        }
    }

    /// Create a WORD block.
    pub fn word(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, BlockType::Word).with_text(text)
    }

    /// Create a LINE block positioned at `(left, top)`.
    pub fn line(id: impl Into<String>, text: impl Into<String>, left: f64, top: f64) -> Self {
        Self::new(id, BlockType::Line)
            .with_text(text)
            .with_bbox(BoundingBox::at(left, top))
    }

    /// Create a CELL block at the given 1-based position.
    pub fn cell(id: impl Into<String>, row: u32, column: u32) -> Self {
        let mut block = Self::new(id, BlockType::Cell);
        block.row_index = Some(row);
        block.column_index = Some(column);
        block
    }

    /// Create a KEY_VALUE_SET block tagged as a key.
    pub fn key(id: impl Into<String>) -> Self {
        Self::new(id, BlockType::KeyValueSet).with_entity_type("KEY")
    }

    /// Create a KEY_VALUE_SET block tagged as a value.
    pub fn value(id: impl Into<String>) -> Self {
        Self::new(id, BlockType::KeyValueSet).with_entity_type("VALUE")
    }

    /// Create a SELECTION_ELEMENT block.
    pub fn checkbox(id: impl Into<String>, selected: bool, left: f64, top: f64) -> Self {
        let mut block = Self::new(id, BlockType::SelectionElement)
            .with_bbox(BoundingBox::at(left, top));
        block.selection_status = Some(if selected {
            SelectionStatus::Selected
        } else {
            SelectionStatus::NotSelected
        });
        block
    }

    /// Set literal text and return self.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set geometry and return self.
    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bounding_box = bbox;
        self
    }

    /// Set confidence and return self.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Add CHILD references and return self.
    pub fn with_children<S: Into<String>>(mut self, ids: impl IntoIterator<Item = S>) -> Self {
        self.relationships.push(Relationship::child(ids));
        self
    }

    /// Add a VALUE reference and return self.
    pub fn with_value(mut self, id: impl Into<String>) -> Self {
        self.relationships.push(Relationship::value([id.into()]));
        self
    }

    /// Set cell spans and return self.
    pub fn with_span(mut self, row_span: u32, column_span: u32) -> Self {
        self.row_span = Some(row_span);
        self.column_span = Some(column_span);
        self
    }

    /// Add an entity tag and return self.
    pub fn with_entity_type(mut self, tag: impl Into<String>) -> Self {
        self.entity_types.push(tag.into());
        self
    }

    /// Check whether the block carries an entity tag.
    pub fn has_entity_type(&self, tag: &str) -> bool {
        self.entity_types.iter().any(|t| t == tag)
    }

    /// Target ids of every relationship of the given kind, in source order.
    pub fn related_ids(&self, kind: RelationshipKind) -> impl Iterator<Item = &str> + '_ {
        self.relationships
            .iter()
            .filter(move |r| r.kind == kind)
            .flat_map(|r| r.ids.iter().map(String::as_str))
    }
}
