//! Document model types for OCR detection output.
//!
//! Two layers live here: the raw block graph exactly as an OCR provider
//! reports it, and the typed entities (tables, form fields, checkboxes,
//! positioned text) that the resolver derives from it. Renderers and the
//! extraction engine only ever consume the typed layer.

mod block;
mod document;
mod form;
mod page;
mod table;

pub use block::{Block, BlockType, BoundingBox, Relationship, RelationshipKind, SelectionStatus};
pub use document::{Document, DocumentSummary, PageResult};
pub use form::{CheckboxEntity, FormField};
pub use page::{ParsedPage, PositionedText};
pub use table::{Cell, TableEntity};
