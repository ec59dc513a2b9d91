//! Rendering of parsed pages to markdown and JSON.

mod checkbox;
mod cleanup;
mod form;
mod json;
mod layout;
mod markdown;
mod options;
mod result;
mod table;
mod text;

pub use checkbox::{find_label, render_checkboxes, DEFAULT_CHECKBOX_LABEL};
pub use cleanup::MarkdownFormatter;
pub use form::{forms_covered_by_text, render_forms};
pub use json::{to_json, JsonFormat};
pub use layout::{LayoutAnalyzer, LayoutElement, SortKey};
pub use markdown::{
    synthesize, to_markdown, to_markdown_document, to_markdown_document_with_stats,
    to_markdown_with_stats, MarkdownRenderer,
};
pub use options::{LayoutThresholds, RenderOptions};
pub use result::{RenderResult, RenderStats};
pub use table::{expand_row, render_table};
pub use text::{group_paragraphs, heading_level, render_paragraph, render_text, TextParagraph};
