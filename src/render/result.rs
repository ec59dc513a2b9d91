//! Rendering result with statistics.

use serde::{Deserialize, Serialize};

/// Rendered markdown together with what went into it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// The rendered markdown
    pub content: String,

    /// Rendering statistics
    pub stats: RenderStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(content: String, stats: RenderStats) -> Self {
        Self { content, stats }
    }

    /// Get the content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Counts collected while rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderStats {
    /// Pages rendered
    pub page_count: u32,

    /// Tables rendered
    pub table_count: u32,

    /// Form fields rendered
    pub form_field_count: u32,

    /// Form blocks skipped because free text already covered them
    pub suppressed_form_count: u32,

    /// Checkboxes rendered
    pub checkbox_count: u32,

    /// Headings emitted
    pub heading_count: u32,

    /// Body paragraphs emitted
    pub paragraph_count: u32,

    /// Whitespace-separated tokens in the output
    pub word_count: u32,
}

impl RenderStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add word counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &RenderStats) {
        self.page_count += other.page_count;
        self.table_count += other.table_count;
        self.form_field_count += other.form_field_count;
        self.suppressed_form_count += other.suppressed_form_count;
        self.checkbox_count += other.checkbox_count;
        self.heading_count += other.heading_count;
        self.paragraph_count += other.paragraph_count;
        self.word_count += other.word_count;
    }
}
