//! # lanidrac
//!
//! OCR detection graphs to layout-faithful Markdown and schema-checked JSON.
//!
//! An OCR provider reports a page as a flat graph of positioned blocks
//! (lines, words, table cells, key/value sets, checkboxes) linked by typed
//! references. This library resolves that graph into typed entities,
//! renders them in reading order as Markdown, and validates and scores
//! structured data a vision model extracts from the same page.
//!
//! ## Quick Start
//!
//! ```no_run
//! use lanidrac::{parse_response, render, resolve_blocks};
//!
//! fn main() -> lanidrac::Result<()> {
//!     let json = std::fs::read_to_string("page.json")?;
//!     let response = parse_response(&json)?;
//!
//!     let page = resolve_blocks(&response.blocks);
//!     let markdown = render::to_markdown(&page, &render::RenderOptions::default());
//!     println!("{}", markdown);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Graph resolution**: tables, form fields, checkboxes and text lines
//! - **Reading order**: entities sorted top-to-bottom with stable ties
//! - **Markdown synthesis**: GFM tables, task lists, headings, nested bullets
//! - **Schema validation**: shorthand or JSON-Schema input, per-field findings
//! - **Confidence scoring**: validation stats cross-checked against OCR evidence
//! - **Safe fallback**: model failures yield schema-shaped data, never errors
//! - **Parallel processing**: Uses Rayon for multi-page documents

pub mod error;
pub mod extract;
pub mod model;
pub mod parser;
pub mod render;
pub mod schema;

// Re-export commonly used types
pub use error::{Error, Result};
pub use extract::{
    ExtractEngine, ExtractOptions, ExtractionResult, ExtractionSource, RefineOptions,
    RefinementEngine, VisionModel, VisionRequest,
};
pub use model::{
    Block, BlockType, BoundingBox, CheckboxEntity, Document, DocumentSummary, FormField,
    ParsedPage, PositionedText, TableEntity,
};
pub use parser::{parse_response, BlockGraphResolver, ProviderResponse};
pub use render::{JsonFormat, LayoutThresholds, RenderOptions};
pub use schema::{CanonicalSchema, TypeTag, ValidationStats};

use std::path::Path;

/// Resolve one page's block graph into typed entities.
///
/// Never fails: dangling references and missing fields degrade to empty
/// values.
pub fn resolve_blocks(blocks: &[Block]) -> ParsedPage {
    parser::resolve(blocks)
}

/// Decode a provider response and render it to Markdown.
///
/// # Example
///
/// ```no_run
/// let json = std::fs::read_to_string("page.json").unwrap();
/// let markdown = lanidrac::to_markdown(&json).unwrap();
/// ```
pub fn to_markdown(response_json: &str) -> Result<String> {
    to_markdown_with_options(response_json, &RenderOptions::default())
}

/// Decode a provider response and render it with custom options.
pub fn to_markdown_with_options(response_json: &str, options: &RenderOptions) -> Result<String> {
    let response = parse_response(response_json)?;
    let page = resolve_blocks(&response.blocks);
    Ok(render::to_markdown(&page, options))
}

/// Parse and normalize a schema given as JSON text.
///
/// # Example
///
/// ```
/// let schema = lanidrac::normalize_schema(r#"{"total": "number"}"#).unwrap();
/// assert_eq!(schema.leaf_count(), 1);
/// ```
pub fn normalize_schema(schema_json: &str) -> Result<CanonicalSchema> {
    CanonicalSchema::from_json_str(schema_json)
}

/// Validate data against a canonical schema.
pub fn validate(data: &serde_json::Value, schema: &CanonicalSchema) -> ValidationStats {
    schema::validate(data, schema)
}

/// Builder for resolving and rendering multi-page documents.
///
/// # Example
///
/// ```no_run
/// use lanidrac::Lanidrac;
///
/// let markdown = Lanidrac::new()
///     .with_page_headers()
///     .parse_files(["page1.json", "page2.json"])?
///     .to_markdown();
/// # Ok::<(), lanidrac::Error>(())
/// ```
pub struct Lanidrac {
    render_options: RenderOptions,
    parallel: bool,
}

impl Lanidrac {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            render_options: RenderOptions::default(),
            parallel: true,
        }
    }

    /// Prefix each rendered page with a page header.
    pub fn with_page_headers(mut self) -> Self {
        self.render_options = self.render_options.with_page_headers(true);
        self
    }

    /// Set layout thresholds.
    pub fn with_thresholds(mut self, thresholds: LayoutThresholds) -> Self {
        self.render_options = self.render_options.with_thresholds(thresholds);
        self
    }

    /// Set render options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self.render_options = self.render_options.sequential();
        self
    }

    /// Resolve a single provider response.
    pub fn parse(self, response_json: &str) -> Result<LanidracResult> {
        self.parse_pages([response_json])
    }

    /// Resolve provider responses, one per page, in page order.
    pub fn parse_pages<I, S>(self, responses: I) -> Result<LanidracResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let pages = responses
            .into_iter()
            .map(|json| parse_response(json.as_ref()).map(|r| r.blocks))
            .collect::<Result<Vec<_>>>()?;

        Ok(LanidracResult {
            document: parser::resolve_pages(&pages, self.parallel),
            render_options: self.render_options,
        })
    }

    /// Read and resolve provider response files, one per page.
    pub fn parse_files<I, P>(self, paths: I) -> Result<LanidracResult>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let responses = paths
            .into_iter()
            .map(std::fs::read_to_string)
            .collect::<std::io::Result<Vec<_>>>()?;
        self.parse_pages(responses)
    }
}

impl Default for Lanidrac {
    fn default() -> Self {
        Self::new()
    }
}

/// A resolved document ready for rendering.
pub struct LanidracResult {
    /// The resolved document
    pub document: Document,
    /// Render options to use
    render_options: RenderOptions,
}

impl LanidracResult {
    /// Convert to Markdown.
    pub fn to_markdown(&self) -> String {
        render::to_markdown_document(&self.document, &self.render_options)
    }

    /// Convert to Markdown with rendering statistics.
    pub fn to_markdown_with_stats(&self) -> render::RenderResult {
        render::to_markdown_document_with_stats(&self.document, &self.render_options)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Get a page by number (1-indexed).
    pub fn page(&self, number: u32) -> Result<&ParsedPage> {
        self.document
            .get_page(number)
            .ok_or(Error::PageOutOfRange(number, self.document.page_count()))
    }

    /// Page-marked text of every page.
    pub fn full_text(&self) -> String {
        self.document.full_text()
    }

    /// Entity totals.
    pub fn summary(&self) -> DocumentSummary {
        self.document.summary()
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"{
        "DocumentMetadata": {"Pages": 1},
        "Blocks": [
            {"Id": "p", "BlockType": "PAGE", "Relationships": [{"Type": "CHILD", "Ids": ["l1"]}]},
            {"Id": "l1", "BlockType": "LINE", "Text": "Hello",
             "Geometry": {"BoundingBox": {"Left": 0.1, "Top": 0.05, "Width": 0.2, "Height": 0.02}}}
        ]
    }"#;

    #[test]
    fn test_lanidrac_builder() {
        let builder = Lanidrac::new().with_page_headers().sequential();

        assert!(builder.render_options.page_headers);
        assert!(!builder.render_options.parallel);
        assert!(!builder.parallel);
    }

    #[test]
    fn test_to_markdown() {
        assert_eq!(to_markdown(PAGE).unwrap(), "# Hello");
    }

    #[test]
    fn test_invalid_response_is_error() {
        assert!(matches!(to_markdown("not json"), Err(Error::Json(_))));
    }

    #[test]
    fn test_parse_pages() {
        let result = Lanidrac::new().parse_pages([PAGE, PAGE]).unwrap();

        assert_eq!(result.document.page_count(), 2);
        assert_eq!(result.full_text(), "--- Page 1 ---\nHello\n\n--- Page 2 ---\nHello");
        assert!(matches!(result.page(3), Err(Error::PageOutOfRange(3, 2))));
    }

    #[test]
    fn test_parse_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.json");
        std::fs::write(&path, PAGE).unwrap();

        let result = Lanidrac::new().parse_files([&path]).unwrap();
        assert_eq!(result.to_markdown(), "# Hello");
    }

    #[test]
    fn test_normalize_and_validate() {
        let schema = normalize_schema(r#"{"name": "string"}"#).unwrap();
        let stats = validate(&serde_json::json!({"name": "Ana"}), &schema);
        assert_eq!(stats.valid_fields, 1);
        assert!(normalize_schema("{").is_err());
    }
}
