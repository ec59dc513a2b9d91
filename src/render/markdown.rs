//! Markdown synthesis for parsed pages and documents.

use rayon::prelude::*;

use crate::model::{Document, ParsedPage, PositionedText};

use super::checkbox::render_checkboxes;
use super::cleanup::MarkdownFormatter;
use super::form::{forms_covered_by_text, render_forms};
use super::layout::{LayoutAnalyzer, LayoutElement};
use super::table::render_table;
use super::text::{group_paragraphs, render_paragraph};
use super::{RenderOptions, RenderResult, RenderStats};

/// Render one page with default options.
pub fn synthesize(page: &ParsedPage) -> String {
    to_markdown(page, &RenderOptions::default())
}

/// Render one page to markdown.
pub fn to_markdown(page: &ParsedPage, options: &RenderOptions) -> String {
    MarkdownRenderer::new(options.clone()).render_page(page)
}

/// Render one page to markdown with statistics.
pub fn to_markdown_with_stats(page: &ParsedPage, options: &RenderOptions) -> RenderResult {
    let mut renderer = MarkdownRenderer::new(options.clone().with_stats(true));
    let content = renderer.render_page(page);
    renderer.stats.count_text(&content);
    RenderResult::new(content, renderer.stats)
}

/// Render every page of a document and join them in page-number order.
pub fn to_markdown_document(doc: &Document, options: &RenderOptions) -> String {
    render_document(doc, options).content
}

/// Render a document with statistics.
pub fn to_markdown_document_with_stats(doc: &Document, options: &RenderOptions) -> RenderResult {
    let mut result = render_document(doc, &options.clone().with_stats(true));
    result.stats.count_text(&result.content);
    result
}

fn render_document(doc: &Document, options: &RenderOptions) -> RenderResult {
    let total = doc.page_count();

    let render_one = |number: u32, page: &ParsedPage| {
        let mut renderer = MarkdownRenderer::new(options.clone());
        let content = renderer.render_page(page);
        (number, content, renderer.stats)
    };

    let mut rendered: Vec<(u32, String, RenderStats)> = if options.parallel {
        doc.pages
            .par_iter()
            .map(|p| render_one(p.number, &p.page))
            .collect()
    } else {
        doc.pages
            .iter()
            .map(|p| render_one(p.number, &p.page))
            .collect()
    };
    rendered.sort_by_key(|(number, _, _)| *number);

    let formatter = MarkdownFormatter::new();
    let mut stats = RenderStats::new();
    let mut parts = Vec::with_capacity(rendered.len());

    for (number, content, page_stats) in rendered {
        stats.merge(&page_stats);
        if options.page_headers {
            parts.push(format!("{}{}", formatter.page_header(number, total), content));
        } else if !content.is_empty() {
            parts.push(content);
        }
    }

    RenderResult::new(parts.join(&options.page_separator), stats)
}

/// Renders parsed pages to markdown.
pub struct MarkdownRenderer {
    options: RenderOptions,
    formatter: MarkdownFormatter,
    stats: RenderStats,
}

impl MarkdownRenderer {
    /// Create a new renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            formatter: MarkdownFormatter::new(),
            stats: RenderStats::new(),
        }
    }

    /// Statistics collected so far.
    pub fn stats(&self) -> &RenderStats {
        &self.stats
    }

    /// Render a page: order its entities, render each one, then normalize.
    pub fn render_page(&mut self, page: &ParsedPage) -> String {
        if self.options.collect_stats {
            self.stats.page_count += 1;
        }

        let fragments: Vec<String> = LayoutAnalyzer::analyze(page)
            .into_iter()
            .filter_map(|element| self.render_element(page, element))
            .filter(|fragment| !fragment.trim().is_empty())
            .collect();

        self.formatter.clean(&fragments.join("\n\n"))
    }

    fn render_element(&mut self, page: &ParsedPage, element: LayoutElement<'_>) -> Option<String> {
        let thresholds = &self.options.thresholds;

        match element {
            LayoutElement::Table { table, .. } => {
                let rendered = render_table(table);
                if rendered.is_some() && self.options.collect_stats {
                    self.stats.table_count += 1;
                }
                rendered
            }
            LayoutElement::FormGroup { fields, .. } => {
                if forms_covered_by_text(fields, &page.full_text, thresholds.form_overlap_ratio) {
                    log::debug!("Skipping {} form fields already present in text", fields.len());
                    if self.options.collect_stats {
                        self.stats.suppressed_form_count += 1;
                    }
                    return None;
                }
                if self.options.collect_stats {
                    self.stats.form_field_count +=
                        fields.iter().filter(|f| !f.key.trim().is_empty()).count() as u32;
                }
                render_forms(fields)
            }
            LayoutElement::CheckboxGroup { checkboxes, .. } => {
                if self.options.collect_stats {
                    self.stats.checkbox_count += checkboxes.len() as u32;
                }
                render_checkboxes(checkboxes, &page.lines, thresholds)
            }
            LayoutElement::TextBlock { text, .. } => Some(self.render_text(text, &page.lines)),
        }
    }

    fn render_text(&mut self, text: &str, lines: &[PositionedText]) -> String {
        if !lines.iter().any(PositionedText::is_line) {
            if self.options.collect_stats {
                self.stats.paragraph_count += 1;
            }
            return text.to_string();
        }

        let thresholds = &self.options.thresholds;
        let mut paragraphs = Vec::new();

        for group in group_paragraphs(lines, thresholds) {
            if let Some(paragraph) = render_paragraph(&group, thresholds) {
                if self.options.collect_stats {
                    match paragraph.heading {
                        Some(_) => self.stats.heading_count += 1,
                        None => self.stats.paragraph_count += 1,
                    }
                }
                paragraphs.push(paragraph.markdown);
            }
        }

        paragraphs.join("\n\n")
    }
}
