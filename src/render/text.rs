//! Free-text rendering: paragraph grouping, heading detection and indentation.

use super::LayoutThresholds;
use crate::model::PositionedText;

/// A rendered paragraph of free text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextParagraph {
    /// Markdown for the paragraph
    pub markdown: String,
    /// Heading level (1-3) when the paragraph became a heading
    pub heading: Option<u8>,
}

/// Group lines into paragraphs by vertical gaps.
///
/// Lines are sorted by `(top, left)`. A new paragraph starts when a line's
/// top lies more than `paragraph_gap` below the previous line's bottom.
pub fn group_paragraphs<'a>(
    lines: impl IntoIterator<Item = &'a PositionedText>,
    thresholds: &LayoutThresholds,
) -> Vec<Vec<&'a PositionedText>> {
    let mut sorted: Vec<&PositionedText> = lines
        .into_iter()
        .filter(|l| l.is_line() && !l.text.trim().is_empty())
        .collect();
    sorted.sort_by(|a, b| {
        a.bounding_box
            .top
            .total_cmp(&b.bounding_box.top)
            .then(a.bounding_box.left.total_cmp(&b.bounding_box.left))
    });

    let mut paragraphs: Vec<Vec<&PositionedText>> = Vec::new();
    let mut prev_bottom: Option<f64> = None;

    for line in sorted {
        let top = line.bounding_box.top;
        let starts_new = match prev_bottom {
            Some(bottom) => top - bottom > thresholds.paragraph_gap,
            None => true,
        };
        if starts_new {
            paragraphs.push(Vec::new());
        }
        if let Some(current) = paragraphs.last_mut() {
            current.push(line);
        }

        let height = if line.bounding_box.height > 0.0 {
            line.bounding_box.height
        } else {
            thresholds.default_line_height
        };
        prev_bottom = Some(top + height);
    }

    paragraphs
}

/// Heading level of a paragraph whose first line is `first`.
pub fn heading_level(first: &PositionedText, thresholds: &LayoutThresholds) -> Option<u8> {
    let text = first.text.trim();
    let len = text.chars().count();

    if first.bounding_box.top < thresholds.heading_top_band && len < thresholds.heading_max_len {
        return Some(1);
    }

    let has_upper = text.chars().any(char::is_uppercase);
    let has_lower = text.chars().any(char::is_lowercase);
    if has_upper && !has_lower && len > thresholds.uppercase_min_len && len < thresholds.heading_max_len
    {
        return Some(2);
    }

    let starts_upper = text.chars().next().is_some_and(char::is_uppercase);
    if len < thresholds.subheading_max_len && starts_upper && text.ends_with(':') {
        return Some(3);
    }

    None
}

/// Render one paragraph.
pub fn render_paragraph(
    paragraph: &[&PositionedText],
    thresholds: &LayoutThresholds,
) -> Option<TextParagraph> {
    let first = paragraph.first()?;

    if let Some(level) = heading_level(first, thresholds) {
        let text: Vec<&str> = paragraph.iter().map(|l| l.text.trim()).collect();
        return Some(TextParagraph {
            markdown: format!("{} {}", "#".repeat(level as usize), text.join(" ")),
            heading: Some(level),
        });
    }

    if paragraph.len() == 1 {
        return Some(TextParagraph {
            markdown: first.text.trim().to_string(),
            heading: None,
        });
    }

    let margin = paragraph
        .iter()
        .map(|l| l.bounding_box.left)
        .fold(f64::INFINITY, f64::min);

    let lines: Vec<String> = paragraph
        .iter()
        .map(|line| {
            let text = line.text.trim();
            if line.bounding_box.left - margin > thresholds.indent_threshold {
                format!("  - {}", text)
            } else {
                text.to_string()
            }
        })
        .collect();

    Some(TextParagraph {
        markdown: lines.join("\n"),
        heading: None,
    })
}

/// Render a page's free text.
///
/// Without any LINE geometry the raw text is returned unchanged.
pub fn render_text(
    full_text: &str,
    lines: &[PositionedText],
    thresholds: &LayoutThresholds,
) -> String {
    if !lines.iter().any(PositionedText::is_line) {
        return full_text.to_string();
    }

    group_paragraphs(lines, thresholds)
        .iter()
        .filter_map(|p| render_paragraph(p, thresholds))
        .map(|p| p.markdown)
        .collect::<Vec<_>>()
        .join("\n\n")
}
