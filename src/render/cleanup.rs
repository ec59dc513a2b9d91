//! Whitespace normalization of rendered markdown.

use regex::Regex;

/// Final formatting pass over rendered markdown.
pub struct MarkdownFormatter {
    blank_runs: Regex,
}

impl MarkdownFormatter {
    /// Create a new formatter.
    pub fn new() -> Self {
        Self {
            // Literal pattern; compilation cannot fail.
            blank_runs: Regex::new(r"\n{3,}").unwrap(),
        }
    }

    /// Normalize whitespace.
    ///
    /// Collapses three or more consecutive newlines to two, right-trims
    /// every line that is not a table row, and trims the outer text.
    pub fn clean(&self, markdown: &str) -> String {
        let collapsed = self.blank_runs.replace_all(markdown, "\n\n");

        let lines: Vec<&str> = collapsed
            .split('\n')
            .map(|line| {
                if line.trim_start().starts_with('|') {
                    line
                } else {
                    line.trim_end()
                }
            })
            .collect();

        lines.join("\n").trim().to_string()
    }

    /// Check whether markdown is already normalized.
    pub fn validate(&self, markdown: &str) -> bool {
        self.clean(markdown) == markdown
    }

    /// Metadata header placed above a page of a multi-page document.
    pub fn page_header(&self, page: u32, total: u32) -> String {
        format!("---\nPage: {}\nPages: {}\n---\n\n", page, total)
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}
