//! Defensive decoding of raw model answers.

use regex::Regex;
use serde_json::Value;

/// Pulls a JSON value out of free-form model output.
pub struct ResponseParser {
    json_fence: Regex,
    open_fence: Regex,
    close_fence: Regex,
}

impl ResponseParser {
    /// Create a new parser.
    pub fn new() -> Self {
        Self {
            json_fence: Regex::new(r"(?s)```json\s*(.*?)\s*```").unwrap(),
            open_fence: Regex::new(r"^```\w*\s*").unwrap(),
            close_fence: Regex::new(r"```$").unwrap(),
        }
    }

    /// Strip code fences around the answer.
    pub fn strip_fences<'a>(&self, response: &'a str) -> String {
        let mut text: &'a str = response.trim();

        if let Some(inner) = self.json_fence.captures(text).and_then(|c| c.get(1)) {
            text = inner.as_str();
        }

        let text = text.trim();
        if text.starts_with("```") {
            let opened = self.open_fence.replace(text, "");
            self.close_fence.replace(&opened, "").into_owned()
        } else {
            text.to_string()
        }
    }

    /// Parse the answer, or `None` when no JSON can be recovered.
    ///
    /// After a failed direct parse, each line starting with `{` is tried as
    /// the start of the document, top to bottom.
    pub fn parse(&self, response: &str) -> Option<Value> {
        let text = self.strip_fences(response);

        if let Ok(value) = serde_json::from_str(&text) {
            return Some(value);
        }

        let lines: Vec<&str> = text.split('\n').collect();
        lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.trim_start().starts_with('{'))
            .find_map(|(i, _)| serde_json::from_str(&lines[i..].join("\n")).ok())
    }
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip a markdown code fence the model wrapped around refined output.
pub fn strip_markdown_fence(response: &str) -> String {
    let mut cleaned = response.trim();

    if let Some(rest) = cleaned.strip_prefix("```markdown") {
        cleaned = rest.trim();
    }
    if let Some(rest) = cleaned.strip_prefix("```") {
        cleaned = rest.trim();
    }
    if let Some(rest) = cleaned.strip_suffix("```") {
        cleaned = rest.trim();
    }

    cleaned.to_string()
}
