//! Markdown refinement through a vision model.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::model::{call_with_timeout, VisionModel, VisionRequest};
use super::prompt::refinement_prompt;
use super::response::strip_markdown_fence;
use super::RefineOptions;

/// Producer of the final markdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkdownSource {
    /// Synthesized from the OCR block graph
    Ocr,
    /// Corrected by the vision model
    Model,
}

/// Result of a refinement attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinementOutcome {
    /// Markdown to use
    pub markdown: String,

    /// Which stage produced `markdown`
    pub source: MarkdownSource,

    /// Whether refinement was not attempted
    pub skipped: bool,

    /// Why the OCR markdown was kept
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl RefinementOutcome {
    fn keep(markdown: &str, skipped: bool, reason: impl Into<String>) -> Self {
        Self {
            markdown: markdown.to_string(),
            source: MarkdownSource::Ocr,
            skipped,
            reason: Some(reason.into()),
        }
    }
}

/// Asks a vision model to fix OCR errors in synthesized markdown.
pub struct RefinementEngine {
    model: Arc<dyn VisionModel>,
    options: RefineOptions,
}

impl RefinementEngine {
    /// Create an engine with default options.
    pub fn new(model: Arc<dyn VisionModel>) -> Self {
        Self::with_options(model, RefineOptions::default())
    }

    /// Create an engine with custom options.
    pub fn with_options(model: Arc<dyn VisionModel>, options: RefineOptions) -> Self {
        Self { model, options }
    }

    /// Check whether a document qualifies for refinement.
    pub fn is_eligible(&self, file_size_bytes: u64, page_count: u32) -> bool {
        self.options.enabled
            && file_size_bytes <= self.options.max_file_size_bytes()
            && page_count <= self.options.max_pages
    }

    /// Refine `markdown` against the page image.
    ///
    /// Ineligible documents and any model failure keep the OCR markdown.
    pub fn refine(
        &self,
        markdown: &str,
        image: &[u8],
        file_size_bytes: u64,
        page_count: u32,
    ) -> RefinementOutcome {
        if !self.is_eligible(file_size_bytes, page_count) {
            return RefinementOutcome::keep(markdown, true, "Document not eligible for refinement");
        }

        let request = VisionRequest::new(
            refinement_prompt(markdown),
            image,
            self.options.mime_type.as_str(),
        );

        match call_with_timeout(Arc::clone(&self.model), request, self.options.timeout) {
            Ok(response) => {
                let refined = strip_markdown_fence(&response);
                if refined.is_empty() {
                    return RefinementOutcome::keep(markdown, false, "Model returned empty markdown");
                }
                RefinementOutcome {
                    markdown: refined,
                    source: MarkdownSource::Model,
                    skipped: false,
                    reason: None,
                }
            }
            Err(err) => {
                log::warn!("Refinement failed, keeping OCR markdown: {}", err);
                RefinementOutcome::keep(markdown, false, err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};

    struct Fixer;

    impl VisionModel for Fixer {
        fn name(&self) -> &str {
            "fixer"
        }

        fn generate(&self, request: &VisionRequest) -> Result<String> {
            assert!(request.prompt.contains("# Invo1ce"));
            Ok("```markdown\n# Invoice\n```".into())
        }
    }

    struct Broken;

    impl VisionModel for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn generate(&self, _request: &VisionRequest) -> Result<String> {
            Err(Error::Model("unavailable".into()))
        }
    }

    #[test]
    fn test_refines_markdown() {
        let engine = RefinementEngine::new(Arc::new(Fixer));
        let outcome = engine.refine("# Invo1ce", b"img", 1024, 1);

        assert_eq!(outcome.markdown, "# Invoice");
        assert_eq!(outcome.source, MarkdownSource::Model);
        assert!(outcome.reason.is_none());
    }

    #[test]
    fn test_failure_keeps_original() {
        let engine = RefinementEngine::new(Arc::new(Broken));
        let outcome = engine.refine("# Invo1ce", b"img", 1024, 1);

        assert_eq!(outcome.markdown, "# Invo1ce");
        assert_eq!(outcome.source, MarkdownSource::Ocr);
        assert!(!outcome.skipped);
    }

    #[test]
    fn test_ineligible_is_skipped() {
        let engine = RefinementEngine::with_options(Arc::new(Fixer), RefineOptions::new().with_limits(1, 5));

        let outcome = engine.refine("# Invo1ce", b"img", 2 * 1024 * 1024, 1);
        assert!(outcome.skipped);
        assert_eq!(outcome.source, MarkdownSource::Ocr);

        assert!(!engine.is_eligible(10, 6));
        let disabled =
            RefinementEngine::with_options(Arc::new(Fixer), RefineOptions::new().with_enabled(false));
        assert!(!disabled.is_eligible(10, 1));
    }
}
