//! Schema-driven extraction through a generative vision model.
//!
//! The model is an injected [`VisionModel`]. Its answer is parsed
//! defensively, validated against the canonical schema and scored; any
//! failure on the way yields a schema-shaped fallback built from OCR
//! evidence with confidence `0.0`.

mod confidence;
mod engine;
mod fallback;
mod model;
mod options;
mod prompt;
mod refine;
mod response;

pub use confidence::{base_score, evidence_score, score};
pub use engine::{ExtractEngine, ExtractionResult, ExtractionSource};
pub use fallback::{fallback_data, EvidenceValues};
pub use model::{call_with_timeout, ModelErrorKind, VisionModel, VisionRequest};
pub use options::{ExtractOptions, RefineOptions, DEFAULT_TIMEOUT};
pub use prompt::{extraction_prompt, refinement_prompt, REFINEMENT_INSTRUCTIONS};
pub use refine::{MarkdownSource, RefinementEngine, RefinementOutcome};
pub use response::{strip_markdown_fence, ResponseParser};
