//! Schema-driven extraction with a fallback that never fails.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::confidence::score;
use super::fallback::fallback_data;
use super::model::{call_with_timeout, ModelErrorKind, VisionModel, VisionRequest};
use super::prompt::extraction_prompt;
use super::response::ResponseParser;
use super::ExtractOptions;
use crate::error::{Error, Result};
use crate::model::ParsedPage;
use crate::schema::{validate, CanonicalSchema, ValidationStats};

/// Number of validation findings written to the log.
const LOGGED_FINDINGS: usize = 5;

/// Where the extracted data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionSource {
    /// Parsed from the model's answer
    Model,
    /// Rebuilt from OCR evidence after a failure
    Fallback,
}

/// Schema-shaped data with a confidence score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Extracted data, always shaped like the schema
    pub data: Value,

    /// Confidence in `[0, 1]`; `0.0` for fallback results
    pub confidence: f64,

    /// Origin of `data`
    pub source: ExtractionSource,

    /// Validation statistics of the model answer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<ValidationStats>,

    /// Why the fallback was used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ExtractionResult {
    /// Check whether this result came from the fallback path.
    pub fn is_fallback(&self) -> bool {
        self.source == ExtractionSource::Fallback
    }

    /// Short human-readable summary.
    pub fn message(&self) -> String {
        match self.source {
            ExtractionSource::Model => {
                format!("Data extracted with {:.1}% confidence", self.confidence * 100.0)
            }
            ExtractionSource::Fallback => "Data recovered from OCR evidence only".to_string(),
        }
    }
}

enum Outcome {
    Extracted {
        data: Value,
        confidence: f64,
        stats: ValidationStats,
    },
    Fallback {
        data: Value,
        reason: String,
    },
}

impl From<Outcome> for ExtractionResult {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Extracted {
                data,
                confidence,
                stats,
            } => ExtractionResult {
                data,
                confidence,
                source: ExtractionSource::Model,
                stats: Some(stats),
                reason: None,
            },
            Outcome::Fallback { data, reason } => ExtractionResult {
                data,
                confidence: 0.0,
                source: ExtractionSource::Fallback,
                stats: None,
                reason: Some(reason),
            },
        }
    }
}

/// Extracts schema-shaped data from a page image through a vision model.
pub struct ExtractEngine {
    model: Arc<dyn VisionModel>,
    options: ExtractOptions,
    parser: ResponseParser,
}

impl ExtractEngine {
    /// Create an engine with default options.
    pub fn new(model: Arc<dyn VisionModel>) -> Self {
        Self::with_options(model, ExtractOptions::default())
    }

    /// Create an engine with custom options.
    pub fn with_options(model: Arc<dyn VisionModel>, options: ExtractOptions) -> Self {
        Self {
            model,
            options,
            parser: ResponseParser::new(),
        }
    }

    /// Get the options.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract data for `schema` from `image`.
    ///
    /// Model errors, timeouts and unusable answers are logged and answered
    /// with a fallback result built from `evidence`; this never fails.
    pub fn extract(
        &self,
        schema: &CanonicalSchema,
        image: &[u8],
        evidence: Option<&ParsedPage>,
    ) -> ExtractionResult {
        let outcome = match self.try_extract(schema, image, evidence) {
            Ok(outcome) => outcome,
            Err(err) => {
                let kind = ModelErrorKind::classify(&err);
                log::error!("Extraction error ({}): {}", kind, err);
                Outcome::Fallback {
                    data: fallback_data(schema, evidence),
                    reason: err.to_string(),
                }
            }
        };

        outcome.into()
    }

    /// Extract with a schema given as JSON text.
    ///
    /// Fails only when the schema text is not valid JSON.
    pub fn extract_json(
        &self,
        schema: &str,
        image: &[u8],
        evidence: Option<&ParsedPage>,
    ) -> Result<ExtractionResult> {
        let schema = CanonicalSchema::from_json_str(schema)?;
        Ok(self.extract(&schema, image, evidence))
    }

    /// Extract with a schema given as an already parsed JSON value.
    pub fn extract_value(
        &self,
        schema: &Value,
        image: &[u8],
        evidence: Option<&ParsedPage>,
    ) -> ExtractionResult {
        self.extract(&CanonicalSchema::from_value(schema), image, evidence)
    }

    fn try_extract(
        &self,
        schema: &CanonicalSchema,
        image: &[u8],
        evidence: Option<&ParsedPage>,
    ) -> Result<Outcome> {
        let request = VisionRequest::new(
            extraction_prompt(schema),
            image,
            self.options.mime_type.as_str(),
        );

        log::debug!("Requesting extraction from model '{}'", self.model.name());
        let response = call_with_timeout(Arc::clone(&self.model), request, self.options.timeout)?;

        let data = self
            .parser
            .parse(&response)
            .filter(|value| !is_blank(value))
            .ok_or_else(|| Error::Model("Failed to extract valid JSON from model response".into()))?;

        let stats = validate(&data, schema);
        if !stats.findings.is_empty() {
            log::warn!("Data validation warnings: {} issues found", stats.findings.len());
            for finding in stats.findings.iter().take(LOGGED_FINDINGS) {
                log::warn!("  - {}", finding);
            }
        }

        let confidence = score(&stats, evidence, &self.options);
        Ok(Outcome::Extracted {
            data,
            confidence,
            stats,
        })
    }
}

/// A parsed answer carrying no data at all.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}
