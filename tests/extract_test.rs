//! Integration tests for model-backed extraction and refinement.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use lanidrac::error::Result;
use lanidrac::extract::MarkdownSource;
use lanidrac::model::FormField;
use lanidrac::{
    normalize_schema, Error, ExtractEngine, ExtractOptions, ExtractionSource, ParsedPage,
    RefinementEngine, VisionModel, VisionRequest,
};
use serde_json::json;

/// Model that always returns the same answer.
struct Canned(&'static str);

impl VisionModel for Canned {
    fn name(&self) -> &str {
        "canned"
    }

    fn generate(&self, _request: &VisionRequest) -> Result<String> {
        Ok(self.0.to_string())
    }
}

/// Model that always fails.
struct Failing;

impl VisionModel for Failing {
    fn name(&self) -> &str {
        "failing"
    }

    fn generate(&self, _request: &VisionRequest) -> Result<String> {
        Err(Error::Model("429 quota exceeded".into()))
    }
}

/// Model that answers too late.
struct Slow;

impl VisionModel for Slow {
    fn name(&self) -> &str {
        "slow"
    }

    fn generate(&self, _request: &VisionRequest) -> Result<String> {
        thread::sleep(Duration::from_millis(500));
        Ok(r#"{"name": "Ana"}"#.into())
    }
}

const PERSON: &str = r#"{"name": "string", "age": "integer"}"#;

fn engine(model: impl VisionModel + 'static) -> ExtractEngine {
    ExtractEngine::new(Arc::new(model))
}

fn invoice_evidence() -> ParsedPage {
    let mut page = ParsedPage::new();
    page.forms.push(FormField::new("Invoice Number", "INV-7"));
    page.forms.push(FormField::new("Age", "thirty"));
    page
}

#[test]
fn test_exact_answer_scores_full_confidence() {
    let result = engine(Canned(r#"{"name": "Ana", "age": 30}"#))
        .extract_json(PERSON, b"image", None)
        .unwrap();

    assert_eq!(result.source, ExtractionSource::Model);
    assert_eq!(result.data, json!({"name": "Ana", "age": 30}));
    assert_eq!(result.confidence, 1.0);
    assert_eq!(result.message(), "Data extracted with 100.0% confidence");
    assert!(result.stats.unwrap().is_clean());
}

#[test]
fn test_fenced_answer() {
    let result = engine(Canned("```json\n{\"name\": \"Ana\", \"age\": 30}\n```"))
        .extract_json(PERSON, b"image", None)
        .unwrap();

    assert!(!result.is_fallback());
    assert_eq!(result.data["name"], "Ana");
}

#[test]
fn test_prose_before_json() {
    let result = engine(Canned("Here is what I found:\n{\"name\": \"Ana\",\n\"age\": 30}"))
        .extract_json(PERSON, b"image", None)
        .unwrap();

    assert!(!result.is_fallback());
    assert_eq!(result.data["age"], 30);
}

#[test]
fn test_type_error_lowers_confidence() {
    let engine = engine(Canned(r#"{"name": "Ana", "age": "thirty"}"#));

    let without = engine.extract_json(PERSON, b"image", None).unwrap();
    assert!((without.confidence - 0.35).abs() < 1e-9);

    // "thirty" is in the OCR evidence, so the mismatch is corroborated.
    let evidence = invoice_evidence();
    let with = engine.extract_json(PERSON, b"image", Some(&evidence)).unwrap();
    assert!((with.confidence - 0.48).abs() < 1e-9);

    let stats = with.stats.unwrap();
    assert_eq!(stats.valid_fields, 1);
    assert_eq!(stats.invalid_fields, 1);
    assert_eq!(stats.type_errors[0].path, "root.age");
}

#[test]
fn test_model_failure_falls_back() {
    let schema = normalize_schema(
        r#"{"invoice_number": "string", "total": "number", "items": [{"sku": "string"}]}"#,
    )
    .unwrap();
    let evidence = invoice_evidence();

    let result = engine(Failing).extract(&schema, b"image", Some(&evidence));

    assert!(result.is_fallback());
    assert_eq!(result.confidence, 0.0);
    assert_eq!(
        result.data,
        json!({"invoice_number": "INV-7", "total": null, "items": []})
    );
    assert!(result.reason.unwrap().contains("quota"));
    assert!(result.stats.is_none());
}

#[test]
fn test_timeout_falls_back() {
    let options = ExtractOptions::new().with_timeout(Duration::from_millis(20));
    let engine = ExtractEngine::with_options(Arc::new(Slow), options);

    let result = engine.extract_json(PERSON, b"image", None).unwrap();

    assert!(result.is_fallback());
    assert_eq!(result.data, json!({"name": null, "age": null}));
    assert!(result.reason.unwrap().contains("timed out"));
}

#[test]
fn test_unusable_answers_fall_back() {
    for answer in ["I cannot read this image", "{}", "null", "```json\n```"] {
        let result = engine(Canned(answer))
            .extract_json(PERSON, b"image", None)
            .unwrap();

        assert!(result.is_fallback(), "answer {:?} should fall back", answer);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.data, json!({"name": null, "age": null}));
    }
}

#[test]
fn test_empty_schema_scores_zero() {
    let result = engine(Canned(r#"{"anything": 1}"#))
        .extract_json("{}", b"image", None)
        .unwrap();

    assert_eq!(result.source, ExtractionSource::Model);
    assert_eq!(result.confidence, 0.0);
    assert_eq!(result.stats.unwrap().extra_fields, 1);
}

#[test]
fn test_malformed_schema_is_an_error() {
    let result = engine(Canned("{}")).extract_json("{not json", b"image", None);
    assert!(matches!(result, Err(Error::MalformedSchema(_))));
}

#[test]
fn test_refinement_replaces_markdown() {
    let engine = RefinementEngine::new(Arc::new(Canned("```markdown\n# Invoice\n\nTotal: 42\n```")));
    let outcome = engine.refine("# Invo1ce\n\nTota1: 42", b"image", 2048, 1);

    assert_eq!(outcome.source, MarkdownSource::Model);
    assert_eq!(outcome.markdown, "# Invoice\n\nTotal: 42");
}

#[test]
fn test_refinement_failure_keeps_ocr_markdown() {
    let engine = RefinementEngine::new(Arc::new(Failing));
    let outcome = engine.refine("# Invo1ce", b"image", 2048, 1);

    assert_eq!(outcome.source, MarkdownSource::Ocr);
    assert_eq!(outcome.markdown, "# Invo1ce");
    assert!(outcome.reason.is_some());
}
