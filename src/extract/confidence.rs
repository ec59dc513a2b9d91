//! Confidence scoring from validation statistics.

use super::ExtractOptions;
use crate::model::ParsedPage;
use crate::schema::ValidationStats;

/// Score validation statistics, optionally cross-checked against OCR evidence.
///
/// An empty schema walk (`total_fields == 0`) always scores `0.0`.
pub fn score(stats: &ValidationStats, evidence: Option<&ParsedPage>, options: &ExtractOptions) -> f64 {
    let base = base_score(stats, options);

    let confidence = match evidence {
        Some(page) if base > 0.0 => {
            let evidence_score = evidence_score(stats, &page.evidence_text());
            (1.0 - options.evidence_weight) * base + options.evidence_weight * evidence_score
        }
        _ => base,
    };

    confidence.min(1.0)
}

/// Accuracy minus weighted penalties, floored at zero.
pub fn base_score(stats: &ValidationStats, options: &ExtractOptions) -> f64 {
    if stats.total_fields == 0 {
        return 0.0;
    }

    let total = stats.total_fields as f64;
    let accuracy = stats.valid_fields as f64 / total;
    let penalty = options.invalid_penalty * (stats.invalid_fields as f64 / total)
        + options.missing_penalty * (stats.missing_fields as f64 / total)
        + options.extra_penalty * (stats.extra_fields as f64 / total).min(options.extra_cap);

    (accuracy - penalty).max(0.0)
}

/// Share of type errors whose raw sample appears in the evidence text.
///
/// With no type errors there is nothing to contradict and the score is `1.0`.
pub fn evidence_score(stats: &ValidationStats, evidence_text: &str) -> f64 {
    if stats.type_errors.is_empty() {
        return 1.0;
    }

    let haystack = evidence_text.to_lowercase();
    let verified = stats
        .type_errors
        .iter()
        .filter(|e| haystack.contains(&e.sample_value.to_lowercase()))
        .count();

    verified as f64 / stats.type_errors.len() as f64
}
