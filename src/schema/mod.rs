//! Extraction schemas: normalization and validation.

mod canonical;
mod validator;

pub use canonical::{is_valid_date, is_valid_datetime, CanonicalSchema, TypeTag};
pub use validator::{
    field_types, json_kind, sample, validate, Finding, TypeError, ValidationStats,
    SAMPLE_MAX_CHARS,
};

use serde_json::Value;

/// Normalize a parsed schema value into canonical form.
pub fn normalize(raw: &Value) -> CanonicalSchema {
    CanonicalSchema::from_value(raw)
}
