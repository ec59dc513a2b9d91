//! Recursive validation of extracted data against a canonical schema.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{CanonicalSchema, TypeTag};

/// Longest sample kept in a [`TypeError`], in characters.
pub const SAMPLE_MAX_CHARS: usize = 50;

/// A leaf whose value has the wrong type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeError {
    /// Location, e.g. `root.items[0].qty`
    pub path: String,
    /// Tag the schema asked for
    pub expected_type: String,
    /// JSON kind of the value found
    pub actual_type: String,
    /// Raw value, truncated
    pub sample_value: String,
}

/// A non-fatal validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    /// Leaf or array absent or null
    MissingValue { path: String },
    /// Leaf value of the wrong type
    TypeMismatch {
        path: String,
        expected: String,
        actual: String,
    },
    /// Object or array expected, something else found
    ShapeMismatch {
        path: String,
        expected: String,
        actual: String,
    },
    /// Key present in data but not in schema
    HallucinatedField { path: String },
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::MissingValue { path } => write!(f, "Missing value at {}", path),
            Finding::TypeMismatch {
                path,
                expected,
                actual,
            } => write!(f, "Type mismatch at {}: expected {}, got {}", path, expected, actual),
            Finding::ShapeMismatch {
                path,
                expected,
                actual,
            } => write!(f, "Expected {} at {}, got {}", expected, path, actual),
            Finding::HallucinatedField { path } => {
                write!(f, "Extra field at {} (possible hallucination)", path)
            }
        }
    }
}

/// Counters accumulated by one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationStats {
    /// Leaves and containers checked
    pub total_fields: usize,
    /// Checks that passed
    pub valid_fields: usize,
    /// Checks that failed on type or shape
    pub invalid_fields: usize,
    /// Absent or null leaves and arrays
    pub missing_fields: usize,
    /// Data keys the schema does not declare
    pub extra_fields: usize,
    /// Details of leaf type mismatches
    pub type_errors: Vec<TypeError>,
    /// Every finding in walk order
    pub findings: Vec<Finding>,
}

impl ValidationStats {
    /// Create empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether the data matched the schema exactly.
    pub fn is_clean(&self) -> bool {
        self.invalid_fields == 0 && self.missing_fields == 0 && self.extra_fields == 0
    }
}

/// Validate `data` against `schema`, starting at path `root`.
pub fn validate(data: &Value, schema: &CanonicalSchema) -> ValidationStats {
    let mut stats = ValidationStats::new();
    walk(Some(data), schema, "root", &mut stats);
    stats
}

fn walk(data: Option<&Value>, schema: &CanonicalSchema, path: &str, stats: &mut ValidationStats) {
    let present = data.filter(|v| !v.is_null());

    match schema {
        CanonicalSchema::Leaf(tag) => {
            stats.total_fields += 1;
            match present {
                None => missing(path, stats),
                Some(value) if tag.matches(value) => stats.valid_fields += 1,
                Some(value) => type_mismatch(path, tag, value, stats),
            }
        }
        CanonicalSchema::Object(fields) => {
            let Some(map) = data.and_then(Value::as_object) else {
                stats.total_fields += 1;
                stats.invalid_fields += 1;
                stats.findings.push(Finding::ShapeMismatch {
                    path: path.to_string(),
                    expected: "object".into(),
                    actual: json_kind(data.unwrap_or(&Value::Null)).into(),
                });
                return;
            };

            for key in map.keys() {
                if !fields.iter().any(|(name, _)| name == key) {
                    stats.extra_fields += 1;
                    stats.findings.push(Finding::HallucinatedField {
                        path: format!("{}.{}", path, key),
                    });
                }
            }

            for (name, field) in fields {
                walk(map.get(name), field, &format!("{}.{}", path, name), stats);
            }
        }
        CanonicalSchema::Array(item) => {
            stats.total_fields += 1;
            match present {
                None => missing(path, stats),
                Some(Value::Array(elements)) => {
                    stats.valid_fields += 1;
                    for (i, element) in elements.iter().enumerate() {
                        walk(Some(element), item, &format!("{}[{}]", path, i), stats);
                    }
                }
                Some(other) => {
                    stats.invalid_fields += 1;
                    stats.findings.push(Finding::ShapeMismatch {
                        path: path.to_string(),
                        expected: "array".into(),
                        actual: json_kind(other).into(),
                    });
                }
            }
        }
    }
}

fn missing(path: &str, stats: &mut ValidationStats) {
    stats.missing_fields += 1;
    stats.findings.push(Finding::MissingValue {
        path: path.to_string(),
    });
}

fn type_mismatch(path: &str, tag: &TypeTag, value: &Value, stats: &mut ValidationStats) {
    let actual = json_kind(value);
    stats.invalid_fields += 1;
    stats.type_errors.push(TypeError {
        path: path.to_string(),
        expected_type: tag.to_string(),
        actual_type: actual.to_string(),
        sample_value: sample(value),
    });
    stats.findings.push(Finding::TypeMismatch {
        path: path.to_string(),
        expected: tag.to_string(),
        actual: actual.to_string(),
    });
}

/// JSON kind name of a value.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Raw text of a value, truncated to [`SAMPLE_MAX_CHARS`].
pub fn sample(value: &Value) -> String {
    let raw = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    raw.chars().take(SAMPLE_MAX_CHARS).collect()
}

/// Flatten a schema into `(path, type)` pairs.
///
/// Object fields join with `.`; an array records `array` at its own path and
/// its item schema under `path[]`.
pub fn field_types(schema: &CanonicalSchema) -> Vec<(String, String)> {
    let mut types = Vec::new();
    collect_types(schema, "", &mut types);
    types
}

fn collect_types(schema: &CanonicalSchema, path: &str, types: &mut Vec<(String, String)>) {
    match schema {
        CanonicalSchema::Leaf(tag) => types.push((path.to_string(), tag.to_string())),
        CanonicalSchema::Object(fields) => {
            for (name, field) in fields {
                let child = if path.is_empty() {
                    name.clone()
                } else {
                    format!("{}.{}", path, name)
                };
                collect_types(field, &child, types);
            }
        }
        CanonicalSchema::Array(item) => {
            types.push((path.to_string(), "array".to_string()));
            collect_types(item, &format!("{}[]", path), types);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema(value: Value) -> CanonicalSchema {
        CanonicalSchema::from_value(&value)
    }

    #[test]
    fn test_exact_match_is_clean() {
        let s = schema(json!({
            "name": "string",
            "age": "integer",
            "born": "date",
            "items": [{"sku": "string", "price": "number"}]
        }));
        let data = json!({
            "name": "Ana",
            "age": 30,
            "born": "1994-05-01",
            "items": [{"sku": "A1", "price": 9.5}, {"sku": "B2", "price": 3}]
        });

        let stats = validate(&data, &s);
        assert!(stats.is_clean());
        assert_eq!(stats.valid_fields, stats.total_fields);
        assert_eq!(stats.total_fields, 8);
    }

    #[test]
    fn test_type_error_on_integer() {
        let s = schema(json!({"name": "string", "age": "integer"}));
        let stats = validate(&json!({"name": "Ana", "age": "thirty"}), &s);

        assert_eq!(stats.valid_fields, 1);
        assert_eq!(stats.invalid_fields, 1);
        assert_eq!(stats.missing_fields, 0);
        assert_eq!(stats.extra_fields, 0);
        assert_eq!(
            stats.type_errors,
            vec![TypeError {
                path: "root.age".into(),
                expected_type: "integer".into(),
                actual_type: "string".into(),
                sample_value: "thirty".into(),
            }]
        );
    }

    #[test]
    fn test_missing_and_extra() {
        let s = schema(json!({"a": "string", "b": "number", "tags": ["string"]}));
        let stats = validate(&json!({"a": null, "c": 1, "d": 2}), &s);

        assert_eq!(stats.total_fields, 3);
        assert_eq!(stats.missing_fields, 3);
        assert_eq!(stats.extra_fields, 2);
        assert!(stats
            .findings
            .contains(&Finding::HallucinatedField { path: "root.c".into() }));
    }

    #[test]
    fn test_non_object_stops_branch() {
        let s = schema(json!({"customer": {"name": "string", "city": "string"}}));
        let stats = validate(&json!({"customer": "Ana"}), &s);

        assert_eq!(stats.total_fields, 1);
        assert_eq!(stats.invalid_fields, 1);
        assert!(stats.type_errors.is_empty());
    }

    #[test]
    fn test_non_array_is_invalid() {
        let s = schema(json!({"tags": ["string"]}));
        let stats = validate(&json!({"tags": "a,b"}), &s);

        assert_eq!(stats.total_fields, 1);
        assert_eq!(stats.invalid_fields, 1);
    }

    #[test]
    fn test_array_elements_accumulate() {
        let s = schema(json!({"qty": ["integer"]}));
        let stats = validate(&json!({"qty": [1, "two", null]}), &s);

        assert_eq!(stats.total_fields, 4);
        assert_eq!(stats.valid_fields, 2);
        assert_eq!(stats.invalid_fields, 1);
        assert_eq!(stats.missing_fields, 1);
        assert_eq!(stats.type_errors[0].path, "root.qty[1]");
    }

    #[test]
    fn test_sample_is_truncated() {
        let s = schema(json!({"n": "number"}));
        let long = "x".repeat(80);
        let stats = validate(&json!({ "n": long }), &s);

        assert_eq!(stats.type_errors[0].sample_value.chars().count(), SAMPLE_MAX_CHARS);
    }

    #[test]
    fn test_finding_messages() {
        let finding = Finding::HallucinatedField {
            path: "root.x".into(),
        };
        assert_eq!(finding.to_string(), "Extra field at root.x (possible hallucination)");
    }

    #[test]
    fn test_field_types() {
        let s = schema(json!({
            "name": "string",
            "address": {"city": "string"},
            "items": [{"sku": "string"}],
            "tags": ["string"]
        }));

        let types = field_types(&s);
        let expected: Vec<(String, String)> = [
            ("name", "string"),
            ("address.city", "string"),
            ("items", "array"),
            ("items[].sku", "string"),
            ("tags", "array"),
            ("tags[]", "string"),
        ]
        .iter()
        .map(|(p, t)| (p.to_string(), t.to_string()))
        .collect();

        assert_eq!(types, expected);
    }
}
