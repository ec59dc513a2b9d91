//! Evidence-based fallback extraction.
//!
//! When the model cannot be used, the result is rebuilt from OCR form and
//! table evidence alone by matching schema field names against form keys.
//! The output always has the schema's shape.

use serde_json::{Map, Value};
use unicode_normalization::UnicodeNormalization;

use crate::model::ParsedPage;
use crate::schema::{CanonicalSchema, TypeTag};

/// Key/value pairs recovered from OCR evidence, in discovery order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvidenceValues {
    entries: Vec<(String, String)>,
}

impl EvidenceValues {
    /// Collect pairs from form fields and from table rows with at least two cells.
    ///
    /// Keys are lowercased; a repeated key keeps its first position and takes
    /// the later value.
    pub fn from_page(page: &ParsedPage) -> Self {
        let mut values = Self::default();

        for field in &page.forms {
            values.insert(&field.key, &field.value);
        }

        for table in &page.tables {
            for row in &table.rows {
                if let [key, value, ..] = row.as_slice() {
                    values.insert(&key.text, &value.text);
                }
            }
        }

        values
    }

    fn insert(&mut self, key: &str, value: &str) {
        let key = normalize_key(key);
        let value = value.trim();
        if key.is_empty() || value.is_empty() {
            return;
        }

        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((key, value.to_string())),
        }
    }

    /// Number of recovered pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether nothing was recovered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the value for a schema field name.
    ///
    /// An exact key match wins; otherwise the first key that contains the
    /// name, or is contained in it.
    pub fn find(&self, field_name: &str) -> Option<&str> {
        let name = normalize_key(&field_name.replace('_', " "));
        if name.is_empty() {
            return None;
        }

        self.entries
            .iter()
            .find(|(key, _)| *key == name)
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|(key, _)| key.contains(&name) || name.contains(key.as_str()))
            })
            .map(|(_, value)| value.as_str())
    }
}

fn normalize_key(key: &str) -> String {
    key.nfc().collect::<String>().trim().to_lowercase()
}

/// Build a schema-shaped result from evidence.
///
/// Scalar leaves become the matched evidence string or `null`, arrays
/// become empty, and objects recurse.
pub fn fallback_data(schema: &CanonicalSchema, evidence: Option<&ParsedPage>) -> Value {
    let values = evidence.map(EvidenceValues::from_page).unwrap_or_default();
    if evidence.is_some() {
        log::info!("Recovering fields from {} OCR evidence pairs", values.len());
    }
    build(schema, None, &values)
}

fn build(schema: &CanonicalSchema, name: Option<&str>, values: &EvidenceValues) -> Value {
    match schema {
        CanonicalSchema::Object(fields) => {
            let map: Map<String, Value> = fields
                .iter()
                .map(|(field, sub)| (field.clone(), build(sub, Some(field.as_str()), values)))
                .collect();
            Value::Object(map)
        }
        CanonicalSchema::Array(_) | CanonicalSchema::Leaf(TypeTag::Array) => Value::Array(Vec::new()),
        CanonicalSchema::Leaf(_) => name
            .and_then(|n| values.find(n))
            .map(|v| Value::String(v.to_string()))
            .unwrap_or(Value::Null),
    }
}
