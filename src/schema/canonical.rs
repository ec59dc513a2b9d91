//! Canonical schema tree and normalization of caller schemas.
//!
//! Callers describe the shape they want either in the compact shorthand
//! (`{"name": "string", "items": [{"sku": "string"}]}`) or in a
//! JSON-Schema-like form built from `type`, `properties` and `items`. Both
//! are folded into one [`CanonicalSchema`] tree here; nothing downstream
//! looks at the raw input again.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Type tag of a schema leaf.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// Any string
    String,
    /// Any number
    Number,
    /// A whole number
    Integer,
    /// `true` or `false`
    Boolean,
    /// A `YYYY-MM-DD` string
    Date,
    /// An ISO-8601 timestamp string
    Datetime,
    /// Any object, fields unchecked
    Object,
    /// Any array, items unchecked
    Array,
    /// A tag this crate does not know; no value satisfies it
    Other(String),
}

impl TypeTag {
    /// Parse a tag name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "string" => TypeTag::String,
            "number" => TypeTag::Number,
            "integer" => TypeTag::Integer,
            "boolean" => TypeTag::Boolean,
            "date" => TypeTag::Date,
            "datetime" => TypeTag::Datetime,
            "object" => TypeTag::Object,
            "array" => TypeTag::Array,
            other => TypeTag::Other(other.to_string()),
        }
    }

    /// Get the tag name.
    pub fn as_str(&self) -> &str {
        match self {
            TypeTag::String => "string",
            TypeTag::Number => "number",
            TypeTag::Integer => "integer",
            TypeTag::Boolean => "boolean",
            TypeTag::Date => "date",
            TypeTag::Datetime => "datetime",
            TypeTag::Object => "object",
            TypeTag::Array => "array",
            TypeTag::Other(name) => name,
        }
    }

    /// Check whether a present (non-null) value satisfies this tag.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            TypeTag::String => value.is_string(),
            TypeTag::Number => value.is_number(),
            TypeTag::Integer => is_whole_number(value),
            TypeTag::Boolean => value.is_boolean(),
            TypeTag::Date => value.as_str().is_some_and(is_valid_date),
            TypeTag::Datetime => value.as_str().is_some_and(is_valid_datetime),
            TypeTag::Object => value.is_object(),
            TypeTag::Array => value.is_array(),
            TypeTag::Other(_) => false,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Integers only; a JSON float such as `30.0` is a number, not an integer.
fn is_whole_number(value: &Value) -> bool {
    matches!(value, Value::Number(n) if n.is_i64() || n.is_u64())
}

/// Check a `YYYY-MM-DD` date.
pub fn is_valid_date(s: &str) -> bool {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

/// Check an ISO-8601 date or timestamp, reading `Z` as `+00:00`.
pub fn is_valid_datetime(s: &str) -> bool {
    const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%:z"];
    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];

    let s = s.trim().replace('Z', "+00:00");

    DateTime::parse_from_rfc3339(&s).is_ok()
        || OFFSET_FORMATS
            .iter()
            .any(|f| DateTime::parse_from_str(&s, f).is_ok())
        || NAIVE_FORMATS
            .iter()
            .any(|f| NaiveDateTime::parse_from_str(&s, f).is_ok())
        || is_valid_date(&s)
}

/// Normalized extraction schema.
#[derive(Debug, Clone, PartialEq)]
pub enum CanonicalSchema {
    /// A typed scalar
    Leaf(TypeTag),
    /// Named fields in declaration order
    Object(Vec<(String, CanonicalSchema)>),
    /// A homogeneous list
    Array(Box<CanonicalSchema>),
}

impl CanonicalSchema {
    /// Normalize a parsed schema value.
    ///
    /// A mapping with an object-valued `properties` key is read as
    /// JSON-Schema and folded; anything else is read as shorthand.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) if has_properties(map) => fold_definition(value),
            Value::Object(map) => CanonicalSchema::Object(
                map.iter()
                    .map(|(name, field)| (name.clone(), Self::from_value(field)))
                    .collect(),
            ),
            Value::Array(items) => match items.first() {
                Some(item) => CanonicalSchema::Array(Box::new(Self::from_value(item))),
                None => CanonicalSchema::Leaf(TypeTag::Array),
            },
            Value::String(tag) => CanonicalSchema::Leaf(TypeTag::from_name(tag)),
            other => CanonicalSchema::Leaf(TypeTag::Other(other.to_string())),
        }
    }

    /// Parse and normalize a schema given as JSON text.
    ///
    /// Text that is not JSON is the one input rejected here.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| Error::MalformedSchema(e.to_string()))?;
        Ok(Self::from_value(&value))
    }

    /// Shorthand representation of this schema.
    pub fn to_value(&self) -> Value {
        match self {
            CanonicalSchema::Leaf(tag) => Value::String(tag.as_str().to_string()),
            CanonicalSchema::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(name, field)| (name.clone(), field.to_value()))
                    .collect(),
            ),
            CanonicalSchema::Array(item) => Value::Array(vec![item.to_value()]),
        }
    }

    /// Field of an object schema by name.
    pub fn field(&self, name: &str) -> Option<&CanonicalSchema> {
        match self {
            CanonicalSchema::Object(fields) => {
                fields.iter().find(|(n, _)| n == name).map(|(_, s)| s)
            }
            _ => None,
        }
    }

    /// Number of leaves, counting each array as one.
    pub fn leaf_count(&self) -> usize {
        match self {
            CanonicalSchema::Leaf(_) | CanonicalSchema::Array(_) => 1,
            CanonicalSchema::Object(fields) => fields.iter().map(|(_, s)| s.leaf_count()).sum(),
        }
    }
}

fn has_properties(map: &Map<String, Value>) -> bool {
    map.get("properties").is_some_and(Value::is_object)
}

/// `type` of a JSON-Schema definition; a list of types collapses to its first entry.
fn type_name(map: &Map<String, Value>) -> Option<&str> {
    match map.get("type")? {
        Value::String(name) => Some(name.as_str()),
        Value::Array(names) => Some(names.first().and_then(Value::as_str).unwrap_or("string")),
        _ => None,
    }
}

fn fold_definition(definition: &Value) -> CanonicalSchema {
    let Value::Object(map) = definition else {
        return CanonicalSchema::from_value(definition);
    };

    match type_name(map) {
        Some("array") => match map.get("items") {
            Some(items) => CanonicalSchema::Array(Box::new(fold_definition(items))),
            None => CanonicalSchema::Leaf(TypeTag::Array),
        },
        Some("object") if has_properties(map) => fold_properties(map),
        None if has_properties(map) => fold_properties(map),
        Some(name) => CanonicalSchema::Leaf(TypeTag::from_name(name)),
        None => CanonicalSchema::from_value(definition),
    }
}

fn fold_properties(map: &Map<String, Value>) -> CanonicalSchema {
    let fields = map
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| {
            props
                .iter()
                .filter(|(name, definition)| {
                    let typed = is_typed_definition(definition);
                    if !typed {
                        log::debug!("Dropping untyped schema property '{}'", name);
                    }
                    typed
                })
                .map(|(name, definition)| (name.clone(), fold_definition(definition)))
                .collect()
        })
        .unwrap_or_default();

    CanonicalSchema::Object(fields)
}

/// A property definition mapping needs `type` or `properties`; non-mapping
/// definitions are shorthand and always kept.
fn is_typed_definition(definition: &Value) -> bool {
    match definition {
        Value::Object(map) => map.contains_key("type") || has_properties(map),
        _ => true,
    }
}

impl Serialize for CanonicalSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            CanonicalSchema::Leaf(tag) => serializer.serialize_str(tag.as_str()),
            CanonicalSchema::Object(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (name, field) in fields {
                    map.serialize_entry(name, field)?;
                }
                map.end()
            }
            CanonicalSchema::Array(item) => {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element(item.as_ref())?;
                seq.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for CanonicalSchema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Value::deserialize(deserializer).map(|value| CanonicalSchema::from_value(&value))
    }
}
