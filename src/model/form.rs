//! Form field and checkbox types.

use super::BoundingBox;
use serde::{Deserialize, Serialize};

/// A key/value pair detected on a form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    /// Key text
    pub key: String,

    /// Value text (empty when the provider paired no value)
    pub value: String,

    /// Detection confidence of the key block
    pub confidence: f64,

    /// Key geometry
    pub bounding_box: BoundingBox,
}

impl FormField {
    /// Create a form field without geometry.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            ..Self::default()
        }
    }

    /// Set geometry and return self.
    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bounding_box = bbox;
        self
    }

    /// Check whether the value is blank.
    pub fn has_value(&self) -> bool {
        !self.value.trim().is_empty()
    }
}

/// A detected checkbox.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckboxEntity {
    /// Source block id
    pub id: String,

    /// Whether the box is ticked
    pub selected: bool,

    /// Detection confidence
    pub confidence: f64,

    /// Checkbox geometry
    pub bounding_box: BoundingBox,
}

impl CheckboxEntity {
    /// Create a checkbox at `(left, top)`.
    pub fn new(selected: bool, left: f64, top: f64) -> Self {
        Self {
            selected,
            bounding_box: BoundingBox::at(left, top),
            ..Self::default()
        }
    }
}
