//! Extraction and refinement options.

use std::time::Duration;

/// Default time budget for one model call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(90);

/// Options for schema-driven extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// Time budget for the model call
    pub timeout: Duration,

    /// MIME type sent with the page image
    pub mime_type: String,

    /// Weight of the evidence cross-check in the final score
    pub evidence_weight: f64,

    /// Penalty per invalid field ratio
    pub invalid_penalty: f64,

    /// Penalty per missing field ratio
    pub missing_penalty: f64,

    /// Penalty per extra field ratio
    pub extra_penalty: f64,

    /// Upper bound of the extra field ratio before weighting
    pub extra_cap: f64,
}

impl ExtractOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the model call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the image MIME type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    /// Set the evidence weight.
    pub fn with_evidence_weight(mut self, weight: f64) -> Self {
        self.evidence_weight = weight;
        self
    }

    /// Set the penalty weights (invalid, missing, extra).
    pub fn with_penalties(mut self, invalid: f64, missing: f64, extra: f64) -> Self {
        self.invalid_penalty = invalid;
        self.missing_penalty = missing;
        self.extra_penalty = extra;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            mime_type: "image/png".to_string(),
            evidence_weight: 0.2,
            invalid_penalty: 0.3,
            missing_penalty: 0.2,
            extra_penalty: 0.1,
            extra_cap: 0.2,
        }
    }
}

/// Options for markdown refinement.
#[derive(Debug, Clone, PartialEq)]
pub struct RefineOptions {
    /// Whether refinement runs at all
    pub enabled: bool,

    /// Largest source file accepted, in megabytes
    pub max_file_size_mb: u64,

    /// Largest page count accepted
    pub max_pages: u32,

    /// Time budget for the model call
    pub timeout: Duration,

    /// MIME type sent with the page image
    pub mime_type: String,
}

impl RefineOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable refinement.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the size and page limits.
    pub fn with_limits(mut self, max_file_size_mb: u64, max_pages: u32) -> Self {
        self.max_file_size_mb = max_file_size_mb;
        self.max_pages = max_pages;
        self
    }

    /// Set the model call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Largest source file accepted, in bytes.
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb * 1024 * 1024
    }
}

impl Default for RefineOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            max_file_size_mb: 5,
            max_pages: 5,
            timeout: DEFAULT_TIMEOUT,
            mime_type: "image/png".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_defaults() {
        let options = ExtractOptions::default();
        assert_eq!(options.timeout, Duration::from_secs(90));
        assert_eq!(options.mime_type, "image/png");
        assert_eq!(options.invalid_penalty, 0.3);
        assert_eq!(options.extra_cap, 0.2);
    }

    #[test]
    fn test_refine_limits() {
        let options = RefineOptions::new().with_limits(2, 3);
        assert_eq!(options.max_file_size_bytes(), 2 * 1024 * 1024);
        assert_eq!(options.max_pages, 3);
    }
}
