//! Error types for the lanidrac library.

use std::io;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for lanidrac operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while resolving, rendering, or extracting.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A provider response or data document is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A schema supplied as a JSON literal could not be parsed.
    #[error("Malformed schema: {0}")]
    MalformedSchema(String),

    /// The generative model collaborator reported a failure.
    #[error("Model error: {0}")]
    Model(String),

    /// The generative model did not answer within the configured timeout.
    #[error("Model call timed out after {0:?}")]
    Timeout(Duration),

    /// Error during rendering (Markdown, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),
}
