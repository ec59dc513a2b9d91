//! Generative vision model collaborator.

use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, RecvTimeoutError};

use crate::error::{Error, Result};

/// A single prompt-plus-image request.
#[derive(Debug, Clone)]
pub struct VisionRequest {
    /// Instruction text
    pub prompt: String,
    /// Page image
    pub image: Vec<u8>,
    /// MIME type of `image`
    pub mime_type: String,
}

impl VisionRequest {
    /// Create a request.
    pub fn new(prompt: impl Into<String>, image: impl Into<Vec<u8>>, mime_type: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            image: image.into(),
            mime_type: mime_type.into(),
        }
    }
}

/// A generative model that reads an image and answers with raw text.
///
/// Implementations wrap a network client; failures are reported as
/// [`Error::Model`] and are recovered by the extraction engine.
pub trait VisionModel: Send + Sync {
    /// Model name used in logs.
    fn name(&self) -> &str;

    /// Generate a text response for the request.
    fn generate(&self, request: &VisionRequest) -> Result<String>;
}

/// Call a model on a worker thread, giving up after `timeout`.
///
/// A call that times out is abandoned; its thread finishes in the
/// background and its answer is dropped.
pub fn call_with_timeout(
    model: Arc<dyn VisionModel>,
    request: VisionRequest,
    timeout: Duration,
) -> Result<String> {
    let (tx, rx) = bounded(1);
    let name = model.name().to_string();

    thread::Builder::new()
        .name(format!("vision-{}", name))
        .spawn(move || {
            let _ = tx.send(model.generate(&request));
        })?;

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => {
            log::warn!("Model '{}' did not answer within {:?}", name, timeout);
            Err(Error::Timeout(timeout))
        }
        Err(RecvTimeoutError::Disconnected) => {
            Err(Error::Model(format!("model '{}' worker stopped without answering", name)))
        }
    }
}

/// Broad class of a collaborator failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelErrorKind {
    /// The call exceeded its time budget
    Timeout,
    /// Rate limit or quota exhausted
    Quota,
    /// Credentials missing or rejected
    Authentication,
    /// Any other provider failure
    Provider,
}

impl ModelErrorKind {
    /// Classify an error raised while calling a model.
    pub fn classify(error: &Error) -> Self {
        match error {
            Error::Timeout(_) => ModelErrorKind::Timeout,
            other => Self::from_message(&other.to_string()),
        }
    }

    /// Classify a provider error message.
    pub fn from_message(message: &str) -> Self {
        let message = message.to_lowercase();
        let has = |needles: &[&str]| needles.iter().any(|n| message.contains(n));

        if has(&["timeout", "timed out", "deadline"]) {
            ModelErrorKind::Timeout
        } else if has(&["quota", "rate limit", "resource exhausted", "429"]) {
            ModelErrorKind::Quota
        } else if has(&["api key", "unauthorized", "unauthenticated", "permission", "401", "403"]) {
            ModelErrorKind::Authentication
        } else {
            ModelErrorKind::Provider
        }
    }

    /// Message suitable for showing to an end user.
    pub fn user_message(&self) -> &'static str {
        match self {
            ModelErrorKind::Timeout => "The extraction service took too long to respond. Please try again.",
            ModelErrorKind::Quota => "The extraction service is busy or over quota. Please try again later.",
            ModelErrorKind::Authentication => "The extraction service rejected its credentials.",
            ModelErrorKind::Provider => "The extraction service failed to process the document.",
        }
    }
}

impl fmt::Display for ModelErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModelErrorKind::Timeout => "timeout",
            ModelErrorKind::Quota => "quota",
            ModelErrorKind::Authentication => "authentication",
            ModelErrorKind::Provider => "provider",
        };
        f.write_str(name)
    }
}
