//! One-shot speech capture.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use aidline_core::config::VoiceConfig;

use crate::error::VoiceError;

/// Platform speech-to-text engine.
pub trait SpeechCapture: Send + Sync {
    fn is_available(&self) -> bool;

    /// Capture until the first final result and return its transcript.
    fn recognize(&self, language: &str) -> impl Future<Output = Result<String, VoiceError>> + Send;
}

/// Runs one capture at a time. `listen` takes `&mut self`, so two captures
/// on the same listener cannot overlap.
///
/// A missing recognizer is detected on the first `listen` and remembered;
/// later calls fail fast without probing or logging again.
#[derive(Debug)]
pub struct Listener<C> {
    capture: C,
    language: String,
    unsupported: bool,
}

impl<C: SpeechCapture> Listener<C> {
    pub fn new(capture: C, config: &VoiceConfig) -> Self {
        Self {
            capture,
            language: config.language.clone(),
            unsupported: false,
        }
    }

    pub fn capture(&self) -> &C {
        &self.capture
    }

    /// True once a `listen` call found no recognizer.
    pub fn is_unsupported(&self) -> bool {
        self.unsupported
    }

    /// Capture one utterance.
    ///
    /// `Err(Unsupported)` up front when there is no recognizer. A capture
    /// error or an empty transcript yields `Ok(None)`: back to idle with
    /// nothing to submit.
    pub async fn listen(&mut self) -> Result<Option<String>, VoiceError> {
        if self.unsupported {
            return Err(VoiceError::Unsupported("speech recognition".to_string()));
        }
        if !self.capture.is_available() {
            tracing::warn!("Speech recognition unavailable");
            self.unsupported = true;
            return Err(VoiceError::Unsupported("speech recognition".to_string()));
        }

        tracing::debug!(language = %self.language, "Listening");
        match self.capture.recognize(&self.language).await {
            Ok(text) => {
                let text = text.trim();
                if text.is_empty() {
                    tracing::debug!("Capture ended without speech");
                    Ok(None)
                } else {
                    tracing::info!(text_len = text.len(), "Speech recognized");
                    Ok(Some(text.to_string()))
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Speech capture failed");
                Ok(None)
            }
        }
    }
}

/// Mock recognizer for testing.
#[derive(Debug, Clone)]
pub struct MockCapture {
    pub available: bool,
    pub result: Result<String, VoiceError>,
    /// `is_available` calls, shared across clones.
    pub availability_checks: Arc<AtomicUsize>,
}

impl MockCapture {
    pub fn hearing(text: &str) -> Self {
        Self {
            available: true,
            result: Ok(text.to_string()),
            availability_checks: Arc::default(),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            available: true,
            result: Err(VoiceError::Capture(reason.to_string())),
            availability_checks: Arc::default(),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            result: Ok(String::new()),
            availability_checks: Arc::default(),
        }
    }
}

impl SpeechCapture for MockCapture {
    fn is_available(&self) -> bool {
        self.availability_checks.fetch_add(1, Ordering::SeqCst);
        self.available
    }

    async fn recognize(&self, _language: &str) -> Result<String, VoiceError> {
        self.result.clone()
    }
}
