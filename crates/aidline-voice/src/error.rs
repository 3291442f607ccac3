//! Error types for speech playback and capture.

/// Errors from the voice subsystem.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VoiceError {
    /// The runtime has no such capability. Reported once, never retried.
    #[error("{0} is not supported in this environment")]
    Unsupported(String),
    #[error("playback error: {0}")]
    Playback(String),
    #[error("capture error: {0}")]
    Capture(String),
}
