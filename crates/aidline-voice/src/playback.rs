//! Speech playback primitive abstraction.

use std::fmt;

use uuid::Uuid;

use crate::error::VoiceError;

/// Identifies one call to [`SpeechPlayback::speak`].
///
/// Completion callbacks carry it so the session can tell a finished
/// utterance apart from one it already preempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UtteranceId(pub u64);

impl fmt::Display for UtteranceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "utt-{}", self.0)
    }
}

/// Text plus voice parameters handed to the playback primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub id: UtteranceId,
    pub message_id: Uuid,
    pub text: String,
    pub language: String,
    pub rate: f32,
    pub pitch: f32,
}

/// How an utterance stopped on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEnd {
    Completed,
    Failed(String),
}

/// Platform text-to-speech engine.
///
/// `speak` starts audio and returns immediately; the owner reports the end
/// of audio back through [`crate::VoiceSession::playback_ended`].
pub trait SpeechPlayback: Send {
    fn is_available(&self) -> bool;
    fn speak(&mut self, utterance: &Utterance) -> Result<(), VoiceError>;
    fn pause(&mut self);
    fn resume(&mut self);
    /// Drop the current utterance, if any. Must be safe to call when silent.
    fn cancel(&mut self);
}

/// Playback for environments without speech synthesis, such as a plain
/// terminal. Every `play` on a session over it reports `Unsupported`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailablePlayback;

impl SpeechPlayback for UnavailablePlayback {
    fn is_available(&self) -> bool {
        false
    }

    fn speak(&mut self, _utterance: &Utterance) -> Result<(), VoiceError> {
        Err(VoiceError::Unsupported("speech synthesis".to_string()))
    }

    fn pause(&mut self) {}

    fn resume(&mut self) {}

    fn cancel(&mut self) {}
}

/// One recorded interaction with [`MockPlayback`].
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackCall {
    Speak(UtteranceId, String),
    Pause,
    Resume,
    Cancel,
}

/// Mock playback for testing. Records every call in order.
#[derive(Debug, Clone)]
pub struct MockPlayback {
    pub available: bool,
    /// When set, the next `speak` fails with this message.
    pub fail_next: Option<String>,
    pub calls: Vec<PlaybackCall>,
}

impl Default for MockPlayback {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPlayback {
    pub fn new() -> Self {
        Self {
            available: true,
            fail_next: None,
            calls: Vec::new(),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// Number of `speak` calls that reached the engine.
    pub fn spoken(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, PlaybackCall::Speak(..)))
            .count()
    }
}

impl SpeechPlayback for MockPlayback {
    fn is_available(&self) -> bool {
        self.available
    }

    fn speak(&mut self, utterance: &Utterance) -> Result<(), VoiceError> {
        if let Some(reason) = self.fail_next.take() {
            return Err(VoiceError::Playback(reason));
        }
        self.calls
            .push(PlaybackCall::Speak(utterance.id, utterance.text.clone()));
        Ok(())
    }

    fn pause(&mut self) {
        self.calls.push(PlaybackCall::Pause);
    }

    fn resume(&mut self) {
        self.calls.push(PlaybackCall::Resume);
    }

    fn cancel(&mut self) {
        self.calls.push(PlaybackCall::Cancel);
    }
}
