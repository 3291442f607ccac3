//! Aidline voice crate - per-message speech playback and one-shot capture.
//!
//! Playback is a strict single-session state machine:
//! Idle -> Speaking(message) <-> Paused(message) -> Idle. Starting playback
//! for any message preempts whatever was playing; there is no queue.
//! Capture is a separate, non-overlapping one-shot flow.

pub mod capture;
pub mod error;
pub mod playback;
pub mod session;
pub mod state;

pub use capture::{Listener, MockCapture, SpeechCapture};
pub use error::VoiceError;
pub use playback::{
    MockPlayback, PlaybackCall, PlaybackEnd, SpeechPlayback, UnavailablePlayback, Utterance,
    UtteranceId,
};
pub use session::VoiceSession;
pub use state::VoicePhase;
