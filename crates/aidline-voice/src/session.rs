//! Single-session speech playback keyed by message identity.
//!
//! `VoiceSession` is an owned state object: whoever drives the conversation
//! holds it and every transition is a synchronous `&mut self` call, so at
//! most one message is ever bound to audio.

use uuid::Uuid;

use aidline_core::config::VoiceConfig;

use crate::error::VoiceError;
use crate::playback::{PlaybackEnd, SpeechPlayback, Utterance, UtteranceId};
use crate::state::VoicePhase;

pub struct VoiceSession<P> {
    playback: P,
    config: VoiceConfig,
    phase: VoicePhase,
    current: Option<UtteranceId>,
    next_utterance: u64,
}

impl<P: std::fmt::Debug> std::fmt::Debug for VoiceSession<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceSession")
            .field("playback", &self.playback)
            .field("phase", &self.phase)
            .field("current", &self.current)
            .finish()
    }
}

impl<P: SpeechPlayback> VoiceSession<P> {
    pub fn new(playback: P, config: VoiceConfig) -> Self {
        Self {
            playback,
            config,
            phase: VoicePhase::Idle,
            current: None,
            next_utterance: 0,
        }
    }

    pub fn phase(&self) -> VoicePhase {
        self.phase
    }

    /// Message currently bound to audio.
    pub fn active_message(&self) -> Option<Uuid> {
        self.phase.message_id()
    }

    pub fn current_utterance(&self) -> Option<UtteranceId> {
        self.current
    }

    pub fn playback(&self) -> &P {
        &self.playback
    }

    pub fn playback_mut(&mut self) -> &mut P {
        &mut self.playback
    }

    /// Speak `text` for `message_id`, preempting anything already playing.
    ///
    /// Fails with [`VoiceError::Unsupported`] when the platform has no
    /// synthesis; a primitive failure leaves the session `Idle`.
    pub fn play(&mut self, message_id: Uuid, text: &str) -> Result<UtteranceId, VoiceError> {
        if !self.playback.is_available() {
            tracing::warn!("Speech synthesis unavailable");
            return Err(VoiceError::Unsupported("speech synthesis".to_string()));
        }

        self.playback.cancel();
        self.current = None;

        self.next_utterance += 1;
        let utterance = Utterance {
            id: UtteranceId(self.next_utterance),
            message_id,
            text: text.to_string(),
            language: self.config.language.clone(),
            rate: self.config.rate,
            pitch: self.config.pitch,
        };

        if let Err(e) = self.playback.speak(&utterance) {
            tracing::warn!(error = %e, %message_id, "Playback failed to start");
            self.phase = self.phase.on_end();
            return Err(e);
        }

        let next = self.phase.on_play(message_id);
        tracing::debug!(
            from = %self.phase,
            to = %next,
            utterance = %utterance.id,
            "Voice transition"
        );
        self.phase = next;
        self.current = Some(utterance.id);
        Ok(utterance.id)
    }

    /// Pause if speaking. Returns whether anything changed.
    pub fn pause(&mut self) -> bool {
        match self.phase.on_pause() {
            Some(next) => {
                self.playback.pause();
                tracing::debug!(from = %self.phase, to = %next, "Voice transition");
                self.phase = next;
                true
            }
            None => false,
        }
    }

    /// Resume if paused. Returns whether anything changed.
    pub fn resume(&mut self) -> bool {
        match self.phase.on_resume() {
            Some(next) => {
                self.playback.resume();
                tracing::debug!(from = %self.phase, to = %next, "Voice transition");
                self.phase = next;
                true
            }
            None => false,
        }
    }

    /// Cancel playback and unbind, from any phase.
    pub fn stop(&mut self) {
        self.playback.cancel();
        if !self.phase.is_idle() {
            tracing::debug!(from = %self.phase, to = "Idle", "Voice stopped");
        }
        self.phase = self.phase.on_end();
        self.current = None;
    }

    /// Per-message control button: pause/resume the bound message, or play
    /// a different one.
    pub fn toggle(&mut self, message_id: Uuid, text: &str) -> Result<VoicePhase, VoiceError> {
        match self.phase {
            VoicePhase::Speaking(id) if id == message_id => {
                self.pause();
            }
            VoicePhase::Paused(id) if id == message_id => {
                self.resume();
            }
            _ => {
                self.play(message_id, text)?;
            }
        }
        Ok(self.phase)
    }

    /// Completion or error callback from the primitive.
    ///
    /// Returns `false` for callbacks about an utterance that was already
    /// preempted or stopped; those never touch the current session.
    pub fn playback_ended(&mut self, utterance: UtteranceId, end: PlaybackEnd) -> bool {
        if self.current != Some(utterance) {
            tracing::debug!(%utterance, "Ignoring end of stale utterance");
            return false;
        }
        if let PlaybackEnd::Failed(ref reason) = end {
            tracing::warn!(%utterance, reason = %reason, "Playback ended with error");
        }
        tracing::debug!(from = %self.phase, to = "Idle", end = ?end, "Voice transition");
        self.phase = self.phase.on_end();
        self.current = None;
        true
    }
}

// =============================================================================
// Tests
// =============================================================================
