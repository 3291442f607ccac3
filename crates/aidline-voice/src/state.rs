//! Playback phase and its transition rules.
//!
//! - any -> Speaking(m)       (play; preempts)
//! - Speaking(m) -> Paused(m) (pause)
//! - Paused(m) -> Speaking(m) (resume)
//! - any -> Idle              (stop, completion, playback error)

use std::fmt;

use uuid::Uuid;

/// Where playback stands, and which message it is bound to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum VoicePhase {
    #[default]
    Idle,
    Speaking(Uuid),
    Paused(Uuid),
}

impl fmt::Display for VoicePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoicePhase::Idle => write!(f, "Idle"),
            VoicePhase::Speaking(id) => write!(f, "Speaking({})", id),
            VoicePhase::Paused(id) => write!(f, "Paused({})", id),
        }
    }
}

impl VoicePhase {
    /// The message currently bound to audio, if any.
    pub fn message_id(&self) -> Option<Uuid> {
        match self {
            VoicePhase::Idle => None,
            VoicePhase::Speaking(id) | VoicePhase::Paused(id) => Some(*id),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, VoicePhase::Idle)
    }

    /// Play is accepted from every phase.
    pub fn on_play(self, message_id: Uuid) -> VoicePhase {
        VoicePhase::Speaking(message_id)
    }

    /// `None` unless currently speaking.
    pub fn on_pause(self) -> Option<VoicePhase> {
        match self {
            VoicePhase::Speaking(id) => Some(VoicePhase::Paused(id)),
            _ => None,
        }
    }

    /// `None` unless currently paused.
    pub fn on_resume(self) -> Option<VoicePhase> {
        match self {
            VoicePhase::Paused(id) => Some(VoicePhase::Speaking(id)),
            _ => None,
        }
    }

    /// Stop, natural completion, and playback failure all unbind.
    pub fn on_end(self) -> VoicePhase {
        VoicePhase::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let id = Uuid::nil();
        assert_eq!(VoicePhase::Idle.to_string(), "Idle");
        assert_eq!(
            VoicePhase::Speaking(id).to_string(),
            "Speaking(00000000-0000-0000-0000-000000000000)"
        );
    }

    #[test]
    fn test_play_from_any_phase() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(VoicePhase::Idle.on_play(a), VoicePhase::Speaking(a));
        assert_eq!(VoicePhase::Speaking(a).on_play(b), VoicePhase::Speaking(b));
        assert_eq!(VoicePhase::Paused(a).on_play(b), VoicePhase::Speaking(b));
    }

    #[test]
    fn test_pause_only_from_speaking() {
        let a = Uuid::new_v4();
        assert_eq!(VoicePhase::Speaking(a).on_pause(), Some(VoicePhase::Paused(a)));
        assert_eq!(VoicePhase::Idle.on_pause(), None);
        assert_eq!(VoicePhase::Paused(a).on_pause(), None);
    }

    #[test]
    fn test_resume_only_from_paused() {
        let a = Uuid::new_v4();
        assert_eq!(VoicePhase::Paused(a).on_resume(), Some(VoicePhase::Speaking(a)));
        assert_eq!(VoicePhase::Idle.on_resume(), None);
        assert_eq!(VoicePhase::Speaking(a).on_resume(), None);
    }

    #[test]
    fn test_end_always_idle() {
        let a = Uuid::new_v4();
        assert_eq!(VoicePhase::Speaking(a).on_end(), VoicePhase::Idle);
        assert_eq!(VoicePhase::Paused(a).on_end(), VoicePhase::Idle);
        assert_eq!(VoicePhase::Idle.on_end(), VoicePhase::Idle);
    }

    #[test]
    fn test_message_id() {
        let a = Uuid::new_v4();
        assert_eq!(VoicePhase::Idle.message_id(), None);
        assert_eq!(VoicePhase::Paused(a).message_id(), Some(a));
        assert!(VoicePhase::default().is_idle());
    }
}
