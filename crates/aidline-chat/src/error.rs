//! Error types for the conversational core.

use uuid::Uuid;

use aidline_core::AidlineError;
use aidline_voice::VoiceError;

/// Text shown in the transcript when a turn fails in transit.
pub const CONNECTION_ERROR_REPLY: &str = "Sorry, I'm having trouble connecting to the AI service. \
Please make sure the backend server is running and try again.";

/// Errors from a conversation turn.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("cannot connect to inference service at {0}")]
    Connection(String),
    #[error("inference request timed out after {0}s")]
    Timeout(u64),
    #[error("inference service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed inference reply: {0}")]
    MalformedReply(String),
    #[error("HTTP client error: {0}")]
    Http(String),
    #[error("no assistant message with id {0}")]
    UnknownMessage(Uuid),
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Voice(#[from] VoiceError),
}

impl From<AidlineError> for ChatError {
    fn from(err: AidlineError) -> Self {
        ChatError::Config(err.to_string())
    }
}

impl ChatError {
    /// Transport-class failure: the turn is lost but the conversation is intact.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ChatError::Connection(_)
                | ChatError::Timeout(_)
                | ChatError::Status { .. }
                | ChatError::MalformedReply(_)
                | ChatError::Http(_)
        )
    }

    /// What the user is told.
    pub fn user_message(&self) -> String {
        match self {
            ChatError::EmptyMessage => "Please describe your emergency first.".to_string(),
            ChatError::MessageTooLong(max) => {
                format!("Please keep your message under {} characters.", max)
            }
            ChatError::Voice(VoiceError::Unsupported(what)) => {
                let mut s = what.clone();
                if let Some(first) = s.get_mut(0..1) {
                    first.make_ascii_uppercase();
                }
                format!("{} is not supported on this device.", s)
            }
            ChatError::Voice(_) => "Voice input failed. Please type your message.".to_string(),
            ChatError::UnknownMessage(_) => "That message can't be read aloud.".to_string(),
            ChatError::Config(_) => "The assistant is misconfigured.".to_string(),
            _ => CONNECTION_ERROR_REPLY.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_error_display() {
        assert_eq!(ChatError::EmptyMessage.to_string(), "message cannot be empty");
        assert_eq!(
            ChatError::MessageTooLong(2000).to_string(),
            "message exceeds maximum length of 2000 characters"
        );
        assert_eq!(
            ChatError::Status {
                status: 500,
                body: "boom".to_string()
            }
            .to_string(),
            "inference service returned HTTP 500: boom"
        );
        assert_eq!(
            ChatError::Timeout(60).to_string(),
            "inference request timed out after 60s"
        );
    }

    #[test]
    fn test_voice_error_is_transparent() {
        let err: ChatError = VoiceError::Capture("aborted".to_string()).into();
        assert_eq!(err.to_string(), "capture error: aborted");
    }

    #[test]
    fn test_from_aidline_error() {
        let err: ChatError = AidlineError::Config("bad".to_string()).into();
        assert!(matches!(err, ChatError::Config(_)));
    }

    #[test]
    fn test_is_transport() {
        assert!(ChatError::Connection("x".into()).is_transport());
        assert!(ChatError::Timeout(1).is_transport());
        assert!(ChatError::MalformedReply("x".into()).is_transport());
        assert!(!ChatError::EmptyMessage.is_transport());
        assert!(!ChatError::Voice(VoiceError::Capture("x".into())).is_transport());
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(
            ChatError::Connection("http://localhost:8000".into()).user_message(),
            CONNECTION_ERROR_REPLY
        );
        assert_eq!(
            ChatError::Voice(VoiceError::Unsupported("speech recognition".into())).user_message(),
            "Speech recognition is not supported on this device."
        );
        assert!(ChatError::MessageTooLong(10).user_message().contains("10"));
        assert_ne!(
            ChatError::UnknownMessage(Uuid::nil()).user_message(),
            CONNECTION_ERROR_REPLY
        );
    }
}
