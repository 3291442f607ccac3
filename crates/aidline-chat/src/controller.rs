//! Conversation controller: one turn at a time through the inference client
//! and the interpretation engine.

use std::sync::Arc;

use tokio::sync::watch;

use uuid::Uuid;

use aidline_core::config::InferenceConfig;
use aidline_core::AnalysisRecord;
use aidline_voice::{
    Listener, SpeechCapture, SpeechPlayback, UtteranceId, VoicePhase, VoiceSession,
};

use crate::client::InferenceClient;
use crate::error::ChatError;
use crate::format::format_reply;
use crate::interpret::interpret;
use crate::types::{ChatMessage, Role, TurnOutcome};

/// First assistant entry of every transcript.
pub const GREETING: &str = "Hello! I'm your AI Emergency Health Assistant. \
Describe your emergency and I'll provide immediate first-aid guidance.";

/// Latest analysis as seen by display consumers.
pub type AnalysisReceiver = watch::Receiver<Option<Arc<AnalysisRecord>>>;

/// Owns the transcript, the pending input, the published analysis, and the
/// voice session that reads replies aloud.
///
/// Every mutating operation takes `&mut self`, so turns on one controller
/// are serialized and only this controller drives the voice session.
pub struct ConversationController<P> {
    client: Box<dyn InferenceClient>,
    messages: Vec<ChatMessage>,
    pending_input: String,
    max_message_chars: usize,
    analysis_tx: watch::Sender<Option<Arc<AnalysisRecord>>>,
    voice: VoiceSession<P>,
}

impl<P: SpeechPlayback> ConversationController<P> {
    pub fn new(
        client: Box<dyn InferenceClient>,
        config: &InferenceConfig,
        voice: VoiceSession<P>,
    ) -> Self {
        let (analysis_tx, _) = watch::channel(None);
        Self {
            client,
            messages: vec![ChatMessage::new(Role::Assistant, GREETING)],
            pending_input: String::new(),
            max_message_chars: config.max_message_chars,
            analysis_tx,
            voice,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.pending_input = text.into();
    }

    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    /// Receiver that sees every published analysis; each turn replaces the last.
    pub fn subscribe(&self) -> AnalysisReceiver {
        self.analysis_tx.subscribe()
    }

    pub fn latest_analysis(&self) -> Option<Arc<AnalysisRecord>> {
        self.analysis_tx.borrow().clone()
    }

    pub fn voice(&self) -> &VoiceSession<P> {
        &self.voice
    }

    /// For routing playback completion callbacks into the session.
    pub fn voice_mut(&mut self) -> &mut VoiceSession<P> {
        &mut self.voice
    }

    /// Read an assistant entry aloud, preempting anything already playing.
    pub fn speak(&mut self, message_id: Uuid) -> Result<UtteranceId, ChatError> {
        let text = self.assistant_text(message_id)?;
        Ok(self.voice.play(message_id, &text)?)
    }

    /// Per-message speaker button: pause or resume the entry being read,
    /// or start reading a different one.
    pub fn toggle_speech(&mut self, message_id: Uuid) -> Result<VoicePhase, ChatError> {
        let text = self.assistant_text(message_id)?;
        Ok(self.voice.toggle(message_id, &text)?)
    }

    pub fn stop_speech(&mut self) {
        self.voice.stop();
    }

    /// Submit the pending input. The buffer is cleared once the turn starts;
    /// a rejected buffer (empty or too long) is left as is.
    pub async fn send_pending(&mut self) -> Result<TurnOutcome, ChatError> {
        self.validate(&self.pending_input)?;
        let text = std::mem::take(&mut self.pending_input);
        self.submit(&text).await
    }

    /// Run one turn.
    ///
    /// On a transport failure the user entry stays, an assistant entry with
    /// the connection-error text is appended, and the previous analysis is
    /// left published.
    pub async fn submit(&mut self, text: &str) -> Result<TurnOutcome, ChatError> {
        self.validate(text)?;
        self.pending_input.clear();

        let user = ChatMessage::new(Role::User, text);
        let user_message_id = user.id;
        self.messages.push(user);
        tracing::info!(
            message_len = text.len(),
            endpoint = %self.client.endpoint(),
            "Submitting turn"
        );

        let reply = match self.client.ask(text).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, "Inference request failed");
                self.messages
                    .push(ChatMessage::new(Role::Assistant, e.user_message()));
                return Err(e);
            }
        };

        let analysis = Arc::new(interpret(text, &reply));
        let reply = ChatMessage::new(Role::Assistant, format_reply(&reply));
        self.messages.push(reply.clone());
        self.analysis_tx.send_replace(Some(Arc::clone(&analysis)));

        tracing::info!(
            injury = %analysis.injury_type,
            severity = %analysis.severity,
            confidence = analysis.confidence,
            "Turn complete"
        );

        Ok(TurnOutcome {
            user_message_id,
            reply,
            analysis,
        })
    }

    /// Capture one utterance and submit it like typed input.
    ///
    /// `Ok(None)` when nothing was recognized.
    pub async fn listen_and_submit<C: SpeechCapture>(
        &mut self,
        listener: &mut Listener<C>,
    ) -> Result<Option<TurnOutcome>, ChatError> {
        match listener.listen().await? {
            Some(text) => {
                self.set_input(text);
                self.send_pending().await.map(Some)
            }
            None => Ok(None),
        }
    }

    fn assistant_text(&self, message_id: Uuid) -> Result<String, ChatError> {
        self.messages
            .iter()
            .find(|m| m.id == message_id && m.role == Role::Assistant)
            .map(|m| m.content.clone())
            .ok_or(ChatError::UnknownMessage(message_id))
    }

    fn validate(&self, text: &str) -> Result<(), ChatError> {
        if text.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if text.chars().count() > self.max_message_chars {
            return Err(ChatError::MessageTooLong(self.max_message_chars));
        }
        Ok(())
    }
}
