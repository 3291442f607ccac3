//! Conversational core for Aidline.
//!
//! Sends user text to the remote inference collaborator, turns the free-text
//! reply into a structured [`AnalysisRecord`](aidline_core::AnalysisRecord),
//! and publishes the latest record to display consumers.

pub mod client;
pub mod controller;
pub mod error;
pub mod format;
pub mod interpret;
pub mod types;

pub use client::{
    build_client, build_prompt, InferenceClient, MockInferenceClient, OllamaClient, RelayClient,
};
pub use controller::{AnalysisReceiver, ConversationController, GREETING};
pub use error::{ChatError, CONNECTION_ERROR_REPLY};
pub use format::format_reply;
pub use interpret::{interpret, interpret_with_rng};
pub use types::{ChatMessage, Role, TurnOutcome};
