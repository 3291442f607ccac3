//! Integration tests for the inference clients against a local mock server.

use aidline_chat::{
    ChatError, ConversationController, InferenceClient, OllamaClient, RelayClient,
};
use aidline_core::config::{InferenceConfig, VoiceConfig};
use aidline_core::InjuryType;
use aidline_voice::{MockPlayback, VoiceSession};
use mockito::Matcher;
use serde_json::json;

const REPLY: &str = "Apply firm pressure to the wound with a clean cloth. \
Do not remove the cloth if it soaks through.";

fn relay_for(server: &mockito::ServerGuard) -> RelayClient {
    RelayClient::new(&format!("{}/analyze", server.url()), 5).unwrap()
}

// ---- Relay ----

#[tokio::test]
async fn test_relay_round_trip() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/analyze")
        .match_body(Matcher::Json(json!({ "message": "my arm is bleeding" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "ai_response": REPLY }).to_string())
        .create_async()
        .await;

    let reply = relay_for(&server).ask("my arm is bleeding").await.unwrap();

    mock.assert_async().await;
    assert_eq!(reply, REPLY);
}

#[tokio::test]
async fn test_relay_non_success_status() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/analyze")
        .with_status(503)
        .with_body("model loading")
        .create_async()
        .await;

    let err = relay_for(&server).ask("help").await.unwrap_err();
    match err {
        ChatError::Status { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "model loading");
        }
        other => panic!("expected Status, got {:?}", other),
    }
}

#[tokio::test]
async fn test_relay_malformed_json() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/analyze")
        .with_status(200)
        .with_body(r#"{"reply": "wrong field"}"#)
        .create_async()
        .await;

    let err = relay_for(&server).ask("help").await.unwrap_err();
    assert!(matches!(err, ChatError::MalformedReply(_)));
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_relay_connection_refused() {
    let client = RelayClient::new("http://127.0.0.1:1/analyze", 2).unwrap();
    let err = client.ask("help").await.unwrap_err();
    assert!(matches!(err, ChatError::Connection(ref url) if url == "http://127.0.0.1:1/analyze"));
}

// ---- Ollama ----

#[tokio::test]
async fn test_ollama_round_trip() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/generate")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({ "model": "tinyllama", "stream": false })),
            Matcher::Regex("User: I have a headache".to_string()),
        ]))
        .with_status(200)
        .with_body(
            json!({ "response": "  Rest in a quiet, dark room.\n", "done": true }).to_string(),
        )
        .create_async()
        .await;

    let client = OllamaClient::new(&server.url(), "tinyllama", 5).unwrap();
    let reply = client.ask("I have a headache").await.unwrap();

    mock.assert_async().await;
    assert_eq!(reply, "Rest in a quiet, dark room.");
}

#[tokio::test]
async fn test_ollama_error_status() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/generate")
        .with_status(404)
        .with_body(r#"{"error":"model 'tinyllama' not found"}"#)
        .create_async()
        .await;

    let client = OllamaClient::new(&server.url(), "tinyllama", 5).unwrap();
    let err = client.ask("hi").await.unwrap_err();
    assert!(matches!(err, ChatError::Status { status: 404, .. }));
}

// ---- Controller over HTTP ----

#[tokio::test]
async fn test_controller_over_relay() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/analyze")
        .with_status(200)
        .with_body(json!({ "ai_response": REPLY }).to_string())
        .create_async()
        .await;

    let voice = VoiceSession::new(MockPlayback::new(), VoiceConfig::default());
    let mut controller = ConversationController::new(
        Box::new(relay_for(&server)),
        &InferenceConfig::default(),
        voice,
    );
    let outcome = controller.submit("My arm is bleeding").await.unwrap();

    // "wound" in the reply outranks "bleed" in the query.
    assert_eq!(outcome.analysis.injury_type, InjuryType::CutWound);
    assert_eq!(
        outcome.analysis.warnings,
        vec!["Do not remove the cloth if it soaks through."]
    );
    assert_eq!(controller.messages().len(), 3);
}
