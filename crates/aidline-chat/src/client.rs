//! Remote inference clients.
//!
//! Two backends answer the same single-turn text exchange: the relay service
//! (`{"message"}` in, `{"ai_response"}` out) and a local Ollama instance.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use aidline_core::config::{InferenceBackend, InferenceConfig};

use crate::error::ChatError;

/// One request/response exchange with a language model service.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Send the user's text and return the raw reply.
    async fn ask(&self, message: &str) -> Result<String, ChatError>;

    /// Where requests go, for logs.
    fn endpoint(&self) -> &str;
}

/// Select the backend named in the config.
pub fn build_client(config: &InferenceConfig) -> Result<Box<dyn InferenceClient>, ChatError> {
    let client: Box<dyn InferenceClient> = match config.backend {
        InferenceBackend::Relay => {
            Box::new(RelayClient::new(&config.endpoint, config.timeout_secs)?)
        }
        InferenceBackend::Ollama => Box::new(OllamaClient::new(
            &config.ollama_url,
            &config.model,
            config.timeout_secs,
        )?),
    };
    tracing::info!(
        backend = ?config.backend,
        endpoint = %client.endpoint(),
        "Inference client ready"
    );
    Ok(client)
}

fn http_client(timeout_secs: u64) -> Result<reqwest::Client, ChatError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ChatError::Http(e.to_string()))
}

fn map_send_error(e: reqwest::Error, endpoint: &str, timeout_secs: u64) -> ChatError {
    if e.is_connect() {
        ChatError::Connection(endpoint.to_string())
    } else if e.is_timeout() {
        ChatError::Timeout(timeout_secs)
    } else {
        ChatError::Http(e.to_string())
    }
}

/// POST `body` and decode a JSON answer, mapping every failure to a turn error.
async fn post_json<B, T>(
    client: &reqwest::Client,
    url: &str,
    body: &B,
    timeout_secs: u64,
) -> Result<T, ChatError>
where
    B: Serialize + ?Sized + Sync,
    T: DeserializeOwned,
{
    let response = client
        .post(url)
        .json(body)
        .send()
        .await
        .map_err(|e| map_send_error(e, url, timeout_secs))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ChatError::Status {
            status: status.as_u16(),
            body,
        });
    }

    // Timeouts can also fire while the body is streaming in.
    let bytes = response
        .bytes()
        .await
        .map_err(|e| map_send_error(e, url, timeout_secs))?;
    serde_json::from_slice(&bytes).map_err(|e| ChatError::MalformedReply(e.to_string()))
}

// =============================================================================
// Relay
// =============================================================================

#[derive(Serialize)]
struct RelayRequest<'a> {
    message: &'a str,
}

#[derive(Deserialize)]
struct RelayResponse {
    ai_response: String,
}

/// Client for the relay service in front of the model.
#[derive(Debug, Clone)]
pub struct RelayClient {
    endpoint: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl RelayClient {
    pub fn new(endpoint: &str, timeout_secs: u64) -> Result<Self, ChatError> {
        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            timeout_secs,
            client: http_client(timeout_secs)?,
        })
    }
}

#[async_trait]
impl InferenceClient for RelayClient {
    async fn ask(&self, message: &str) -> Result<String, ChatError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            message_len = message.len(),
            "Sending turn to relay"
        );
        let parsed: RelayResponse = post_json(
            &self.client,
            &self.endpoint,
            &RelayRequest { message },
            self.timeout_secs,
        )
        .await?;
        Ok(parsed.ai_response)
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

// =============================================================================
// Ollama
// =============================================================================

#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

/// Wrap the user's text in the first-aid instruction.
pub fn build_prompt(message: &str) -> String {
    format!(
        "You are an emergency health assistant. Provide clear first aid advice.\n\n\
         User: {}\n\nAssistant:",
        message
    )
}

/// Talks to a local Ollama instance directly.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    base_url: String,
    generate_url: String,
    model: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: &str, timeout_secs: u64) -> Result<Self, ChatError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        Ok(Self {
            generate_url: format!("{}/api/generate", base_url),
            base_url,
            model: model.to_string(),
            timeout_secs,
            client: http_client(timeout_secs)?,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl InferenceClient for OllamaClient {
    async fn ask(&self, message: &str) -> Result<String, ChatError> {
        let prompt = build_prompt(message);
        tracing::debug!(model = %self.model, base_url = %self.base_url, "Sending turn to Ollama");
        let parsed: OllamaGenerateResponse = post_json(
            &self.client,
            &self.generate_url,
            &OllamaGenerateRequest {
                model: &self.model,
                prompt: &prompt,
                stream: false,
            },
            self.timeout_secs,
        )
        .await?;
        Ok(parsed.response.trim().to_string())
    }

    fn endpoint(&self) -> &str {
        &self.generate_url
    }
}

// =============================================================================
// Mock
// =============================================================================

/// Mock client for testing. Replies are served in queue order; clones share
/// the queue and the request log.
#[derive(Debug, Clone, Default)]
pub struct MockInferenceClient {
    replies: Arc<Mutex<VecDeque<Result<String, String>>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockInferenceClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replying(reply: &str) -> Self {
        let mock = Self::new();
        mock.push_reply(reply);
        mock
    }

    pub fn push_reply(&self, reply: &str) {
        if let Ok(mut q) = self.replies.lock() {
            q.push_back(Ok(reply.to_string()));
        }
    }

    /// Queue a connection failure.
    pub fn push_failure(&self, endpoint: &str) {
        if let Ok(mut q) = self.replies.lock() {
            q.push_back(Err(endpoint.to_string()));
        }
    }

    /// Every message received so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl InferenceClient for MockInferenceClient {
    async fn ask(&self, message: &str) -> Result<String, ChatError> {
        let lock_err = |e: String| ChatError::Http(format!("mock lock poisoned: {}", e));
        self.requests
            .lock()
            .map_err(|e| lock_err(e.to_string()))?
            .push(message.to_string());
        let next = self
            .replies
            .lock()
            .map_err(|e| lock_err(e.to_string()))?
            .pop_front();
        match next {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(endpoint)) => Err(ChatError::Connection(endpoint)),
            None => Err(ChatError::Connection("mock://no-reply-queued".to_string())),
        }
    }

    fn endpoint(&self) -> &str {
        "mock://inference"
    }
}
