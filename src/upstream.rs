use std::error::Error;
use std::fmt;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tokio::time::{timeout, Duration};
use tracing::debug;

use crate::prompt::ChartPrompt;

pub const DEFAULT_URL: &str = "https://cloud.olakrutrim.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "DeepSeek-Coder-V2-Instruct";
pub const MAX_TOKENS: u32 = 1024;

/// Where and how the chat-completion service is called.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_ms: u64,
}

#[derive(Debug)]
pub enum UpstreamError {
    MissingApiKey,
    Timeout,
    Transport(reqwest::Error),
    Status { status: StatusCode, body: String },
    Body(reqwest::Error),
    EmptyChoices,
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingApiKey => write!(f, "completion API key is missing (set API_KEY)"),
            Self::Timeout => write!(f, "completion request timed out"),
            Self::Transport(err) => write!(f, "failed to send completion request: {err}"),
            Self::Status { status, body } => {
                write!(f, "completion request failed ({status}): {body}")
            }
            Self::Body(err) => write!(f, "failed to read completion response: {err}"),
            Self::EmptyChoices => write!(f, "completion response contained no choices"),
        }
    }
}

impl Error for UpstreamError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) | Self::Body(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: String,
}

/// Chat-completion request body with fixed, deterministic sampling.
#[derive(Debug, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub frequency_penalty: f32,
    pub logprobs: bool,
    pub max_tokens: u32,
    pub n: u32,
    pub presence_penalty: f32,
    pub response_format: ResponseFormat,
    pub stream: bool,
    pub temperature: f32,
    pub top_p: f32,
}

impl CompletionRequest {
    pub fn new(model: &str, prompt: &ChartPrompt) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: prompt.system.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.user.clone(),
                },
            ],
            frequency_penalty: 0.0,
            logprobs: false,
            max_tokens: MAX_TOKENS,
            n: 1,
            presence_penalty: 0.0,
            response_format: ResponseFormat {
                kind: "text".to_string(),
            },
            stream: false,
            temperature: 0.0,
            top_p: 1.0,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

/// Send one completion request and return the first choice's text, trimmed.
pub async fn complete(
    client: &reqwest::Client,
    cfg: &UpstreamConfig,
    prompt: &ChartPrompt,
) -> Result<String, UpstreamError> {
    if cfg.api_key.trim().is_empty() {
        return Err(UpstreamError::MissingApiKey);
    }

    let body = CompletionRequest::new(&cfg.model, prompt);
    let fut = client
        .post(&cfg.url)
        .bearer_auth(&cfg.api_key)
        .json(&body)
        .send();

    let response = timeout(Duration::from_millis(cfg.timeout_ms), fut)
        .await
        .map_err(|_| UpstreamError::Timeout)?
        .map_err(UpstreamError::Transport)?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unable to read response body>".to_string());
        return Err(UpstreamError::Status { status, body });
    }

    let parsed: CompletionResponse = response.json().await.map_err(UpstreamError::Body)?;
    debug!(choices = parsed.choices.len(), "completion received");

    parsed
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.trim().to_string())
        .ok_or(UpstreamError::EmptyChoices)
}
