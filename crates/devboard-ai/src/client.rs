use devboard_core::ModelInfo;
use serde::Deserialize;
use serde::Serialize;

use crate::error::AiError;

pub const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelListResponse {
    #[serde(default)]
    data: Vec<ModelInfo>,
}

/// Single round-trip chat client against an OpenAI-compatible completions
/// endpoint. No streaming; the full reply comes back in one response.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ChatClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(OPENROUTER_API_URL, api_key)
    }

    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Sends the system context plus the running conversation and returns
    /// the assistant's reply text. Non-2xx responses surface the provider's
    /// `error.message` when the body carries one.
    pub async fn converse(
        &self,
        model: &str,
        system_context: &str,
        history: &[ChatMessage],
    ) -> Result<String, AiError> {
        if self.api_key.is_empty() {
            return Err(AiError::MissingApiKey);
        }

        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatMessage::system(system_context));
        messages.extend_from_slice(history);

        let request = CompletionRequest {
            model,
            messages: &messages,
            temperature: 0.7,
            max_tokens: 4096,
        };
        tracing::debug!(model, turns = history.len(), "sending chat completion");

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AiError::RequestFailed(extract_provider_error(
                status.as_u16(),
                &body,
            )));
        }

        let parsed: CompletionResponse = serde_json::from_str(&body)
            .map_err(|err| AiError::RequestFailed(format!("malformed response: {err}")))?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AiError::RequestFailed("response carried no content".to_string()))
    }

    /// Fetches the provider's model catalog, sorted by display name.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, AiError> {
        let response = self
            .http
            .get(format!("{}/models", self.base_url))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AiError::RequestFailed(extract_provider_error(
                status.as_u16(),
                &body,
            )));
        }

        let parsed: ModelListResponse = serde_json::from_str(&body)
            .map_err(|err| AiError::RequestFailed(format!("malformed model list: {err}")))?;
        let mut models = parsed.data;
        models.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(models)
    }
}

fn extract_provider_error(status: u16, body: &str) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.chars().take(200).collect());
    format!("status {status}: {detail}")
}
