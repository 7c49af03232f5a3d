use async_trait::async_trait;
use tracing::debug;

use super::types::{
    chat_completion::{ChatCompletionMessage, ChatCompletionRequest, ChatCompletionResponse},
    llm_service_error::LlmServiceError,
};

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Sends `input` with `context` as the system prompt and returns the
    /// model's reply. Each call is independent; no history is kept.
    async fn query(&self, context: &str, input: &str) -> Result<String, LlmServiceError>;
}

#[derive(Clone)]
pub struct ChatGptClientConfig {
    pub api_key: String,
    pub host: String,
    pub model: String,
}

#[derive(Clone)]
pub struct ChatGptClient {
    config: ChatGptClientConfig,
    client: reqwest::Client,
}

impl ChatGptClient {
    pub fn new(config: ChatGptClientConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl LlmClient for ChatGptClient {
    async fn query(&self, context: &str, input: &str) -> Result<String, LlmServiceError> {
        let url = format!("{}/v1/chat/completions", self.config.host);
        debug!(model = %self.config.model, input, "querying chat completion");

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatCompletionMessage {
                    role: "system".to_string(),
                    content: context.to_string(),
                },
                ChatCompletionMessage {
                    role: "user".to_string(),
                    content: input.to_string(),
                },
            ],
        };

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(LlmServiceError::Status {
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }

        resp.json::<ChatCompletionResponse>()
            .await?
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(LlmServiceError::EmptyResponse)
    }
}
