use std::time::Duration;

use async_trait::async_trait;
use planora_core::config::LlmConfig;
use planora_core::errors::ApplicationError;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq)]
pub struct GenerationRequest {
    pub system: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the raw reply text. `ApplicationError::Configuration` means no
    /// request can succeed until the deployment is fixed.
    async fn generate(&self, request: GenerationRequest) -> Result<String, ApplicationError>;
}

/// OpenAI-compatible `/chat/completions` client (Groq, OpenAI, Ollama).
pub struct ChatCompletionClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<SecretString>,
    missing_credentials: Option<String>,
}

impl ChatCompletionClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self, ApplicationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| {
                ApplicationError::Configuration(format!("failed to build llm http client: {error}"))
            })?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/chat/completions",
                config.effective_base_url().trim_end_matches('/')
            ),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            missing_credentials: config.missing_credentials(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TextGenerator for ChatCompletionClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String, ApplicationError> {
        if let Some(message) = &self.missing_credentials {
            return Err(ApplicationError::Configuration(message.clone()));
        }

        let body = ChatRequest::from_generation(&self.model, &request);
        let mut builder = self.client.post(&self.endpoint).json(&body);
        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key.expose_secret());
        }

        let response = builder.send().await.map_err(|error| {
            ApplicationError::Integration(format!("chat completion request failed: {error}"))
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ApplicationError::Configuration(format!(
                "chat completion endpoint rejected the configured api key ({status})"
            )));
        }
        if !status.is_success() {
            return Err(ApplicationError::Integration(format!(
                "chat completion endpoint returned {status}"
            )));
        }

        let payload: ChatResponse = response.json().await.map_err(|error| {
            ApplicationError::Integration(format!(
                "failed to decode chat completion response: {error}"
            ))
        })?;
        Ok(payload.into_content())
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> ChatRequest<'a> {
    fn from_generation(model: &'a str, request: &'a GenerationRequest) -> Self {
        Self {
            model,
            messages: vec![
                ChatMessage { role: "system", content: &request.system },
                ChatMessage { role: "user", content: &request.prompt },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl ChatResponse {
    /// First choice's content; an empty reply is an empty string, not an error.
    fn into_content(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use planora_core::config::{AppConfig, LlmProvider};
    use planora_core::errors::ApplicationError;

    use super::{ChatCompletionClient, ChatRequest, ChatResponse, GenerationRequest, TextGenerator};

    fn request() -> GenerationRequest {
        GenerationRequest {
            system: "You are a guide.".to_string(),
            prompt: "Recommend exactly 10 real restaurants in Lisbon.".to_string(),
            temperature: 0.7,
            max_tokens: 2000,
        }
    }

    #[tokio::test]
    async fn missing_api_key_is_a_configuration_error_before_any_request() {
        let config = AppConfig::default();
        let client = ChatCompletionClient::from_config(&config.llm).expect("client builds");

        let result = client.generate(request()).await;

        assert!(matches!(
            result,
            Err(ApplicationError::Configuration(ref message)) if message.contains("llm.api_key")
        ));
    }

    #[test]
    fn endpoint_follows_provider_default_base_url() {
        let mut config = AppConfig::default().llm;
        let groq = ChatCompletionClient::from_config(&config).expect("client builds");
        assert_eq!(groq.endpoint(), "https://api.groq.com/openai/v1/chat/completions");

        config.provider = LlmProvider::Ollama;
        config.base_url = Some("http://gpu-box:11434/v1/".to_string());
        let ollama = ChatCompletionClient::from_config(&config).expect("client builds");
        assert_eq!(ollama.endpoint(), "http://gpu-box:11434/v1/chat/completions");
    }

    #[test]
    fn request_body_carries_system_and_user_messages() {
        let generation = request();
        let body = serde_json::to_value(ChatRequest::from_generation(
            "llama-3.3-70b-versatile",
            &generation,
        ))
        .expect("serialize");

        assert_eq!(body["model"], "llama-3.3-70b-versatile");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["max_tokens"], 2000);
    }

    #[test]
    fn response_without_choices_yields_empty_content() {
        let empty: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).expect("deserialize");
        assert_eq!(empty.into_content(), "");

        let reply: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"  NAME: Cervejaria Ramiro\n"}}]}"#,
        )
        .expect("deserialize");
        assert_eq!(reply.into_content(), "NAME: Cervejaria Ramiro");
    }
}
