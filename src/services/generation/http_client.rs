//! Completion client for the Anthropic Messages and OpenAI Chat Completions APIs.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::{AppError, ProviderKind, Settings};
use crate::ports::{CompletionClient, CompletionRequest};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Blocking HTTP client for one configured provider.
#[derive(Clone)]
pub struct HttpCompletionClient {
    provider: ProviderKind,
    api_key: String,
    api_url: Url,
    model: String,
    client: Client,
}

impl std::fmt::Debug for HttpCompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCompletionClient")
            .field("provider", &self.provider)
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl HttpCompletionClient {
    pub fn new(api_key: String, settings: &Settings) -> Result<Self, AppError> {
        let api_url = match &settings.api_url {
            Some(url) => url.clone(),
            None => Url::parse(settings.provider.default_api_url())
                .map_err(|e| AppError::config_error(format!("Invalid API URL: {}", e)))?,
        };
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            provider: settings.provider,
            api_key,
            api_url,
            model: settings.model().to_string(),
            client,
        })
    }
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<AnthropicBlock>,
}

#[derive(Debug, Deserialize)]
struct AnthropicBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    #[serde(default)]
    content: Option<String>,
}

impl CompletionClient for HttpCompletionClient {
    fn complete(&self, request: &CompletionRequest) -> Result<String, AppError> {
        tracing::debug!(provider = self.provider.as_str(), model = %self.model, "completion request");
        match self.provider {
            ProviderKind::Anthropic => self.complete_anthropic(request),
            ProviderKind::Openai => self.complete_openai(request),
        }
    }
}

impl HttpCompletionClient {
    fn complete_anthropic(&self, request: &CompletionRequest) -> Result<String, AppError> {
        let body = AnthropicRequest {
            model: &self.model,
            max_tokens: request.max_tokens,
            system: &request.system,
            messages: vec![Message { role: "user", content: &request.prompt }],
        };
        let response = self
            .client
            .post(self.api_url.clone())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .map_err(|e| AppError::Provider(format!("HTTP request failed: {}", e)))?;

        let parsed: AnthropicResponse = Self::read_json(response)?;
        let text: String = parsed
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();
        Self::non_empty(text)
    }

    fn complete_openai(&self, request: &CompletionRequest) -> Result<String, AppError> {
        let body = OpenAiRequest {
            model: &self.model,
            max_tokens: request.max_tokens,
            messages: vec![
                Message { role: "system", content: &request.system },
                Message { role: "user", content: &request.prompt },
            ],
        };
        let response = self
            .client
            .post(self.api_url.clone())
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .map_err(|e| AppError::Provider(format!("HTTP request failed: {}", e)))?;

        let parsed: OpenAiResponse = Self::read_json(response)?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();
        Self::non_empty(text)
    }

    fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::blocking::Response,
    ) -> Result<T, AppError> {
        let status = response.status();
        if status.is_success() {
            response
                .json()
                .map_err(|e| AppError::Provider(format!("Failed to parse response: {}", e)))
        } else if status.as_u16() == 429 {
            Err(AppError::Provider("Rate limited (429)".into()))
        } else if status.is_server_error() {
            Err(AppError::Provider(format!("Server error ({})", status.as_u16())))
        } else {
            let error_text = response.text().unwrap_or_else(|_| "Unknown error".to_string());
            Err(AppError::Provider(format!("API error ({}): {}", status.as_u16(), error_text)))
        }
    }

    fn non_empty(text: String) -> Result<String, AppError> {
        if text.trim().is_empty() {
            Err(AppError::Provider("Empty completion".into()))
        } else {
            Ok(text)
        }
    }
}
