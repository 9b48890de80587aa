//! Ollama client for non-streamed chat completions.
//!
//! Every registered backend is served by the same Ollama instance; the
//! backend's `endpoint_path` selects the model and its temperature is sent
//! as a per-request option.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{ChatAnswer, GenerationBackend, Timings};
use crate::chat::ChatMessage;
use crate::error::LLMError;
use crate::registry::BackendConfig;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Configuration for the Ollama client.
#[derive(Debug)]
pub struct OllamaConfig {
    /// Base URL of the Ollama server, without trailing slash.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_seconds: Option<u64>,
}

/// Client for interacting with an Ollama server.
///
/// The client uses `Arc` internally for configuration, making cloning cheap.
#[derive(Debug, Clone)]
pub struct Ollama {
    pub config: Arc<OllamaConfig>,
    pub client: Client,
}

#[derive(Serialize)]
struct OllamaChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<OllamaChatMessage<'a>>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Deserialize, Debug)]
struct OllamaChatResponse {
    #[serde(default)]
    model: String,
    message: OllamaResponseMessage,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    total_duration: i64,
    #[serde(default)]
    load_duration: i64,
    #[serde(default)]
    prompt_eval_count: i64,
    #[serde(default)]
    prompt_eval_duration: i64,
    #[serde(default)]
    eval_count: i64,
    #[serde(default)]
    eval_duration: i64,
}

#[derive(Deserialize, Debug)]
struct OllamaResponseMessage {
    #[serde(default)]
    content: String,
}

#[derive(Deserialize, Debug)]
struct OllamaErrorBody {
    error: String,
}

impl From<OllamaChatResponse> for ChatAnswer {
    fn from(resp: OllamaChatResponse) -> Self {
        ChatAnswer {
            model: resp.model,
            content: resp.message.content,
            done: resp.done,
            timings: Timings {
                total_duration: resp.total_duration,
                load_duration: resp.load_duration,
                prompt_eval_count: resp.prompt_eval_count,
                prompt_eval_duration: resp.prompt_eval_duration,
                eval_count: resp.eval_count,
                eval_duration: resp.eval_duration,
            },
        }
    }
}

impl Ollama {
    pub fn new(
        base_url: impl Into<String>,
        timeout_seconds: Option<u64>,
    ) -> Result<Self, LLMError> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, base_url, timeout_seconds))
    }

    /// Creates a new Ollama client with a custom HTTP client.
    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        timeout_seconds: Option<u64>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            config: Arc::new(OllamaConfig {
                base_url,
                timeout_seconds,
            }),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.config.base_url)
    }
}

#[async_trait]
impl GenerationBackend for Ollama {
    async fn invoke(
        &self,
        backend: &BackendConfig,
        messages: &[ChatMessage],
    ) -> Result<ChatAnswer, LLMError> {
        let body = OllamaChatRequest {
            model: &backend.endpoint_path,
            messages: messages
                .iter()
                .map(|m| OllamaChatMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            stream: false,
            options: OllamaOptions {
                temperature: backend.temperature,
            },
        };

        let payload = serde_json::to_string(&body)?;
        log::trace!("Ollama request payload: {}", payload);

        let mut request = self
            .client
            .post(self.chat_url())
            .header(CONTENT_TYPE, "application/json")
            .body(payload);
        if let Some(timeout) = self.config.timeout_seconds {
            request = request.timeout(Duration::from_secs(timeout));
        }

        let resp = request.send().await?;
        let status = resp.status();
        log::debug!("Ollama HTTP status for {}: {}", backend.name, status);

        let raw = resp.text().await?;
        if !status.is_success() {
            return Err(match serde_json::from_str::<OllamaErrorBody>(&raw) {
                Ok(body) => LLMError::ProviderError(body.error),
                Err(_) => LLMError::HttpError(format!("status {status}: {raw}")),
            });
        }

        let parsed: OllamaChatResponse =
            serde_json::from_str(&raw).map_err(|e| LLMError::ResponseFormatError {
                message: e.to_string(),
                raw_response: raw.clone(),
            })?;
        Ok(parsed.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_drops_trailing_slash() {
        let ollama = Ollama::new("http://localhost:11434/", None).unwrap();
        assert_eq!(ollama.base_url(), "http://localhost:11434");
        assert_eq!(ollama.chat_url(), "http://localhost:11434/api/chat");
    }

    #[test]
    fn timeout_is_kept_for_each_request() {
        let ollama = Ollama::new(DEFAULT_OLLAMA_URL, Some(30)).unwrap();
        assert_eq!(ollama.config.timeout_seconds, Some(30));
    }

    #[test]
    fn request_carries_temperature_as_option() {
        let body = OllamaChatRequest {
            model: "m",
            messages: vec![OllamaChatMessage {
                role: "user",
                content: "hi",
            }],
            stream: false,
            options: OllamaOptions { temperature: 0.5 },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["options"]["temperature"], 0.5);
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn each_timing_comes_from_its_own_field() {
        let resp: OllamaChatResponse = serde_json::from_str(
            r#"{"model":"m","message":{"role":"assistant","content":"x"},"done":true,
                "total_duration":1,"load_duration":2,"prompt_eval_count":3,
                "prompt_eval_duration":4,"eval_count":5,"eval_duration":6}"#,
        )
        .unwrap();
        let answer = ChatAnswer::from(resp);
        assert_eq!(
            answer.timings,
            Timings {
                total_duration: 1,
                load_duration: 2,
                prompt_eval_count: 3,
                prompt_eval_duration: 4,
                eval_count: 5,
                eval_duration: 6,
            }
        );
    }
}
