use crate::config::Config;
use crate::history::ChatTurn;
use crate::logging::get_logger;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use std::time::{Duration, Instant};

/// Common interface for chat-completion backends
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send the whole transcript and return the assistant's reply text
    async fn complete(&self, messages: &[ChatTurn]) -> Result<String>;

    /// Provider name for logging/display purposes
    fn get_name(&self) -> &'static str;
}

/// OpenAI-compatible chat-completions endpoint (Groq by default)
pub struct GroqProvider {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl GroqProvider {
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config
            .resolve_api_key()
            .ok_or_else(|| anyhow!("No API key configured. Set GROQ_API_KEY or add api_key to the config file"))?;

        let timeout = Duration::from_millis(config.request_timeout);
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    fn build_payload(&self, messages: &[ChatTurn]) -> serde_json::Value {
        json!({
            "model": self.model,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "stream": false,
            "messages": messages,
        })
    }
}

#[async_trait]
impl ChatProvider for GroqProvider {
    async fn complete(&self, messages: &[ChatTurn]) -> Result<String> {
        let start = Instant::now();
        let result = self.send(messages).await;

        if let Ok(logger) = get_logger() {
            if let Ok(logger_guard) = logger.lock() {
                let _ = logger_guard.log_provider_operation(
                    self.get_name(),
                    start.elapsed().as_millis() as u64,
                    result.is_ok(),
                );
            }
        }

        result
    }

    fn get_name(&self) -> &'static str {
        "Groq"
    }
}

impl GroqProvider {
    async fn send(&self, messages: &[ChatTurn]) -> Result<String> {
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&self.build_payload(messages))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    anyhow!("Request timed out. Please try again.")
                } else if e.is_connect() {
                    anyhow!("Connection failed. Please check your internet connection.")
                } else {
                    anyhow!("Request failed: {}", e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse response: {}", e))?;

        parse_reply(&json)
    }
}

fn status_error(status: StatusCode, body: &str) -> anyhow::Error {
    match status {
        StatusCode::UNAUTHORIZED => anyhow!("Invalid API key"),
        StatusCode::TOO_MANY_REQUESTS => anyhow!("Rate limit exceeded. Please try again later."),
        _ => anyhow!("HTTP {} - {}", status.as_u16(), body),
    }
}

fn parse_reply(json: &serde_json::Value) -> Result<String> {
    json["choices"][0]["message"]["content"]
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| anyhow!("Unexpected response format: missing choices[0].message.content"))
}
