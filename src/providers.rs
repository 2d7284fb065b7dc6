use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tokio::net::TcpStream;

use crate::config::{Settings, LOCAL_SERVICE_ADDR};
use crate::environment::Environment;
use crate::prompt::build_prompt;

/// Token budget for a single generated command
const MAX_TOKENS: u32 = 500;

/// Low temperature keeps command output deterministic
const TEMPERATURE: f64 = 0.1;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// How long the auto-detect path waits for the local service port
const PORT_PROBE_TIMEOUT: Duration = Duration::from_millis(500);

/// Common interface for all hosted model backends
#[async_trait]
pub trait CommandProvider: Send + Sync + std::fmt::Debug {
    /// Translate a natural-language request into a shell command
    async fn generate(&self, request: &str, env: &Environment) -> Result<String>;

    /// Provider name for logging/display purposes
    fn name(&self) -> &'static str;
}

fn http_client() -> Client {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Backend speaking the OpenAI chat-completions wire format.
///
/// OpenAI, Minimax, Qwen and the local AmpCode service all share this shape
/// and differ only in endpoint, credentials and model name.
#[derive(Debug)]
pub struct ChatCompletionsProvider {
    client: Client,
    name: &'static str,
    base_url: String,
    api_key: String,
    model: String,
}

impl ChatCompletionsProvider {
    fn new(name: &'static str, base_url: String, api_key: String, model: &str) -> Self {
        Self {
            client: http_client(),
            name,
            base_url,
            api_key,
            model: model.to_string(),
        }
    }

    pub fn openai(api_key: String) -> Self {
        Self::new(
            "OpenAI",
            "https://api.openai.com/v1".to_string(),
            api_key,
            "gpt-4o-mini",
        )
    }

    pub fn minimax(api_key: String) -> Self {
        Self::new(
            "Minimax",
            "https://api.minimax.io/v1".to_string(),
            api_key,
            "MiniMax-M2.1",
        )
    }

    pub fn qwen(api_key: String) -> Self {
        Self::new(
            "Qwen",
            "https://dashscope.aliyuncs.com/compatible-mode/v1".to_string(),
            api_key,
            "qwen-coder-plus",
        )
    }

    /// Local OpenAI-compatible service; a placeholder key is acceptable
    pub fn ampcode(settings: &Settings) -> Self {
        let api_key = settings
            .ampcode_api_key
            .clone()
            .unwrap_or_else(|| "ampcode-local".to_string());
        Self::new("AmpCode", settings.ampcode_url(), api_key, "gemini-2.5-flash")
    }

    #[allow(dead_code)]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CommandProvider for ChatCompletionsProvider {
    async fn generate(&self, request: &str, env: &Environment) -> Result<String> {
        let prompt = build_prompt(request, env);
        let body = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
        });

        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    anyhow!("Request to {} timed out after {:?}", self.name, REQUEST_TIMEOUT)
                } else if e.is_connect() {
                    anyhow!("Failed to connect to {} at {}: {}", self.name, self.base_url, e)
                } else {
                    anyhow!("Request to {} failed: {}", self.name, e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("{} returned error: {} - {}", self.name, status, error_text));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse {} response: {}", self.name, e))?;

        let reply = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| anyhow!("Unexpected response format from {}", self.name))?;

        Ok(reply.trim().to_string())
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

/// Anthropic messages API backend
#[derive(Debug)]
pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    model: String,
}

impl AnthropicProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            client: http_client(),
            api_key,
            model: "claude-3-5-sonnet-20241022".to_string(),
        }
    }

    #[allow(dead_code)]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CommandProvider for AnthropicProvider {
    async fn generate(&self, request: &str, env: &Environment) -> Result<String> {
        let prompt = build_prompt(request, env);
        let body = json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "messages": [{"role": "user", "content": prompt}],
        });

        let response = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    anyhow!("Request to Anthropic timed out after {:?}", REQUEST_TIMEOUT)
                } else if e.is_connect() {
                    anyhow!("Failed to connect to Anthropic: {}", e)
                } else {
                    anyhow!("Request to Anthropic failed: {}", e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Anthropic returned error: {} - {}", status, error_text));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse Anthropic response: {}", e))?;

        let reply = json["content"][0]["text"]
            .as_str()
            .ok_or_else(|| anyhow!("Unexpected response format from Anthropic"))?;

        Ok(reply.trim().to_string())
    }

    fn name(&self) -> &'static str {
        "Anthropic"
    }
}

/// Pick a provider: explicit name wins, then the local service port, then
/// credential variables in a fixed priority order.
pub async fn select_provider(
    name: Option<&str>,
    settings: &Settings,
) -> Result<Box<dyn CommandProvider>> {
    if let Some(name) = name {
        return provider_by_name(name, settings);
    }

    // Local service first: fast and free when it is up
    if local_service_reachable(LOCAL_SERVICE_ADDR).await {
        return Ok(Box::new(ChatCompletionsProvider::ampcode(settings)));
    }

    if settings.has_any_api_key() {
        if let Some(key) = &settings.anthropic_api_key {
            return Ok(Box::new(AnthropicProvider::new(key.clone())));
        }
        if let Some(key) = &settings.openai_api_key {
            return Ok(Box::new(ChatCompletionsProvider::openai(key.clone())));
        }
        if let Some(key) = &settings.minimax_api_key {
            return Ok(Box::new(ChatCompletionsProvider::minimax(key.clone())));
        }
        if let Some(key) = &settings.qwen_api_key {
            return Ok(Box::new(ChatCompletionsProvider::qwen(key.clone())));
        }
    }

    Err(anyhow!(
        "No API key found. Set ANTHROPIC_API_KEY, OPENAI_API_KEY, MINIMAX_API_KEY, or QWEN_API_KEY."
    ))
}

/// Resolve an explicitly named provider
fn provider_by_name(name: &str, settings: &Settings) -> Result<Box<dyn CommandProvider>> {
    match name.to_lowercase().as_str() {
        "openai" => {
            let key = settings.openai_api_key.clone().ok_or_else(|| {
                anyhow!("OpenAI API key not found. Set OPENAI_API_KEY environment variable.")
            })?;
            Ok(Box::new(ChatCompletionsProvider::openai(key)))
        }
        "anthropic" | "claude" => {
            let key = settings.anthropic_api_key.clone().ok_or_else(|| {
                anyhow!("Anthropic API key not found. Set ANTHROPIC_API_KEY environment variable.")
            })?;
            Ok(Box::new(AnthropicProvider::new(key)))
        }
        "minimax" => {
            let key = settings.minimax_api_key.clone().ok_or_else(|| {
                anyhow!("Minimax API key not found. Set MINIMAX_API_KEY environment variable.")
            })?;
            Ok(Box::new(ChatCompletionsProvider::minimax(key)))
        }
        "qwen" => {
            let key = settings.qwen_api_key.clone().ok_or_else(|| {
                anyhow!("Qwen API key not found. Set QWEN_API_KEY environment variable.")
            })?;
            Ok(Box::new(ChatCompletionsProvider::qwen(key)))
        }
        "ampcode" => Ok(Box::new(ChatCompletionsProvider::ampcode(settings))),
        other => Err(anyhow!("Unknown provider: {}", other)),
    }
}

/// Check whether something is listening on the local service port
async fn local_service_reachable(addr: &str) -> bool {
    matches!(
        tokio::time::timeout(PORT_PROBE_TIMEOUT, TcpStream::connect(addr)).await,
        Ok(Ok(_))
    )
}
