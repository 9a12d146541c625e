use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    config::ProviderCfg,
    prompts::Prompt,
    providers::{check_status, ContentProvider, ProviderError},
};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";
const API_VERSION: &str = "2023-06-01";

/// Anthropic messages API binding. The persona travels inside the single
/// user turn, after the instruction.
pub struct ClaudeProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl ClaudeProvider {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 4000,
            temperature: 0.7,
        }
    }

    pub fn from_cfg(cfg: &ProviderCfg, api_key: Option<String>) -> Self {
        let mut p = Self::new(api_key);
        if let Some(url) = &cfg.base_url {
            p.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(model) = &cfg.model {
            p.model = model.clone();
        }
        if let Some(t) = cfg.max_tokens {
            p.max_tokens = t;
        }
        if let Some(t) = cfg.temperature {
            p.temperature = t;
        }
        p
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

pub(crate) fn fold_prompt(prompt: &Prompt) -> String {
    format!("{}\n\n{}", prompt.user, prompt.system)
}

#[derive(Serialize)]
struct MessagesReq<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Msg<'a>>,
}
#[derive(Serialize)]
struct Msg<'a> { role: &'a str, content: &'a str }
#[derive(Deserialize)]
struct MessagesResp { content: Vec<Block> }
#[derive(Deserialize)]
struct Block {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

#[async_trait]
impl ContentProvider for ClaudeProvider {
    fn name(&self) -> &'static str {
        "claude"
    }

    fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(&self, prompt: &Prompt) -> Result<String, ProviderError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingCredential { provider: self.name() })?;
        let content = fold_prompt(prompt);
        let req = MessagesReq {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            messages: vec![Msg { role: "user", content: &content }],
        };
        tracing::debug!(provider = self.name(), model = %self.model, "sending messages request");
        let resp = self.client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", key)
            .header("anthropic-version", API_VERSION)
            .json(&req)
            .send()
            .await?;
        let resp: MessagesResp = check_status(self.name(), resp).await?.json().await?;
        let text: String = resp.content
            .into_iter()
            .filter(|b| b.kind == "text")
            .map(|b| b.text)
            .collect();
        if text.trim().is_empty() {
            return Err(ProviderError::EmptyCompletion { provider: self.name() });
        }
        Ok(text)
    }
}
