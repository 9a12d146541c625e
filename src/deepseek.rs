use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    config::ProviderCfg,
    prompts::Prompt,
    providers::{check_status, ContentProvider, ProviderError},
};

pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com/v1";
pub const DEFAULT_MODEL: &str = "deepseek-chat";

/// OpenAI-style chat completions binding, as served by DeepSeek.
pub struct DeepSeekProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}

impl DeepSeekProvider {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 4000,
            temperature: 0.7,
            top_p: 0.9,
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

#[derive(Serialize)]
struct ChatReq<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}
#[derive(Serialize)]
struct Msg<'a> { role: &'a str, content: &'a str }
#[derive(Deserialize)]
struct ChatResp { choices: Vec<Choice> }
#[derive(Deserialize)]
struct Choice { message: MsgOwned }
#[derive(Deserialize)]
struct MsgOwned { content: Option<String> }

#[async_trait]
impl ContentProvider for DeepSeekProvider {
    fn name(&self) -> &'static str {
        "deepseek"
    }

    fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(&self, prompt: &Prompt) -> Result<String, ProviderError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingCredential { provider: self.name() })?;
        let req = ChatReq {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            top_p: self.top_p,
            messages: vec![
                Msg { role: "system", content: &prompt.system },
                Msg { role: "user", content: &prompt.user },
            ],
        };
        tracing::debug!(provider = self.name(), model = %self.model, "sending chat completion");
        let resp = self.client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(key)
            .json(&req)
            .send()
            .await?;
        let resp: ChatResp = check_status(self.name(), resp).await?.json().await?;
        resp.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|t| !t.trim().is_empty())
            .ok_or(ProviderError::EmptyCompletion { provider: self.name() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        matchers::{bearer_token, body_partial_json, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn prompt() -> Prompt {
        Prompt { system: "sys".into(), user: "hello".into() }
    }

    #[tokio::test]
    async fn sends_system_and_user_messages() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(bearer_token("sk-test"))
            .and(body_partial_json(json!({
                "model": "deepseek-chat",
                "max_tokens": 4000,
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "hello"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "# Title\nBody"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let p = DeepSeekProvider::new(Some("sk-test".into())).with_base_url(server.uri());
        assert_eq!(p.complete(&prompt()).await.unwrap(), "# Title\nBody");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let p = DeepSeekProvider::new(Some("sk-bad".into())).with_base_url(server.uri());
        let err = p.complete(&prompt()).await.unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Status { status: 401, ref body, .. } if body == "bad key"
        ));
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let p = DeepSeekProvider::new(Some("   ".into())).with_base_url(server.uri());
        assert!(!p.has_credential());
        assert!(matches!(
            p.complete(&prompt()).await,
            Err(ProviderError::MissingCredential { .. })
        ));
    }

    #[tokio::test]
    async fn empty_choices_are_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let p = DeepSeekProvider::new(Some("k".into())).with_base_url(server.uri());
        assert!(matches!(p.complete(&prompt()).await, Err(ProviderError::EmptyCompletion { .. })));
    }
}
