use async_trait::async_trait;
use serde::Deserialize;
use std::{future::Future, time::Duration};
use thiserror::Error;

use crate::{
    brief::Brief,
    content::dedupe_keywords,
    prompts::{self, EnglishVariant, Prompt},
};

/// Cap on keywords taken from a provider's SEO reply.
pub const MAX_SEO_KEYWORDS: usize = 12;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider}: no API key configured")]
    MissingCredential { provider: &'static str },
    #[error("{provider}: HTTP {status}: {body}")]
    Status { provider: &'static str, status: u16, body: String },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("provider call timed out after {0:?}")]
    Timeout(Duration),
    #[error("{provider}: reply contained no text")]
    EmptyCompletion { provider: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeoData {
    #[serde(rename = "metaDescription")]
    pub meta_description: String,
    pub keywords: Vec<String>,
}

impl SeoData {
    /// Metadata derived from the brief alone.
    pub fn fallback(brief: &Brief) -> Self {
        let brand = brief.brand_name.trim();
        let category = brief.category.to_lowercase();
        let topic = brief.topic.trim().to_lowercase();
        Self {
            meta_description: format!(
                "Discover expert {topic} insights from {brand}. Get actionable tips and strategies to succeed in {category}."
            ),
            keywords: dedupe_keywords(
                [
                    brand.to_lowercase(),
                    category,
                    topic,
                    "expert tips".to_string(),
                    "guide".to_string(),
                    "strategies".to_string(),
                    "best practices".to_string(),
                ],
                MAX_SEO_KEYWORDS,
            ),
        }
    }
}

/// Drops a surrounding markdown code fence, if any.
fn strip_code_fence(raw: &str) -> &str {
    let t = raw.trim();
    let Some(rest) = t.strip_prefix("```") else { return t };
    let rest = rest.split_once('\n').map(|(_, r)| r).unwrap_or("");
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

pub fn parse_seo_reply(raw: &str) -> Result<SeoData, serde_json::Error> {
    let mut seo: SeoData = serde_json::from_str(strip_code_fence(raw))?;
    seo.meta_description = seo.meta_description.trim().to_string();
    seo.keywords = dedupe_keywords(seo.keywords, MAX_SEO_KEYWORDS);
    if seo.meta_description.is_empty() || seo.keywords.is_empty() {
        return Err(serde::de::Error::custom("empty metaDescription or keywords"));
    }
    Ok(seo)
}

pub fn parse_image_prompts(raw: &str) -> Result<Vec<String>, serde_json::Error> {
    let prompts: Vec<String> = serde_json::from_str(strip_code_fence(raw))?;
    let prompts: Vec<String> = prompts
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect();
    if prompts.is_empty() {
        return Err(serde::de::Error::custom("no image prompts"));
    }
    Ok(prompts)
}

pub async fn with_timeout<T>(
    duration: Duration,
    fut: impl Future<Output = Result<T, ProviderError>>,
) -> Result<T, ProviderError> {
    match tokio::time::timeout(duration, fut).await {
        Ok(res) => res,
        Err(_) => Err(ProviderError::Timeout(duration)),
    }
}

/// A text-generation backend. Bindings implement the transport in
/// [`ContentProvider::complete`]; the five content operations are shared.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn has_credential(&self) -> bool;

    async fn complete(&self, prompt: &Prompt) -> Result<String, ProviderError>;

    /// Raw blog text, title usually on the first line.
    async fn generate_blog_post(&self, brief: &Brief) -> Result<String, ProviderError> {
        self.complete(&prompts::blog_post(brief)).await
    }

    async fn generate_seo_data(&self, blog: &str, brief: &Brief) -> Result<SeoData, ProviderError> {
        let raw = self.complete(&prompts::seo_data(blog, brief)).await?;
        Ok(parse_seo_reply(&raw).unwrap_or_else(|e| {
            tracing::debug!(
                provider = self.name(),
                error = %e,
                "SEO reply not parseable, using fallback"
            );
            SeoData::fallback(brief)
        }))
    }

    async fn localize_content(
        &self,
        text: &str,
        variant: EnglishVariant,
    ) -> Result<String, ProviderError> {
        self.complete(&prompts::localize(text, variant)).await
    }

    async fn humanize_content(&self, text: &str) -> Result<String, ProviderError> {
        self.complete(&prompts::humanize(text)).await
    }

    async fn generate_image_prompts(
        &self,
        blog: &str,
        brief: &Brief,
    ) -> Result<Vec<String>, ProviderError> {
        let raw = self.complete(&prompts::image_prompts(blog, brief)).await?;
        Ok(parse_image_prompts(&raw).unwrap_or_else(|e| {
            tracing::debug!(
                provider = self.name(),
                error = %e,
                "image prompt reply not parseable, using fallback"
            );
            prompts::fallback_image_prompts(brief)
        }))
    }
}

/// Returns the body of a non-2xx response as a `Status` error.
pub(crate) async fn check_status(
    provider: &'static str,
    resp: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ProviderError::Status { provider, status: status.as_u16(), body })
}
