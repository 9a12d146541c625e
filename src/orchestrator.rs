use std::{sync::Arc, time::Duration};
use tracing::{debug, info, warn};

use crate::{
    brief::Brief,
    content::{
        count_placeholders, cycle_images, renumber_placeholders, GeneratedContent, MAX_IMAGES,
    },
    providers::{with_timeout, ContentProvider, ProviderError},
    templates,
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(90);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationMode {
    #[default]
    Provider,
    /// Skip the provider entirely.
    Template,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSource {
    Provider,
    Template,
}

pub struct Orchestrator {
    provider: Option<Arc<dyn ContentProvider>>,
    timeout: Duration,
}

impl Orchestrator {
    pub fn new(provider: Option<Arc<dyn ContentProvider>>) -> Self {
        Self { provider, timeout: DEFAULT_TIMEOUT }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn provider(&self) -> Option<&Arc<dyn ContentProvider>> {
        self.provider.as_ref()
    }

    /// Bound applied to every single provider call.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Always yields a usable bundle.
    pub async fn run(&self, brief: &Brief, mode: GenerationMode) -> GeneratedContent {
        self.run_detailed(brief, mode).await.0
    }

    pub async fn run_detailed(
        &self,
        brief: &Brief,
        mode: GenerationMode,
    ) -> (GeneratedContent, ContentSource) {
        let provider = match (&self.provider, mode) {
            (Some(p), GenerationMode::Provider) if p.has_credential() => p,
            _ => {
                debug!(brand = %brief.brand_name, "using template content");
                return (templates::generate(brief), ContentSource::Template);
            }
        };

        match self.generate_with(provider.as_ref(), brief).await {
            Ok(content) => {
                info!(
                    provider = provider.name(),
                    images = content.images.len(),
                    "provider content ready"
                );
                (content, ContentSource::Provider)
            }
            Err(e) => {
                warn!(
                    provider = provider.name(),
                    error = %e,
                    "provider run failed, falling back to template content"
                );
                (templates::generate(brief), ContentSource::Template)
            }
        }
    }

    async fn generate_with(
        &self,
        provider: &dyn ContentProvider,
        brief: &Brief,
    ) -> Result<GeneratedContent, ProviderError> {
        let raw = with_timeout(self.timeout, provider.generate_blog_post(brief)).await?;
        let (title, body) = split_title(&raw);
        let title = title.unwrap_or_else(|| fallback_title(brief));
        let body = renumber_placeholders(&body);

        let seo = with_timeout(self.timeout, provider.generate_seo_data(&body, brief)).await?;

        let prompts =
            with_timeout(self.timeout, provider.generate_image_prompts(&body, brief)).await?;
        let placeholders = count_placeholders(&body);
        if prompts.len() != placeholders {
            debug!(
                prompts = prompts.len(),
                placeholders,
                "image prompt count differs from placeholders"
            );
        }
        if placeholders > MAX_IMAGES {
            warn!(placeholders, max = MAX_IMAGES, "more placeholders than images");
        }
        let images = cycle_images(templates::category_images(&brief.category), placeholders);

        Ok(GeneratedContent {
            title,
            body,
            meta_description: seo.meta_description,
            extracted_keywords: seo.keywords,
            images,
            tone: brief.tone.clone(),
        })
    }
}

/// First non-blank line is the title (heading marks, a `Title:` label and
/// bold markers removed); the rest is the body.
pub fn split_title(raw: &str) -> (Option<String>, String) {
    let mut lines = raw.lines().skip_while(|l| l.trim().is_empty());
    let Some(first) = lines.next() else { return (None, String::new()) };

    let mut t = first.trim().trim_start_matches('#').trim();
    if let Some(rest) = t.strip_prefix("Title:") {
        t = rest.trim();
    }
    let t = strip_bold(t);

    let body = lines.collect::<Vec<_>>().join("\n").trim().to_string();
    ((!t.is_empty()).then(|| t.to_string()), body)
}

/// Removes a `**...**` wrapper only when it spans the whole line.
fn strip_bold(t: &str) -> &str {
    match t.strip_prefix("**").and_then(|s| s.strip_suffix("**")) {
        Some(inner) if !inner.contains("**") => inner.trim(),
        _ => t,
    }
}

pub fn fallback_title(brief: &Brief) -> String {
    format!(
        "{}: A {} {} Guide from {}",
        brief.topic.trim(),
        brief.tone,
        brief.category,
        brief.brand_name.trim(),
    )
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{content::placeholder_numbers, prompts::Prompt, providers::SeoData};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// Replies are matched on a marker in the user prompt.
    pub(crate) struct ScriptedProvider {
        pub blog: Result<String, u16>,
        pub seo: Result<String, u16>,
        pub images: Result<String, u16>,
        pub delay: Option<Duration>,
        pub calls: Mutex<Vec<&'static str>>,
    }

    impl ScriptedProvider {
        pub fn ok(blog: &str) -> Self {
            Self {
                blog: Ok(blog.to_string()),
                seo: Ok(
                    r#"{"metaDescription": "Real meta", "keywords": ["a", "A", "b"]}"#.to_string(),
                ),
                images: Ok(r#"["p1", "p2"]"#.to_string()),
                delay: None,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ContentProvider for ScriptedProvider {
        fn name(&self) -> &'static str {
            "scripted"
        }
        fn has_credential(&self) -> bool {
            true
        }

        async fn complete(&self, prompt: &Prompt) -> Result<String, ProviderError> {
            if let Some(d) = self.delay {
                tokio::time::sleep(d).await;
            }
            let (kind, reply) = if prompt.user.contains("metaDescription") {
                ("seo", &self.seo)
            } else if prompt.user.contains("image prompts") {
                ("images", &self.images)
            } else if prompt.user.contains("Create a comprehensive blog post") {
                ("blog", &self.blog)
            } else {
                ("other", &self.blog)
            };
            self.calls.lock().unwrap().push(kind);
            reply.clone().map_err(|status| ProviderError::Status {
                provider: "scripted",
                status,
                body: String::new(),
            })
        }
    }

    fn acme() -> Brief {
        Brief::new("Acme", "Technology", "AI adoption", "Professional")
    }

    const BLOG: &str = "\n# The Real Title\n\nIntro [IMAGE_PLACEHOLDER_2]\n## Part\nText IMAGE_PLACEHOLDER_5\nMore [IMAGE_PLACEHOLDER_7]\n";

    #[tokio::test]
    async fn no_provider_uses_template() {
        let brief = acme();
        let (c, src) = Orchestrator::new(None).run_detailed(&brief, GenerationMode::Provider).await;
        assert_eq!(src, ContentSource::Template);
        assert_eq!(c.tone, brief.tone);
        assert_eq!(placeholder_numbers(&c.body), vec![1, 2, 3, 4]);
        assert_eq!(c, templates::generate(&brief));
    }

    #[tokio::test]
    async fn template_mode_skips_provider() {
        let p = Arc::new(ScriptedProvider::ok(BLOG));
        let o = Orchestrator::new(Some(p.clone()));
        let (_, src) = o.run_detailed(&acme(), GenerationMode::Template).await;
        assert_eq!(src, ContentSource::Template);
        assert!(p.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn provider_success_assembles_bundle() {
        let p = Arc::new(ScriptedProvider::ok(BLOG));
        let (c, src) = Orchestrator::new(Some(p.clone()))
            .run_detailed(&acme(), GenerationMode::Provider)
            .await;
        assert_eq!(src, ContentSource::Provider);
        assert_eq!(c.title, "The Real Title");
        assert_eq!(placeholder_numbers(&c.body), vec![1, 2, 3]);
        assert_eq!(c.images.len(), 3);
        assert_eq!(c.meta_description, "Real meta");
        assert_eq!(c.extracted_keywords, vec!["a", "b"]);
        assert_eq!(*p.calls.lock().unwrap(), vec!["blog", "seo", "images"]);
    }

    #[tokio::test]
    async fn blog_failure_is_identical_to_template() {
        let mut p = ScriptedProvider::ok(BLOG);
        p.blog = Err(503);
        let brief = acme();
        let got = Orchestrator::new(Some(Arc::new(p))).run(&brief, GenerationMode::Provider).await;
        let expected = Orchestrator::new(None).run(&brief, GenerationMode::Provider).await;
        assert_eq!(got, expected);
    }

    #[tokio::test]
    async fn seo_transport_failure_discards_blog_text() {
        let mut p = ScriptedProvider::ok(BLOG);
        p.seo = Err(500);
        let brief = acme();
        let (c, src) = Orchestrator::new(Some(Arc::new(p)))
            .run_detailed(&brief, GenerationMode::Provider)
            .await;
        assert_eq!(src, ContentSource::Template);
        assert_eq!(c, templates::generate(&brief));
    }

    #[tokio::test]
    async fn unparseable_seo_keeps_blog_and_uses_seo_fallback() {
        let mut p = ScriptedProvider::ok(BLOG);
        p.seo = Ok("Sure! Here's a great description.".to_string());
        let brief = acme();
        let (c, src) = Orchestrator::new(Some(Arc::new(p)))
            .run_detailed(&brief, GenerationMode::Provider)
            .await;
        assert_eq!(src, ContentSource::Provider);
        assert_eq!(c.title, "The Real Title");
        let seo = SeoData::fallback(&brief);
        assert_eq!(c.meta_description, seo.meta_description);
        assert_eq!(c.extracted_keywords, seo.keywords);
    }

    #[tokio::test]
    async fn image_count_follows_placeholders_not_prompts() {
        let mut p = ScriptedProvider::ok("Title\nOnly [IMAGE_PLACEHOLDER_1] here");
        p.images = Ok(r#"["a", "b", "c", "d", "e"]"#.to_string());
        let c = Orchestrator::new(Some(Arc::new(p))).run(&acme(), GenerationMode::Provider).await;
        assert_eq!(c.images.len(), 1);
    }

    #[tokio::test]
    async fn image_failure_falls_back() {
        let mut p = ScriptedProvider::ok(BLOG);
        p.images = Err(502);
        let (_, src) = Orchestrator::new(Some(Arc::new(p)))
            .run_detailed(&acme(), GenerationMode::Provider)
            .await;
        assert_eq!(src, ContentSource::Template);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_provider_times_out_to_template() {
        let mut p = ScriptedProvider::ok(BLOG);
        p.delay = Some(Duration::from_secs(120));
        let o = Orchestrator::new(Some(Arc::new(p))).with_timeout(Duration::from_secs(5));
        let (c, src) = o.run_detailed(&acme(), GenerationMode::Provider).await;
        assert_eq!(src, ContentSource::Template);
        assert_eq!(c, templates::generate(&acme()));
    }

    #[test]
    fn split_title_strips_markers() {
        assert_eq!(
            split_title("\n\n## **Big News**\nline1\nline2\n"),
            (Some("Big News".into()), "line1\nline2".into())
        );
        assert_eq!(split_title("Title: Hello\nbody"), (Some("Hello".into()), "body".into()));
        assert_eq!(split_title("#\nbody"), (None, "body".into()));
        assert_eq!(split_title("   \n"), (None, String::new()));
    }

    #[test]
    fn split_title_keeps_inline_bold() {
        assert_eq!(split_title("**Bold** rest\nbody").0.as_deref(), Some("**Bold** rest"));
        assert_eq!(
            split_title("**Bold** and **more**\nbody").0.as_deref(),
            Some("**Bold** and **more**")
        );
        assert_eq!(split_title("Title: **Whole**\nbody").0.as_deref(), Some("Whole"));
    }

    #[tokio::test]
    async fn blank_title_uses_brief_fields() {
        let p = ScriptedProvider::ok("###\nBody [IMAGE_PLACEHOLDER_1]");
        let c = Orchestrator::new(Some(Arc::new(p))).run(&acme(), GenerationMode::Provider).await;
        assert_eq!(c.title, "AI adoption: A Professional Technology Guide from Acme");
    }
}
