use crate::brief::Brief;
use std::fmt;

/// Characters of blog text sent along with the SEO request.
pub const SEO_PREVIEW_CHARS: usize = 800;
/// Characters of blog text sent along with the image-prompt request.
pub const IMAGE_PREVIEW_CHARS: usize = 1000;

/// A persona plus the concrete instruction. Bindings decide how the two are
/// put on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum EnglishVariant {
    Uk,
    Au,
}

impl fmt::Display for EnglishVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self { Self::Uk => "UK", Self::Au => "AU" })
    }
}

fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() { default } else { value.trim() }
}

const WRITER_PERSONA: &str = "You are a world-class content writer and marketing manager with 15+ years of experience. \
You specialize in creating engaging, SEO-optimized blog posts that drive conversions and build brand authority. \
Your writing is compelling, informative, and perfectly tailored to the brand's voice and target audience.

Key principles:
- Use storytelling to engage readers
- Include actionable insights and practical tips
- Optimize for SEO naturally without keyword stuffing
- Structure content for easy scanning and reading
- Include strategic calls-to-action";

pub fn blog_post(brief: &Brief) -> Prompt {
    let general_audience = format!("General audience interested in {}", brief.category);
    let references = brief.reference_url_list();
    let user = format!(
        "Create a comprehensive blog post for {brand} with the following specifications:

BRAND INFORMATION:
- Brand: {brand}
- Industry: {category}
- Website: {website}

CONTENT REQUIREMENTS:
- Topic: {topic}
- Word Count: {words} words
- Tone: {tone}
- Target Audience: {audience}
- Target Keywords: {keywords}
- Reference URLs: {references}

DELIVERABLES:
1. Put an engaging, SEO-optimized title that includes the main keyword on the first line
2. Write a {words}-word blog post with:
   - A compelling introduction that hooks the reader
   - 5-7 main sections with descriptive H2 subheadings
   - Practical tips, insights, and actionable advice
   - Natural use of the target keywords
   - [IMAGE_PLACEHOLDER_1], [IMAGE_PLACEHOLDER_2], ... markers where images belong (minimum 4 images, numbered from 1)
   - A strong conclusion with a clear call-to-action
3. Match the {tone} tone throughout
4. Position {brand} as a trusted authority in {category}

Format the response as a complete, publication-ready blog post.",
        brand = brief.brand_name.trim(),
        category = brief.category,
        website = brief.website_url.as_deref().unwrap_or("Not provided"),
        topic = brief.topic.trim(),
        words = brief.word_count,
        tone = brief.tone,
        audience = or_default(&brief.target_audience, &general_audience),
        keywords = or_default(&brief.keywords, "Not specified"),
        references = if references.is_empty() {
            "None provided".to_string()
        } else {
            references.join(", ")
        },
    );
    Prompt { system: WRITER_PERSONA.to_string(), user }
}

pub fn seo_data(blog: &str, brief: &Brief) -> Prompt {
    let system = "You are an SEO expert and digital marketing specialist. Generate metadata that helps content rank \
higher and attract clicks: a compelling meta description and the most relevant, high-value keywords.";
    let user = format!(
        "Based on this blog content for {brand} in the {category} industry, generate optimal SEO metadata:

BLOG CONTENT PREVIEW:
{preview}...

BRAND CONTEXT:
- Brand: {brand}
- Industry: {category}
- Target Keywords: {keywords}
- Target Audience: {audience}

GENERATE:
1. A compelling meta description (150-160 characters) that includes the primary keyword and encourages clicks
2. 10-12 high-value SEO keywords: primary, long-tail, industry-specific and intent-based

Respond with JSON only:
{{\"metaDescription\": \"...\", \"keywords\": [\"keyword1\", \"keyword2\"]}}",
        brand = brief.brand_name.trim(),
        category = brief.category,
        preview = preview(blog, SEO_PREVIEW_CHARS),
        keywords = or_default(&brief.keywords, "Not specified"),
        audience = or_default(&brief.target_audience, "Not specified"),
    );
    Prompt { system: system.to_string(), user }
}

pub fn localize(text: &str, variant: EnglishVariant) -> Prompt {
    let system = format!(
        "You are a professional localization expert specializing in {variant} English. Convert content to authentic \
{variant} English by adjusting spelling (color to colour, organize to organise), terminology (elevator to lift), \
cultural references, currency and measurement units, and idiomatic expressions. Keep the original tone, structure \
and marketing message while making it feel natural to {variant} readers."
    );
    Prompt {
        system,
        user: format!("Convert this content to authentic {variant} English:\n\n{text}"),
    }
}

pub fn humanize(text: &str) -> Prompt {
    let system = "You are an expert content editor who makes AI-generated content sound natural, emotional and human. \
Add personality and emotional depth, vary sentence structure and rhythm, use conversational transitions, rhetorical \
questions and direct reader address. Keep the core message and structure.";
    Prompt {
        system: system.to_string(),
        user: format!(
            "Make this content sound more natural, engaging, and human while maintaining its core message:\n\n{text}"
        ),
    }
}

pub fn image_prompts(blog: &str, brief: &Brief) -> Prompt {
    let system = "You are a creative director specializing in visual content strategy. Generate detailed, specific \
image prompts that will create compelling visuals for blog content.";
    let user = format!(
        "Based on this blog content about \"{topic}\" for {brand} in the {category} industry, generate 4-5 specific image prompts:

BLOG CONTENT:
{preview}...

BRAND CONTEXT:
- Industry: {category}
- Tone: {tone}
- Target Audience: {audience}

Prompts should be relevant to the content sections, professional, on-brand and match the {tone} tone.

Respond with a JSON array of strings only:
[\"prompt1\", \"prompt2\", \"prompt3\", \"prompt4\"]",
        topic = brief.topic.trim(),
        brand = brief.brand_name.trim(),
        category = brief.category,
        preview = preview(blog, IMAGE_PREVIEW_CHARS),
        tone = brief.tone,
        audience = or_default(&brief.target_audience, "Not specified"),
    );
    Prompt { system: system.to_string(), user }
}

/// Prompts used when the provider's image-prompt reply cannot be parsed.
pub fn fallback_image_prompts(brief: &Brief) -> Vec<String> {
    let category = &brief.category;
    let topic = brief.topic.trim();
    vec![
        format!("Professional {category} setting, modern and clean"),
        format!("{topic} concept visualization, high quality"),
        format!(
            "People using {category} products, lifestyle photography, {} mood",
            brief.tone.to_lowercase()
        ),
        format!("Abstract representation of {topic}, minimalist design"),
    ]
}
