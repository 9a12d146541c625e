use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_WORD_COUNT: u32 = 300;
pub const MAX_WORD_COUNT: u32 = 2000;
pub const DEFAULT_WORD_COUNT: u32 = 800;

pub const CATEGORIES: &[&str] = &[
    "Wellness & Health",
    "Furniture & Home",
    "Dating & Relationships",
    "Technology",
    "Fashion & Beauty",
    "Food & Beverage",
    "Finance",
    "Education",
    "Travel & Hospitality",
    "Automotive",
    "Other",
];

pub const TONES: &[&str] = &[
    "Professional",
    "Casual",
    "Empathetic",
    "Authoritative",
    "Friendly",
    "Inspirational",
    "Conversational",
    "Educational",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BriefError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("unknown category {0:?}")]
    UnknownCategory(String),
    #[error("unknown tone {0:?}")]
    UnknownTone(String),
    #[error("website URL {url:?} is not valid: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// What the user asked for. Built once per submission and never mutated;
/// tone regeneration goes through [`Brief::with_tone`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brief {
    pub brand_name: String,
    #[serde(default)]
    pub website_url: Option<String>,
    pub category: String,
    pub topic: String,
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub target_audience: String,
    pub tone: String,
    #[serde(default)]
    pub reference_urls: String,
    #[serde(default = "default_word_count")]
    pub word_count: u32,
}

fn default_word_count() -> u32 {
    DEFAULT_WORD_COUNT
}

impl Brief {
    pub fn new(
        brand_name: impl Into<String>,
        category: impl Into<String>,
        topic: impl Into<String>,
        tone: impl Into<String>,
    ) -> Self {
        Self {
            brand_name: brand_name.into(),
            website_url: None,
            category: category.into(),
            topic: topic.into(),
            keywords: String::new(),
            target_audience: String::new(),
            tone: tone.into(),
            reference_urls: String::new(),
            word_count: DEFAULT_WORD_COUNT,
        }
    }

    /// Checks required fields and enumerations, and clamps the word count.
    pub fn validated(mut self) -> Result<Self, BriefError> {
        if self.brand_name.trim().is_empty() {
            return Err(BriefError::Missing("brand name"));
        }
        if self.topic.trim().is_empty() {
            return Err(BriefError::Missing("topic"));
        }
        if self.category.trim().is_empty() {
            return Err(BriefError::Missing("category"));
        }
        if self.tone.trim().is_empty() {
            return Err(BriefError::Missing("tone"));
        }

        if !CATEGORIES.contains(&self.category.as_str()) {
            return Err(BriefError::UnknownCategory(self.category));
        }
        if !TONES.contains(&self.tone.as_str()) {
            return Err(BriefError::UnknownTone(self.tone));
        }

        self.website_url = match self.website_url.take() {
            Some(url) if url.trim().is_empty() => None,
            Some(url) => {
                let url = url.trim().to_string();
                if let Err(e) = reqwest::Url::parse(&url) {
                    return Err(BriefError::InvalidUrl { url, reason: e.to_string() });
                }
                Some(url)
            }
            None => None,
        };

        self.word_count = self.word_count.clamp(MIN_WORD_COUNT, MAX_WORD_COUNT);
        Ok(self)
    }

    /// A copy of this brief with only the tone replaced.
    pub fn with_tone(&self, tone: impl Into<String>) -> Self {
        Self { tone: tone.into(), ..self.clone() }
    }

    /// Target keywords split on commas, trimmed, blanks dropped.
    pub fn keyword_list(&self) -> Vec<String> {
        self.keywords
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn reference_url_list(&self) -> Vec<&str> {
        self.reference_urls.lines().map(str::trim).filter(|l| !l.is_empty()).collect()
    }

    pub fn audience_or(&self, default: &'static str) -> &str {
        let a = self.target_audience.trim();
        if a.is_empty() { default } else { a }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acme() -> Brief {
        Brief::new("Acme", "Technology", "AI adoption", "Professional")
    }

    #[test]
    fn valid_brief_passes_and_clamps_word_count() {
        let mut b = acme();
        b.word_count = 5000;
        let b = b.validated().unwrap();
        assert_eq!(b.word_count, MAX_WORD_COUNT);

        let mut b = acme();
        b.word_count = 10;
        assert_eq!(b.validated().unwrap().word_count, MIN_WORD_COUNT);
    }

    #[test]
    fn missing_fields_are_rejected() {
        let mut b = acme();
        b.brand_name = "  ".into();
        assert_eq!(b.validated(), Err(BriefError::Missing("brand name")));

        let mut b = acme();
        b.topic.clear();
        assert_eq!(b.validated(), Err(BriefError::Missing("topic")));
    }

    #[test]
    fn unknown_enumerations_are_rejected() {
        let mut b = acme();
        b.category = "Space Mining".into();
        assert!(matches!(b.validated(), Err(BriefError::UnknownCategory(_))));

        let mut b = acme();
        b.tone = "Snarky".into();
        assert!(matches!(b.validated(), Err(BriefError::UnknownTone(_))));
    }

    #[test]
    fn website_url_must_parse_when_present() {
        let mut b = acme();
        b.website_url = Some("not a url".into());
        assert!(matches!(b.validated(), Err(BriefError::InvalidUrl { .. })));

        let mut b = acme();
        b.website_url = Some("".into());
        assert_eq!(b.validated().unwrap().website_url, None);

        let mut b = acme();
        b.website_url = Some(" https://acme.example ".into());
        assert_eq!(b.validated().unwrap().website_url.as_deref(), Some("https://acme.example"));
    }

    #[test]
    fn with_tone_replaces_only_tone() {
        let mut b = acme();
        b.keywords = "ai, ml".into();
        b.word_count = 1200;
        let c = b.with_tone("Casual");
        assert_eq!(c.tone, "Casual");
        assert_eq!(Brief { tone: b.tone.clone(), ..c }, b);
    }

    #[test]
    fn deserializes_camel_case_with_defaults() {
        let yaml = "brandName: Acme\ncategory: Technology\ntopic: AI adoption\ntone: Casual\n";
        let b: Brief = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(b.word_count, DEFAULT_WORD_COUNT);
        assert!(b.keyword_list().is_empty());
    }

    #[test]
    fn keyword_list_trims_and_drops_blanks() {
        let mut b = acme();
        b.keywords = " cloud ,, AI tools ,".into();
        assert_eq!(b.keyword_list(), vec!["cloud", "AI tools"]);
    }
}
