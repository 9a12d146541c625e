//! Template content used when no provider is available or a provider run
//! fails. Everything here is a pure function of the [`Brief`].

use crate::{
    brief::Brief,
    content::{count_placeholders, cycle_images, dedupe_keywords, placeholder, GeneratedContent},
};

pub const TEMPLATE_KEYWORD_CAP: usize = 8;

const TONE_TITLES: &[(&str, &str)] = &[
    ("Professional", "Expert Guide"),
    ("Casual", "Ultimate Guide"),
    ("Empathetic", "Caring Guide"),
    ("Authoritative", "Complete Guide"),
    ("Friendly", "Friendly Guide"),
    ("Inspirational", "Transformative Guide"),
    ("Conversational", "Simple Guide"),
    ("Educational", "Learning Guide"),
];
const DEFAULT_TONE_TITLE: &str = "Complete Guide";

const CATEGORY_TITLES: &[(&str, &str)] = &[
    ("Wellness & Health", "Wellness and Healthy Living"),
    ("Furniture & Home", "Beautiful Home Design"),
    ("Dating & Relationships", "Meaningful Relationships"),
    ("Technology", "Modern Technology Solutions"),
    ("Fashion & Beauty", "Style and Beauty"),
    ("Food & Beverage", "Culinary Excellence"),
    ("Finance", "Financial Success"),
    ("Education", "Learning and Growth"),
    ("Travel & Hospitality", "Memorable Travel Experiences"),
    ("Automotive", "Automotive Excellence"),
    ("Other", "Success in Your Industry"),
];
const DEFAULT_CATEGORY_TITLE: &str = "Your Industry";

pub struct TonePhrases {
    pub intro: &'static str,
    pub transition: &'static str,
    pub conclusion: &'static str,
}

const PROFESSIONAL: TonePhrases = TonePhrases {
    intro: "In today's competitive marketplace, businesses and consumers alike are seeking reliable solutions that deliver exceptional value.",
    transition: "Industry experts recognize that",
    conclusion: "To summarize, implementing these strategic approaches will",
};

const TONE_PHRASES: &[(&str, TonePhrases)] = &[
    ("Professional", PROFESSIONAL),
    ("Casual", TonePhrases {
        intro: "Hey there! Let's dive into something that's been on everyone's mind lately.",
        transition: "Here's the thing:",
        conclusion: "So there you have it!",
    }),
    ("Empathetic", TonePhrases {
        intro: "We understand that navigating this space can feel overwhelming, and you're not alone in facing these challenges.",
        transition: "We recognize that",
        conclusion: "Remember, every journey begins with a single step, and",
    }),
    ("Authoritative", TonePhrases {
        intro: "Based on extensive research and industry analysis, the following insights will transform your understanding of this domain.",
        transition: "Data clearly demonstrates that",
        conclusion: "The evidence conclusively shows that",
    }),
    ("Friendly", TonePhrases {
        intro: "Welcome! We're excited to share some fantastic insights that we think you'll find really valuable.",
        transition: "What we've discovered is that",
        conclusion: "We hope this has been helpful, and",
    }),
    ("Inspirational", TonePhrases {
        intro: "Imagine a world where your goals aren't just dreams, but achievable realities waiting to be unlocked.",
        transition: "The transformation happens when",
        conclusion: "Your journey toward success starts now, and",
    }),
    ("Conversational", TonePhrases {
        intro: "Let's have a chat about something that might just change how you think about this topic.",
        transition: "You know what's interesting?",
        conclusion: "What do you think? We'd love to hear your thoughts, and",
    }),
    ("Educational", TonePhrases {
        intro: "This comprehensive overview will provide you with the fundamental knowledge needed to excel in this area.",
        transition: "It's important to understand that",
        conclusion: "To reinforce these key concepts,",
    }),
];

const CATEGORY_IMAGES: &[(&str, &[&str])] = &[
    ("Wellness & Health", &[
        "https://images.unsplash.com/photo-1571019613454-1cb2f99b2d8b?w=500&h=300&fit=crop",
        "https://images.unsplash.com/photo-1506126613408-eca07ce68773?w=500&h=300&fit=crop",
        "https://images.unsplash.com/photo-1544367567-0f2fcb009e0b?w=500&h=300&fit=crop",
    ]),
    ("Furniture & Home", &[
        "https://images.unsplash.com/photo-1586023492125-27b2c045efd7?w=500&h=300&fit=crop",
        "https://images.unsplash.com/photo-1567538096630-e0c55bd6374c?w=500&h=300&fit=crop",
        "https://images.unsplash.com/photo-1555041469-a586c61ea9bc?w=500&h=300&fit=crop",
    ]),
    ("Technology", &[
        "https://images.unsplash.com/photo-1518709268805-4e9042af2176?w=500&h=300&fit=crop",
        "https://images.unsplash.com/photo-1581091226825-a6a2a5aee158?w=500&h=300&fit=crop",
        "https://images.unsplash.com/photo-1498050108023-c5249f4df085?w=500&h=300&fit=crop",
    ]),
    ("Fashion & Beauty", &[
        "https://images.unsplash.com/photo-1445205170230-053b83016050?w=500&h=300&fit=crop",
        "https://images.unsplash.com/photo-1483985988355-763728e1935b?w=500&h=300&fit=crop",
        "https://images.unsplash.com/photo-1524863479829-916d8e77f114?w=500&h=300&fit=crop",
    ]),
];
const DEFAULT_IMAGES: &[&str] = &[
    "https://images.unsplash.com/photo-1460925895917-afdab827c52f?w=500&h=300&fit=crop",
    "https://images.unsplash.com/photo-1557804506-669a67965ba0?w=500&h=300&fit=crop",
    "https://images.unsplash.com/photo-1553028826-f4804a6dba3b?w=500&h=300&fit=crop",
];

const FILLER_KEYWORDS: &[&str] = &["expert guide", "best practices", "tips", "strategies"];

fn lookup<'a, T>(table: &'a [(&str, T)], key: &str) -> Option<&'a T> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
}

pub fn tone_title(tone: &str) -> &'static str {
    lookup(TONE_TITLES, tone).copied().unwrap_or(DEFAULT_TONE_TITLE)
}

pub fn category_title(category: &str) -> &'static str {
    lookup(CATEGORY_TITLES, category).copied().unwrap_or(DEFAULT_CATEGORY_TITLE)
}

pub fn tone_phrases(tone: &str) -> &'static TonePhrases {
    lookup(TONE_PHRASES, tone).unwrap_or(&PROFESSIONAL)
}

/// Image library for a category, falling back to the generic set.
pub fn category_images(category: &str) -> &'static [&'static str] {
    lookup(CATEGORY_IMAGES, category).copied().unwrap_or(DEFAULT_IMAGES)
}

/// Builds a complete bundle from the brief alone. Same brief, same output.
pub fn generate(brief: &Brief) -> GeneratedContent {
    let body = body(brief);
    GeneratedContent {
        title: title(brief),
        images: cycle_images(category_images(&brief.category), count_placeholders(&body)),
        meta_description: meta_description(brief),
        extracted_keywords: keywords(brief),
        body,
        tone: brief.tone.clone(),
    }
}

pub fn title(brief: &Brief) -> String {
    format!(
        "The {} to {} in {} with {}",
        tone_title(&brief.tone),
        brief.topic.trim(),
        category_title(&brief.category),
        brief.brand_name.trim(),
    )
}

fn body(brief: &Brief) -> String {
    let style = tone_phrases(&brief.tone);
    let brand = brief.brand_name.trim();
    let topic = brief.topic.trim();
    let category = brief.category.to_lowercase();
    let audience = brief.audience_or("modern consumers");

    let focus = match brief.keyword_list() {
        ks if ks.is_empty() => String::new(),
        ks => format!("\n\nKey areas of focus include: {}.", ks.join(", ")),
    };
    let closing = match &brief.website_url {
        Some(url) => format!("Visit us at {url} to learn more about how we can help you succeed."),
        None => "Contact us today to discover how we can help you succeed.".to_string(),
    };

    format!(
        "## Introduction\n\n\
{intro}\n\n\
When it comes to {category}, {brand} stands out as a leader in delivering solutions that truly resonate with {audience}. This guide explores {topic} and what it means for you.\n\n\
{img1}\n\n\
## Understanding {topic}\n\n\
{transition} the landscape has evolved significantly, and what worked yesterday may not be sufficient for tomorrow's challenges. {brand} recognizes this evolution and has adapted its approach to {topic} accordingly.{focus}\n\n\
{img2}\n\n\
## Proven Strategies for {topic}\n\n\
Our methodology centers on three core principles:\n\n\
1. **Innovation**: Staying ahead of industry trends and continuously improving our offerings\n\
2. **Quality**: Ensuring every interaction meets the highest standards\n\
3. **Customer-Centricity**: Putting your needs and goals at the heart of everything we do\n\n\
{img3}\n\n\
## Taking {topic} Further\n\n\
{transition} consistency and reliability are paramount once the basics are in place. {brand} has built its reputation on delivering measurable results in {category} while maintaining the highest levels of service.\n\n\
{img4}\n\n\
## Conclusion\n\n\
{conclusion} taking action today will position you for long-term success. {brand} is here to support you every step of the way.\n\n\
Ready to get started? {closing}",
        intro = style.intro,
        transition = style.transition,
        conclusion = style.conclusion,
        img1 = placeholder(1),
        img2 = placeholder(2),
        img3 = placeholder(3),
        img4 = placeholder(4),
    )
}

fn meta_description(brief: &Brief) -> String {
    format!(
        "Discover how {} approaches {} in {} with expert insights and proven strategies. Start your journey today.",
        brief.brand_name.trim(),
        brief.topic.trim().to_lowercase(),
        brief.category.to_lowercase(),
    )
}

fn keywords(brief: &Brief) -> Vec<String> {
    let base = [
        brief.brand_name.to_lowercase(),
        brief.category.to_lowercase(),
        brief.topic.to_lowercase(),
    ];
    let targets = brief.keyword_list().into_iter().map(|k| k.to_lowercase());
    let fillers = FILLER_KEYWORDS.iter().map(|s| s.to_string());
    dedupe_keywords(base.into_iter().chain(targets).chain(fillers), TEMPLATE_KEYWORD_CAP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        brief::{CATEGORIES, TONES},
        content::placeholder_numbers,
    };
    use pretty_assertions::assert_eq;

    fn acme() -> Brief {
        Brief::new("Acme", "Technology", "AI adoption", "Professional")
    }

    #[test]
    fn acme_technology_scenario() {
        let c = generate(&acme());
        assert!(c.title.contains("Acme"));
        assert!(c.title.contains("Modern Technology Solutions"));
        assert_eq!(placeholder_numbers(&c.body), vec![1, 2, 3, 4]);
        assert_eq!(c.images.len(), 4);
        let tech = category_images("Technology");
        assert!(c.images.iter().all(|u| tech.contains(&u.as_str())));
        assert_eq!(c.images[3], c.images[0]);
        assert_eq!(c.tone, "Professional");
    }

    #[test]
    fn images_track_markers_for_every_tone_and_category() {
        for &category in CATEGORIES {
            for &tone in TONES {
                let c = generate(&Brief::new("Acme", category, "growth", tone));
                assert_eq!(c.images.len(), count_placeholders(&c.body), "{category}/{tone}");
                assert!(c.unresolved_placeholders().is_empty(), "{category}/{tone}");
            }
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let mut b = acme();
        b.keywords = "cloud, automation".into();
        b.website_url = Some("https://acme.example".into());
        assert_eq!(generate(&b), generate(&b));
    }

    #[test]
    fn unknown_keys_use_defaults() {
        let b = Brief::new("Zed", "Underwater Basketry", "weaving", "Grumpy");
        let c = generate(&b);
        assert_eq!(c.title, "The Complete Guide to weaving in Your Industry with Zed");
        assert_eq!(c.images, cycle_images(DEFAULT_IMAGES, 4));
        assert!(c.body.starts_with("## Introduction\n\nIn today's competitive marketplace"));
    }

    #[test]
    fn keywords_are_deduped_and_capped() {
        let mut b = acme();
        b.keywords = "Acme, TECHNOLOGY, machine learning, cloud, data, tips, edge".into();
        let c = generate(&b);
        assert!(c.extracted_keywords.len() <= TEMPLATE_KEYWORD_CAP);
        assert_eq!(
            &c.extracted_keywords[..4],
            &["acme", "technology", "ai adoption", "machine learning"]
        );
        let mut lower: Vec<_> = c.extracted_keywords.iter().map(|k| k.to_lowercase()).collect();
        lower.sort();
        lower.dedup();
        assert_eq!(lower.len(), c.extracted_keywords.len());
    }

    #[test]
    fn tone_changes_phrasing() {
        let casual = generate(&acme().with_tone("Casual"));
        assert!(casual.body.contains("Hey there!"));
        assert!(casual.title.starts_with("The Ultimate Guide"));
        assert_eq!(casual.tone, "Casual");
    }
}
