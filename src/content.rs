use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, sync::OnceLock};

/// Upper bound on image references attached to one bundle.
pub const MAX_IMAGES: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    pub title: String,
    pub body: String,
    pub meta_description: String,
    pub extracted_keywords: Vec<String>,
    pub images: Vec<String>,
    pub tone: String,
}

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[?IMAGE_PLACEHOLDER_(\d+)\]?").expect("static regex"))
}

pub fn placeholder(n: usize) -> String {
    format!("[IMAGE_PLACEHOLDER_{n}]")
}

/// Distinct placeholder numbers in order of first appearance.
pub fn placeholder_numbers(body: &str) -> Vec<u64> {
    let mut seen = HashSet::new();
    placeholder_re()
        .captures_iter(body)
        .filter_map(|c| c[1].parse::<u64>().ok())
        .filter(|n| seen.insert(*n))
        .collect()
}

pub fn count_placeholders(body: &str) -> usize {
    placeholder_numbers(body).len()
}

/// Rewrites every marker into canonical form, numbered 1..k by first
/// appearance. Repeated markers keep sharing one number.
pub fn renumber_placeholders(body: &str) -> String {
    let order = placeholder_numbers(body);
    placeholder_re()
        .replace_all(body, |c: &Captures| {
            let pos = c[1]
                .parse::<u64>()
                .ok()
                .and_then(|n| order.iter().position(|o| *o == n))
                .unwrap_or(0);
            placeholder(pos + 1)
        })
        .into_owned()
}

/// Trims, drops blanks, removes case-insensitive duplicates (first spelling
/// wins) and stops at `cap` entries.
pub fn dedupe_keywords<I, S>(keywords: I, cap: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    keywords
        .into_iter()
        .map(|k| k.as_ref().trim().to_string())
        .filter(|k| !k.is_empty())
        .filter(|k| seen.insert(k.to_lowercase()))
        .take(cap)
        .collect()
}

/// Picks `count` entries from `library`, cycling when it is shorter.
pub fn cycle_images(library: &[&str], count: usize) -> Vec<String> {
    if library.is_empty() {
        return Vec::new();
    }
    library.iter().cycle().take(count.min(MAX_IMAGES)).map(|s| s.to_string()).collect()
}

impl GeneratedContent {
    /// Placeholder numbers in the body that have no image to show.
    pub fn unresolved_placeholders(&self) -> Vec<u64> {
        placeholder_numbers(&self.body)
            .into_iter()
            .filter(|n| *n == 0 || *n as usize > self.images.len())
            .collect()
    }

    /// Body with markers swapped for markdown images. Markers without an
    /// image are removed and reported.
    pub fn render_markdown(&self) -> String {
        let unresolved = self.unresolved_placeholders();
        if !unresolved.is_empty() {
            tracing::warn!(
                ?unresolved,
                images = self.images.len(),
                "dropping placeholders without images"
            );
        }
        placeholder_re()
            .replace_all(&self.body, |c: &Captures| {
                let idx = c[1].parse::<usize>().unwrap_or(0);
                match idx.checked_sub(1).and_then(|i| self.images.get(i)) {
                    Some(url) => format!("![Illustration {idx}]({url})"),
                    None => String::new(),
                }
            })
            .into_owned()
    }

    /// Plain-text document offered for download.
    pub fn export_text(&self) -> String {
        format!(
            "Title: {}\n\nMeta Description: {}\n\nKeywords: {}\n\nBlog Content:\n{}",
            self.title,
            self.meta_description,
            self.extracted_keywords.join(", "),
            self.body.trim(),
        )
    }
}

pub fn export_filename(brand_name: &str) -> String {
    let slug = slug::slugify(brand_name);
    let stem = if slug.is_empty() { "brand".to_string() } else { slug };
    format!("{stem}_blog_content.txt")
}
