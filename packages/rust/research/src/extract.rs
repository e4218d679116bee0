//! Keyword-heuristic text extraction from parsed HTML.

use scraper::{Html, Selector};

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// An ordered text-fragment extraction over a parsed document.
///
/// Orchestration only sees "document in, ordered fragments out", so the
/// heuristic behind an implementation can be swapped without touching the
/// research flow.
pub trait ExtractionStrategy: Send + Sync {
    /// Extract matching fragments, in document order.
    fn extract(&self, doc: &Html) -> Vec<String>;

    /// Human-readable strategy name for tracing.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Keyword matching
// ---------------------------------------------------------------------------

/// Keeps elements whose text contains any of a keyword set.
pub struct KeywordExtractor {
    name: String,
    selector: Selector,
    keywords: Vec<String>,
    limit: usize,
}

impl KeywordExtractor {
    /// Build an extractor over a CSS tag list (e.g. `"li, p, span"`),
    /// matching any of `keywords` case-insensitively and keeping the first
    /// `limit` hits in document order.
    ///
    /// Panics if `selector` is not valid CSS; callers pass literals.
    pub fn new(name: &str, selector: &str, keywords: &[&str], limit: usize) -> Self {
        Self {
            name: name.to_string(),
            selector: Selector::parse(selector).unwrap(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            limit,
        }
    }
}

impl ExtractionStrategy for KeywordExtractor {
    fn extract(&self, doc: &Html) -> Vec<String> {
        let mut found = Vec::new();

        for el in doc.select(&self.selector) {
            if found.len() >= self.limit {
                break;
            }

            let text = normalize_text(&el.text().collect::<String>());
            if text.is_empty() {
                continue;
            }

            let lowered = text.to_lowercase();
            if self.keywords.iter().any(|k| lowered.contains(k)) {
                found.push(text);
            }
        }

        found
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Collapse whitespace runs and trim.
fn normalize_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
