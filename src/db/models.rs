// Data models — Rust structs that map to database rows.
//
// These are the types that flow through the application. They're separate
// from the queries so other modules can use them without depending on
// rusqlite directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored blog post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    /// Source label, e.g. the blog's domain
    pub source: String,
    pub url: String,
    pub title: String,
    pub author: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub fetched_at: String,
    pub content_raw: String,
    /// Cleaned text written back by the enrichment step; empty until then
    pub content_clean: String,
    pub word_count: u32,
    /// Final score joined in from the scores table, when present
    pub final_score: Option<f64>,
}

impl Post {
    /// The text the engine scores: cleaned content when available, raw
    /// content stripped of HTML otherwise, the title as a last resort.
    pub fn scoring_text(&self) -> String {
        if !self.content_clean.is_empty() {
            return self.content_clean.clone();
        }
        let stripped = strip_html(&self.content_raw);
        if !stripped.is_empty() {
            return stripped;
        }
        self.title.clone()
    }
}

/// One post's score record. All four fields are written together — a post
/// is either fully scored or not scored at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub post_id: i64,
    pub community: f64,
    pub relevance: f64,
    pub novelty: f64,
    pub final_score: f64,
    pub scored_at: String,
}

/// A stored link between two posts. `post_a` is always the smaller id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostLink {
    pub id: i64,
    pub post_a: i64,
    pub post_b: i64,
    pub relationship: String,
    pub strength: f64,
}

/// One full-text search hit. `rank` is the raw bm25 value (lower is a
/// better match); `final_score` is 0 for unscored posts.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub post_id: i64,
    pub title: String,
    pub source: String,
    pub published_at: Option<DateTime<Utc>>,
    pub snippet: String,
    pub rank: f64,
    pub final_score: f64,
}

/// Remove HTML tags from text, keeping the character content.
pub fn strip_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    result.trim().to_string()
}

/// Whitespace-delimited word count, used when writing cleaned content back.
pub fn word_count(text: &str) -> u32 {
    text.split_whitespace().count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(raw: &str, clean: &str, title: &str) -> Post {
        Post {
            id: 1,
            source: "example.com".to_string(),
            url: "https://example.com/p".to_string(),
            title: title.to_string(),
            author: None,
            published_at: None,
            fetched_at: String::new(),
            content_raw: raw.to_string(),
            content_clean: clean.to_string(),
            word_count: 0,
            final_score: None,
        }
    }

    #[test]
    fn test_scoring_text_prefers_clean() {
        let p = post("<p>raw</p>", "clean text", "Title");
        assert_eq!(p.scoring_text(), "clean text");
    }

    #[test]
    fn test_scoring_text_strips_raw_html() {
        let p = post("<p>raw <b>text</b></p>", "", "Title");
        assert_eq!(p.scoring_text(), "raw text");
    }

    #[test]
    fn test_scoring_text_falls_back_to_title() {
        let p = post("", "", "Just a Title");
        assert_eq!(p.scoring_text(), "Just a Title");
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<div>a <span>b</span> c</div>"), "a b c");
        assert_eq!(strip_html("no tags at all"), "no tags at all");
        assert_eq!(strip_html("<br/>"), "");
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("one two  three\nfour"), 4);
        assert_eq!(word_count("   "), 0);
    }
}
