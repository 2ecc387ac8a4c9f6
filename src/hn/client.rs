// HTTP client for the HN Algolia search API.
//
// Looks a post up by its canonical URL and returns the best-matching HN
// submission (highest points when the URL was submitted more than once).
// Lookups are best-effort: callers treat any failure as "no signal" and
// score the community component 0 rather than aborting the batch.

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

/// A single search hit from the Algolia index.
///
/// Points and comment counts can be null for non-story hits, so both are
/// optional with zero fallbacks.
#[derive(Debug, Clone, Deserialize)]
pub struct HnHit {
    #[serde(rename = "objectID")]
    pub object_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub points: Option<u32>,
    #[serde(default)]
    pub num_comments: Option<u32>,
    #[serde(default)]
    pub url: Option<String>,
}

impl HnHit {
    pub fn points(&self) -> u32 {
        self.points.unwrap_or(0)
    }

    pub fn comments(&self) -> u32 {
        self.num_comments.unwrap_or(0)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Vec<HnHit>,
}

/// Client for the HN Algolia search API.
pub struct HnClient {
    client: reqwest::Client,
    base_url: String,
}

impl HnClient {
    /// Create a client pointing at the given base URL
    /// (normally `https://hn.algolia.com`).
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("kindling/0.1 (blog scoring)")
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Search the index for submissions of `post_url`, restricted to the
    /// url attribute. Returns the hit with the most points, or None when
    /// the URL was never submitted.
    pub async fn search_by_url(&self, post_url: &str) -> Result<Option<HnHit>> {
        let url = format!("{}/api/v1/search", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("query", post_url),
                ("restrictSearchableAttributes", "url"),
            ])
            .send()
            .await
            .context("HN API request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("HN API returned {}", response.status());
        }

        let result: SearchResponse = response
            .json()
            .await
            .context("Failed to decode HN response")?;

        debug!(hits = result.hits.len(), url = post_url, "HN search complete");

        Ok(result
            .hits
            .into_iter()
            .max_by_key(|hit| hit.points()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_defaults_missing_counts_to_zero() {
        let json = r#"{"objectID": "123", "title": "A post"}"#;
        let hit: HnHit = serde_json::from_str(json).unwrap();
        assert_eq!(hit.points(), 0);
        assert_eq!(hit.comments(), 0);
    }

    #[test]
    fn test_hit_parses_null_points() {
        let json = r#"{"objectID": "123", "points": null, "num_comments": 4}"#;
        let hit: HnHit = serde_json::from_str(json).unwrap();
        assert_eq!(hit.points(), 0);
        assert_eq!(hit.comments(), 4);
    }

    #[test]
    fn test_response_picks_highest_points() {
        let json = r#"{"hits": [
            {"objectID": "1", "points": 10},
            {"objectID": "2", "points": 300, "num_comments": 50},
            {"objectID": "3", "points": 25}
        ]}"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        let best = response.hits.into_iter().max_by_key(|h| h.points()).unwrap();
        assert_eq!(best.object_id, "2");
    }
}
