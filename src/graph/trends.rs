// Trend analysis — recency-weighted topic frequency over a time window.
//
// For every topic: total mentions across the batch, the posts mentioning
// it inside the window, and a boost that decays linearly from 2.0 (latest
// mention is right now) to 1.0 (latest mention at the window edge or
// older). Posts without a publication timestamp are fed in as "now" by the
// callers, which makes them maximally recent rather than invisible.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, Utc};

/// A ranked trending topic.
#[derive(Debug, Clone)]
pub struct Trend {
    pub topic: String,
    /// All-time mention count within the current batch
    pub count: usize,
    /// Derived score — only comparable within one analysis pass
    pub score: f64,
    /// Posts mentioning the topic inside the window
    pub recent_posts: Vec<i64>,
}

struct TopicEntry {
    topics: Vec<String>,
    published_at: DateTime<Utc>,
}

/// Accumulates (post, topics, timestamp) entries for one analysis pass.
pub struct TrendAnalyzer {
    post_topics: HashMap<i64, TopicEntry>,
}

impl TrendAnalyzer {
    pub fn new() -> Self {
        Self {
            post_topics: HashMap::new(),
        }
    }

    pub fn add_post(&mut self, post_id: i64, topics: Vec<String>, published_at: DateTime<Utc>) {
        self.post_topics.insert(
            post_id,
            TopicEntry {
                topics,
                published_at,
            },
        );
    }

    /// Rank topics by trend score, truncated to `limit`.
    ///
    /// score = (recent_count * 2 + total_count) * recency_boost. Ties keep
    /// the accumulation order, which is alphabetical by topic label.
    pub fn trends(&self, window_days: i64, limit: usize) -> Vec<Trend> {
        let now = Utc::now();
        let cutoff = now - Duration::days(window_days);

        // BTreeMap keyed by topic label makes the output order stable even
        // though post iteration order is not.
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        let mut posts: BTreeMap<&str, Vec<i64>> = BTreeMap::new();
        let mut latest: BTreeMap<&str, DateTime<Utc>> = BTreeMap::new();

        for (post_id, entry) in &self.post_topics {
            for topic in &entry.topics {
                *counts.entry(topic).or_insert(0) += 1;
                posts.entry(topic).or_default().push(*post_id);

                latest
                    .entry(topic)
                    .and_modify(|t| {
                        if entry.published_at > *t {
                            *t = entry.published_at;
                        }
                    })
                    .or_insert(entry.published_at);
            }
        }

        let mut trends: Vec<Trend> = counts
            .iter()
            .map(|(&topic, &count)| {
                let mut recent_posts: Vec<i64> = posts[topic]
                    .iter()
                    .copied()
                    .filter(|id| self.post_topics[id].published_at > cutoff)
                    .collect();
                recent_posts.sort_unstable();

                let recency_boost = match latest.get(topic) {
                    Some(&most_recent) => {
                        let days_since =
                            (now - most_recent).num_seconds() as f64 / 86_400.0;
                        if days_since < window_days as f64 {
                            1.0 + (window_days as f64 - days_since) / window_days as f64
                        } else {
                            1.0
                        }
                    }
                    None => 1.0,
                };

                let score = (recent_posts.len() as f64 * 2.0 + count as f64) * recency_boost;

                Trend {
                    topic: topic.to_string(),
                    count,
                    score,
                    recent_posts,
                }
            })
            .collect();

        trends.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        trends.truncate(limit);
        trends
    }
}

impl Default for TrendAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
