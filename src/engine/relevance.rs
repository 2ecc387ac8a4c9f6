// Relevance scoring — keyword density against the interest profile.
//
// Each interest contributes the density of its keyword matches (per
// thousand words) weighted by the interest's weight. Matching is plain
// case-insensitive substring counting, so short keywords like "go" will
// also hit inside longer words — cheap, and good enough for ranking a
// reading queue.

use crate::config::Interest;

/// The neutral score returned when there is no profile to match against.
const NEUTRAL: f64 = 50.0;

pub struct RelevanceScorer {
    interests: Vec<Interest>,
}

impl RelevanceScorer {
    pub fn new(interests: Vec<Interest>) -> Self {
        Self { interests }
    }

    /// Score title + content against the interest profile, in [0, 100].
    ///
    /// No interests configured (or all weights zero) returns the neutral
    /// 50.0; text with no words returns 0.
    pub fn score(&self, title: &str, content: &str) -> f64 {
        if self.interests.is_empty() {
            return NEUTRAL;
        }

        let text = format!("{} {}", title, content).to_lowercase();
        let word_count = text.split_whitespace().count();
        if word_count == 0 {
            return 0.0;
        }

        let mut total_score = 0.0;
        let mut total_weight = 0.0;

        for interest in &self.interests {
            let topic = interest.topic.to_lowercase();

            let mut matches = count_occurrences(&text, &topic);
            for keyword in &interest.keywords {
                matches += count_occurrences(&text, &keyword.to_lowercase());
            }

            if matches > 0 {
                let density = matches as f64 / word_count as f64 * 1000.0;
                total_score += density * interest.weight;
            }
            total_weight += interest.weight;
        }

        if total_weight == 0.0 {
            return NEUTRAL;
        }

        // Normalize to the 0-100 scale
        let score = (total_score / total_weight) * 10.0;
        score.min(100.0)
    }
}

/// Count non-overlapping occurrences of `needle` in `haystack`.
fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}
