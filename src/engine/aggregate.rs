// Final score combination.
//
// The three sub-scores each land in [0, 100]; the final score is their
// weighted sum. Deliberately NOT clamped — weights are configuration and
// are not required to sum to 1, so the final score is only comparable to
// other scores produced with the same weights.

use serde::{Deserialize, Serialize};

/// Configurable weights for the final score formula.
///
/// `final = community * community_w + relevance * relevance_w + novelty * novelty_w`
///
/// Negative weights are rejected at config load time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreWeights {
    #[serde(default = "default_community_weight")]
    pub community: f64,
    #[serde(default = "default_relevance_weight")]
    pub relevance: f64,
    #[serde(default = "default_novelty_weight")]
    pub novelty: f64,
}

fn default_community_weight() -> f64 {
    0.3
}

fn default_relevance_weight() -> f64 {
    0.4
}

fn default_novelty_weight() -> f64 {
    0.3
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            community: default_community_weight(),
            relevance: default_relevance_weight(),
            novelty: default_novelty_weight(),
        }
    }
}

impl ScoreWeights {
    /// Combine the three sub-scores into the final score.
    pub fn combine(&self, community: f64, relevance: f64, novelty: f64) -> f64 {
        community * self.community + relevance * self.relevance + novelty * self.novelty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weighting() {
        let weights = ScoreWeights::default();
        let final_score = weights.combine(50.0, 80.0, 100.0);
        // 50*0.3 + 80*0.4 + 100*0.3 = 15 + 32 + 30 = 77
        assert!((final_score - 77.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_zero_subscores() {
        let weights = ScoreWeights::default();
        assert!(weights.combine(0.0, 0.0, 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_json_fills_missing_weights() {
        let weights: ScoreWeights = serde_json::from_str(r#"{"community": 0.5}"#).unwrap();
        assert!((weights.community - 0.5).abs() < f64::EPSILON);
        assert!((weights.relevance - 0.4).abs() < f64::EPSILON);
        assert!((weights.novelty - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_no_clamping_above_100() {
        let weights = ScoreWeights {
            community: 1.0,
            relevance: 1.0,
            novelty: 1.0,
        };
        let final_score = weights.combine(100.0, 100.0, 100.0);
        assert!((final_score - 300.0).abs() < 1e-9);
    }
}
