use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::engine::aggregate::ScoreWeights;

/// A single interest profile entry: a topic, how much it matters, and the
/// keyword synonyms that count as a match. The topic label itself is always
/// treated as an implicit keyword during scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interest {
    pub topic: String,
    pub weight: f64,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Topic graph and trend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Minimum Jaccard similarity for two posts to be linked
    pub link_threshold: f64,
    /// Trend analysis window in days
    pub trend_window_days: i64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            link_threshold: 0.3,
            trend_window_days: 30,
        }
    }
}

/// Central configuration, loaded from `$KINDLING_HOME/config.json`.
///
/// A missing file is not an error — defaults apply until the user edits
/// the config written by `kindling init`. The .env file is loaded
/// automatically at startup via dotenvy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub interests: Vec<Interest>,
    #[serde(default)]
    pub scoring: ScoreWeights,
    #[serde(default)]
    pub graph: GraphConfig,
    /// HN Algolia search endpoint (overridable for testing)
    #[serde(default = "default_hn_url")]
    pub hn_url: String,
}

fn default_hn_url() -> String {
    "https://hn.algolia.com".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interests: Vec::new(),
            scoring: ScoreWeights::default(),
            graph: GraphConfig::default(),
            hn_url: default_hn_url(),
        }
    }
}

/// The kindling home directory: `$KINDLING_HOME` if set, else `~/.kindling`.
pub fn home_dir() -> PathBuf {
    if let Ok(dir) = env::var("KINDLING_HOME") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".kindling")
}

/// Database path: `$KINDLING_DB_PATH` if set, else `<home>/kindling.db`.
pub fn db_path() -> String {
    if let Ok(path) = env::var("KINDLING_DB_PATH") {
        return path;
    }
    home_dir().join("kindling.db").display().to_string()
}

fn config_path() -> PathBuf {
    home_dir().join("config.json")
}

impl Config {
    /// Load configuration from the config file, falling back to defaults
    /// when the file does not exist yet. Validation runs here so the
    /// scoring hot path never has to re-check weights.
    pub fn load() -> Result<Self> {
        let path = config_path();
        let config = match std::fs::read_to_string(&path) {
            Ok(data) => serde_json::from_str(&data)
                .with_context(|| format!("Failed to parse config at {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read config at {}", path.display()))
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration to the config file, creating the home
    /// directory if needed.
    pub fn save(&self) -> Result<()> {
        let dir = home_dir();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path(), data)
            .with_context(|| format!("Failed to write config at {}", config_path().display()))?;
        Ok(())
    }

    /// Reject configurations that would corrupt scoring: negative weights,
    /// a link threshold outside [0, 1], or a non-positive trend window.
    pub fn validate(&self) -> Result<()> {
        if self.scoring.community < 0.0 || self.scoring.relevance < 0.0 || self.scoring.novelty < 0.0
        {
            anyhow::bail!(
                "Scoring weights must be non-negative (community={}, relevance={}, novelty={})",
                self.scoring.community,
                self.scoring.relevance,
                self.scoring.novelty
            );
        }
        if !(0.0..=1.0).contains(&self.graph.link_threshold) {
            anyhow::bail!(
                "graph.link_threshold must be in [0, 1], got {}",
                self.graph.link_threshold
            );
        }
        if self.graph.trend_window_days < 1 {
            anyhow::bail!(
                "graph.trend_window_days must be at least 1, got {}",
                self.graph.trend_window_days
            );
        }
        for interest in &self.interests {
            if interest.weight < 0.0 {
                anyhow::bail!(
                    "Interest '{}' has a negative weight ({})",
                    interest.topic,
                    interest.weight
                );
            }
        }
        Ok(())
    }

    /// A starter config written by `kindling init` — a couple of example
    /// interests the user is expected to replace.
    pub fn starter() -> Self {
        Self {
            interests: vec![
                Interest {
                    topic: "rust".to_string(),
                    weight: 1.0,
                    keywords: vec!["rustlang".to_string(), "cargo".to_string()],
                },
                Interest {
                    topic: "databases".to_string(),
                    weight: 0.8,
                    keywords: vec!["sql".to_string(), "postgres".to_string()],
                },
            ],
            ..Self::default()
        }
    }
}
