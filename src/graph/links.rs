// Pairwise topic linking — the O(n²) batch pass over a set of posts.
//
// Every pair of posts with non-empty topic sets gets a Jaccard similarity;
// pairs at or above the threshold become links. There is no incremental
// update: a rebuild reprocesses the full batch, and the (pair, relationship)
// identity makes re-runs upsert rather than duplicate. Fine at the batch
// sizes a personal reading queue produces.

use super::topics::{shared_topics, topic_similarity};

/// A weighted link between two posts sharing topics.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicLink {
    /// Smaller post id of the pair
    pub post_a: i64,
    /// Larger post id of the pair
    pub post_b: i64,
    /// Jaccard similarity of the two topic sets, in [0, 1]
    pub strength: f64,
    /// Human-readable relationship, e.g. "shared_topics:rust,databases"
    pub relationship: String,
}

/// Build links for a batch of (post id, topic set) entries.
///
/// `threshold` is the minimum Jaccard similarity (inclusive). The shared
/// topics in the relationship label follow the first post's topic order
/// and are capped at three.
pub fn build_links(post_topics: &[(i64, Vec<String>)], threshold: f64) -> Vec<TopicLink> {
    let mut links = Vec::new();

    for i in 0..post_topics.len() {
        for j in (i + 1)..post_topics.len() {
            let (id_a, topics_a) = &post_topics[i];
            let (id_b, topics_b) = &post_topics[j];

            if topics_a.is_empty() || topics_b.is_empty() {
                continue;
            }

            let similarity = topic_similarity(topics_a, topics_b);
            if similarity < threshold {
                continue;
            }

            let shared = shared_topics(topics_a, topics_b);
            let (post_a, post_b) = if id_a <= id_b {
                (*id_a, *id_b)
            } else {
                (*id_b, *id_a)
            };

            links.push(TopicLink {
                post_a,
                post_b,
                strength: similarity,
                relationship: relationship_label(&shared),
            });
        }
    }

    links
}

/// Build the relationship string from shared topics: up to three labels,
/// comma-joined. "general" is a fallback that cannot occur for a pair with
/// positive similarity, kept for the empty-shared-list case anyway.
pub fn relationship_label(shared: &[String]) -> String {
    if shared.is_empty() {
        return "shared_topics:general".to_string();
    }
    let labels: Vec<&str> = shared.iter().take(3).map(String::as_str).collect();
    format!("shared_topics:{}", labels.join(","))
}
