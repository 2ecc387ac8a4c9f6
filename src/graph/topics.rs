// Topic classification against a fixed lexicon, plus Jaccard similarity.
//
// Classification is deliberately naive: a topic applies if any of its
// keyword phrases appears as a case-insensitive substring anywhere in the
// text, with no word-boundary checks. Short keywords like "go" or "ml"
// will substring-match inside unrelated words ("cargo", "html") — a known
// precision trade-off of this lexicon, documented here rather than patched
// over with tokenization that would silently change classifications.

use std::collections::HashSet;

/// The fixed topic lexicon: (label, keyword phrases). Static data — the
/// classifier is a pure function over this table and the input text.
pub const TOPIC_LEXICON: &[(&str, &[&str])] = &[
    ("golang", &["go", "golang", "goroutine", "goroutines"]),
    ("rust", &["rust", "rustlang", "cargo", "ownership"]),
    ("python", &["python", "django", "flask", "pytorch"]),
    ("javascript", &["javascript", "typescript", "nodejs", "react", "vue"]),
    (
        "distributed-systems",
        &["distributed", "consensus", "raft", "paxos", "microservices"],
    ),
    (
        "databases",
        &["database", "sql", "postgresql", "mysql", "redis", "mongodb"],
    ),
    ("kubernetes", &["kubernetes", "k8s", "docker", "containers", "helm"]),
    (
        "performance",
        &["performance", "optimization", "latency", "throughput", "benchmark"],
    ),
    (
        "security",
        &["security", "authentication", "encryption", "vulnerability"],
    ),
    (
        "machine-learning",
        &["machine learning", "ml", "neural", "tensorflow", "pytorch"],
    ),
    ("devops", &["devops", "ci/cd", "jenkins", "github actions", "terraform"]),
    (
        "architecture",
        &["architecture", "design patterns", "solid", "clean architecture"],
    ),
    ("testing", &["testing", "unit test", "integration test", "tdd"]),
    ("concurrency", &["concurrency", "parallel", "async", "threads", "mutex"]),
    ("api", &["api", "rest", "graphql", "grpc", "openapi"]),
];

/// Classify text into topic labels from the lexicon.
///
/// Each topic is tested independently; a document may carry several topics
/// or none. Output order follows the lexicon, so it is deterministic.
pub fn extract_topics(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut found = Vec::new();

    for (topic, keywords) in TOPIC_LEXICON {
        if keywords.iter().any(|kw| lower.contains(kw)) {
            found.push((*topic).to_string());
        }
    }

    found
}

/// Jaccard similarity between two topic sets: |intersection| / |union|.
/// Either set empty means 0.
pub fn topic_similarity(topics_a: &[String], topics_b: &[String]) -> f64 {
    if topics_a.is_empty() || topics_b.is_empty() {
        return 0.0;
    }

    let set_a: HashSet<&str> = topics_a.iter().map(String::as_str).collect();
    let set_b: HashSet<&str> = topics_b.iter().map(String::as_str).collect();

    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();

    if union == 0 {
        return 0.0;
    }

    intersection as f64 / union as f64
}

/// Topics present in both sets, in the order they appear in the first set.
pub fn shared_topics(topics_a: &[String], topics_b: &[String]) -> Vec<String> {
    let set_b: HashSet<&str> = topics_b.iter().map(String::as_str).collect();
    topics_a
        .iter()
        .filter(|t| set_b.contains(t.as_str()))
        .cloned()
        .collect()
}
