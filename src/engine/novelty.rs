// Novelty scoring — TF-IDF vector-space comparison against a corpus.
//
// The corpus is an explicit, caller-constructed object with a simple
// lifecycle: create, feed documents, query, discard. The scoring pipeline
// rebuilds it from the stored posts on every pass, so document frequencies
// always reflect the current batch rather than accumulated history.
//
// Known behavior: the pipeline feeds ALL stored posts into the corpus,
// including the ones about to be scored. A post that is already present
// registers cosine similarity 1.0 with itself, collapsing its novelty to 0.
// Callers that want "novelty against everything else" must leave the
// candidate out when building the corpus.

use std::collections::HashMap;

use super::tokenize::tokenize;

/// In-memory TF-IDF corpus for novelty comparison.
pub struct NoveltyCorpus {
    /// post id -> term -> term frequency (count / token total)
    documents: HashMap<i64, HashMap<String, f64>>,
    /// term -> number of documents containing it at least once
    document_freq: HashMap<String, usize>,
    doc_count: usize,
}

impl NoveltyCorpus {
    pub fn new() -> Self {
        Self {
            documents: HashMap::new(),
            document_freq: HashMap::new(),
            doc_count: 0,
        }
    }

    /// Number of documents in the corpus.
    pub fn len(&self) -> usize {
        self.doc_count
    }

    pub fn is_empty(&self) -> bool {
        self.doc_count == 0
    }

    /// Add a document to the corpus. Text that tokenizes to nothing is a
    /// no-op — it would have an empty vector and a meaningless frequency
    /// contribution.
    pub fn add_document(&mut self, id: i64, text: &str) {
        let Some(tf) = term_frequencies(text) else {
            return;
        };

        // Each distinct term counts once per document
        for term in tf.keys() {
            *self.document_freq.entry(term.clone()).or_insert(0) += 1;
        }

        self.documents.insert(id, tf);
        self.doc_count += 1;
    }

    /// Score how novel `text` is against the corpus, in [0, 100].
    ///
    /// 100 means nothing similar exists (or there is nothing to compare
    /// against); 0 means an existing document matches exactly.
    pub fn score(&self, text: &str) -> f64 {
        if self.doc_count == 0 {
            // Everything is novel when the corpus is empty
            return 100.0;
        }

        let Some(candidate) = term_frequencies(text) else {
            return 100.0;
        };

        let max_similarity = self
            .documents
            .values()
            .map(|doc| self.cosine_similarity(&candidate, doc))
            .fold(0.0_f64, f64::max);

        (1.0 - max_similarity) * 100.0
    }

    /// Cosine similarity between two TF vectors, each weighted by IDF.
    fn cosine_similarity(&self, tf1: &HashMap<String, f64>, tf2: &HashMap<String, f64>) -> f64 {
        let mut dot = 0.0;
        let mut norm1 = 0.0;
        let mut norm2 = 0.0;

        for (term, f1) in tf1 {
            let idf = self.idf(term);
            let v1 = f1 * idf;
            norm1 += v1 * v1;

            if let Some(f2) = tf2.get(term) {
                dot += v1 * (f2 * idf);
            }
        }

        for (term, f2) in tf2 {
            let idf = self.idf(term);
            let v2 = f2 * idf;
            norm2 += v2 * v2;
        }

        if norm1 == 0.0 || norm2 == 0.0 {
            return 0.0;
        }

        dot / (norm1.sqrt() * norm2.sqrt())
    }

    /// Inverse document frequency: ln((n + 1) / (df + 1)).
    /// Terms the corpus has never seen contribute nothing.
    fn idf(&self, term: &str) -> f64 {
        match self.document_freq.get(term) {
            None => 0.0,
            Some(&df) => ((self.doc_count as f64 + 1.0) / (df as f64 + 1.0)).ln(),
        }
    }
}

impl Default for NoveltyCorpus {
    fn default() -> Self {
        Self::new()
    }
}

/// Term frequency vector for a text, or None if it tokenizes to nothing.
fn term_frequencies(text: &str) -> Option<HashMap<String, f64>> {
    let terms = tokenize(text);
    if terms.is_empty() {
        return None;
    }

    let total = terms.len() as f64;
    let mut counts: HashMap<String, usize> = HashMap::new();
    for term in terms {
        *counts.entry(term).or_insert(0) += 1;
    }

    Some(
        counts
            .into_iter()
            .map(|(term, count)| (term, count as f64 / total))
            .collect(),
    )
}
