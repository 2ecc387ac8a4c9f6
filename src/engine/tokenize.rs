// Tokenization for the novelty corpus, plus a display-only keyword helper.
//
// The scoring tokenizer is deliberately primitive: lowercase, maximal runs
// of ASCII letters and digits, tokens longer than two characters. No
// stemming and no stop-word removal — the TF-IDF weighting downweights
// common words on its own, and keeping the tokenizer dumb keeps scores
// reproducible.

use regex_lite::Regex;
use stop_words::{get, LANGUAGE};

/// Split text into index terms for the novelty corpus.
///
/// Lowercases the input, splits on anything that is not an ASCII letter or
/// digit, and keeps only tokens longer than two characters.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for c in text.chars() {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            current.push(c);
        } else if !current.is_empty() {
            if current.len() > 2 {
                tokens.push(std::mem::take(&mut current));
            } else {
                current.clear();
            }
        }
    }
    if current.len() > 2 {
        tokens.push(current);
    }

    tokens
}

/// Extract significant words for display (the `show` command's keyword line).
///
/// Unlike [`tokenize`], this removes English stop words and deduplicates,
/// keeping first-seen order. Never used for scoring.
pub fn extract_keywords(text: &str, min_len: usize) -> Vec<String> {
    let stop: Vec<String> = get(LANGUAGE::English);
    let lower = text.to_lowercase();

    // regex-lite has no lookaround, but plain [a-z]+ is all we need here
    let word = Regex::new("[a-z]+").unwrap();

    let mut seen = std::collections::HashSet::new();
    let mut keywords = Vec::new();
    for m in word.find_iter(&lower) {
        let w = m.as_str();
        if w.len() >= min_len && !stop.iter().any(|s| s == w) && seen.insert(w.to_string()) {
            keywords.push(w.to_string());
        }
    }
    keywords
}
