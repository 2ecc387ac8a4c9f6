// Scoring engine — novelty, relevance, community, and final score.
//
// Everything here is pure in-memory computation over text and configuration.
// The only network-touching collaborator (the HN signal) lives in crate::hn;
// this module only sees the already-retrieved counts.

pub mod aggregate;
pub mod community;
pub mod novelty;
pub mod relevance;
pub mod tokenize;
