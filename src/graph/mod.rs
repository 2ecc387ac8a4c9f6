// Topic graph — lexicon classification, pairwise linking, and trends.

pub mod links;
pub mod topics;
pub mod trends;
