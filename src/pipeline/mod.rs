// Batch pipelines — the multi-step flows behind `kindling score` and
// `kindling link`.

pub mod link;
pub mod score;
