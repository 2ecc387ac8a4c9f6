// Kindling: blog post scoring and topic graphs.
//
// This is the library root. Each module corresponds to a major subsystem
// of the scoring pipeline.

pub mod config;
pub mod db;
pub mod engine;
pub mod graph;
pub mod hn;
pub mod output;
pub mod pipeline;
pub mod status;
