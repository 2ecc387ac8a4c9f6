// Link pipeline — extracts topics and connects related posts.
//
// Two phases: extract a topic set for every post (cached on the post row
// for later display), then compare every pair and store a link whenever
// topic overlap clears the similarity threshold. The pairwise comparison
// is O(n^2), acceptable at personal-archive scale.

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use rusqlite::Connection;
use tracing::info;

use crate::db::queries;
use crate::graph::links::build_links;
use crate::graph::topics::extract_topics;

/// How many posts a link pass covers, newest first.
const LINK_LIMIT: u32 = 1000;

/// Re-extract topics for all posts and rebuild links at the given
/// similarity threshold. Returns (posts processed, links stored).
pub fn run(conn: &Connection, threshold: f64) -> Result<(usize, usize)> {
    let posts = queries::list_posts(conn, LINK_LIMIT, 0)?;
    if posts.is_empty() {
        println!("No posts to link.");
        return Ok((0, 0));
    }

    let pb = ProgressBar::new(posts.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Topics  [{bar:30}] {pos}/{len}")
            .unwrap(),
    );

    let mut entries = Vec::with_capacity(posts.len());
    for post in &posts {
        let text = format!("{} {}", post.title, post.scoring_text());
        let topics = extract_topics(&text);
        queries::set_post_topics(conn, post.id, &topics)?;
        entries.push((post.id, topics));
        pb.inc(1);
    }
    pb.finish_and_clear();

    let links = build_links(&entries, threshold);
    info!(
        posts = entries.len(),
        links = links.len(),
        threshold,
        "Link pass complete"
    );

    let pb = ProgressBar::new(links.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Linking [{bar:30}] {pos}/{len}")
            .unwrap(),
    );

    for link in &links {
        queries::upsert_link(conn, link.post_a, link.post_b, &link.relationship, link.strength)?;
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok((entries.len(), links.len()))
}
