// Scoring pipeline — runs the three scoring engines over unscored posts.
//
// Steps:
// 1. Pick up posts with no score row yet (batch-limited)
// 2. Rebuild the novelty corpus from every stored post
// 3. For each post: community signal (HN lookup, best-effort),
//    relevance against the interest profile, novelty against the corpus
// 4. Combine with the configured weights and upsert atomically
//
// The corpus includes the posts being scored, so a post compared against
// itself lands at novelty 0. First-of-its-kind content still stands out;
// re-scoring an old batch does not.

use anyhow::Result;
use rusqlite::Connection;
use tracing::{info, warn};

use crate::config::Config;
use crate::db::queries;
use crate::engine::community::community_score;
use crate::engine::novelty::NoveltyCorpus;
use crate::engine::relevance::RelevanceScorer;
use crate::hn::client::HnClient;
use crate::output::truncate_chars;

/// How many posts feed the novelty corpus. A cap keeps a huge archive from
/// blowing up memory; recency ordering keeps the corpus representative.
const CORPUS_LIMIT: u32 = 1000;

/// Score up to `limit` unscored posts. Returns the number scored.
pub async fn run(
    conn: &Connection,
    config: &Config,
    hn: Option<&HnClient>,
    limit: u32,
) -> Result<usize> {
    let ids = queries::unscored_post_ids(conn, limit)?;
    if ids.is_empty() {
        println!("No unscored posts.");
        return Ok(0);
    }

    println!("Scoring {} post(s)...", ids.len());

    // Corpus barrier: every stored post participates in document
    // frequencies before any candidate is scored.
    let mut corpus = NoveltyCorpus::new();
    for post in queries::list_posts(conn, CORPUS_LIMIT, 0)? {
        corpus.add_document(post.id, &post.scoring_text());
    }
    info!(documents = corpus.len(), "Novelty corpus built");

    let scorer = RelevanceScorer::new(config.interests.clone());

    let mut scored = 0;
    for id in ids {
        let Some(post) = queries::get_post(conn, id)? else {
            warn!(id, "Post disappeared mid-batch, skipping");
            continue;
        };

        // Community signal is best-effort: a failed lookup scores 0, it
        // never aborts the batch.
        let community = match hn {
            Some(client) => match client.search_by_url(&post.url).await {
                Ok(Some(hit)) => community_score(hit.points(), hit.comments(), 0),
                Ok(None) => 0.0,
                Err(e) => {
                    warn!(error = %e, url = %post.url, "HN lookup failed, community score 0");
                    0.0
                }
            },
            None => 0.0,
        };

        let text = post.scoring_text();
        let relevance = scorer.score(&post.title, &text);
        let novelty = corpus.score(&text);
        let final_score = config.scoring.combine(community, relevance, novelty);

        queries::upsert_score(conn, id, community, relevance, novelty, final_score)?;
        scored += 1;

        println!(
            "  [{}] {:.1} (c:{:.1} r:{:.1} n:{:.1}) {}",
            id,
            final_score,
            community,
            relevance,
            novelty,
            truncate_chars(&post.title, 60),
        );
    }

    Ok(scored)
}
