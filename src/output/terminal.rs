// Colored terminal output for post lists, detail views, and trends.
//
// This module handles all terminal-specific formatting: colors, tables,
// score bars. The main.rs command arms delegate here.

use colored::Colorize;

use crate::db::models::{Post, PostLink, ScoreRecord, SearchResult};
use crate::graph::trends::Trend;

/// Display a ranked post list in the terminal.
pub fn display_post_list(posts: &[Post]) {
    if posts.is_empty() {
        println!("No posts yet. Run `kindling add <url>` first.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Posts ({} shown) ===", posts.len()).bold()
    );
    println!();

    // Header
    println!(
        "  {:>4}  {:>6}  {:<46}  {:<20}",
        "Id".dimmed(),
        "Score".dimmed(),
        "Title".dimmed(),
        "Source".dimmed(),
    );
    println!("  {}", "-".repeat(82).dimmed());

    for post in posts {
        let score_str = match post.final_score {
            Some(score) => colorize_score(score),
            None => "-".dimmed().to_string(),
        };

        println!(
            "  {:>4}  {:>6}  {:<46}  {:<20}",
            post.id,
            score_str,
            super::truncate_chars(&post.title, 44),
            super::truncate_chars(&post.source, 20).dimmed(),
        );
    }
    println!();
}

/// Display a single post with its full score breakdown, topics, and links.
pub fn display_post_detail(
    post: &Post,
    score: Option<&ScoreRecord>,
    topics: &[String],
    links: &[PostLink],
) {
    println!("\n{}", format!("=== [{}] {} ===", post.id, post.title).bold());
    println!("  URL: {}", post.url);
    println!("  Source: {}", post.source);
    if let Some(author) = &post.author {
        println!("  Author: {}", author);
    }
    if let Some(published) = post.published_at {
        println!("  Published: {}", published.format("%Y-%m-%d"));
    }
    println!("  Words: {}", post.word_count);

    match score {
        Some(s) => {
            println!("\n  Final score: {}", colorize_score(s.final_score).bold());
            println!(
                "    Community: {:>5.1}   Relevance: {:>5.1}   Novelty: {:>5.1}",
                s.community, s.relevance, s.novelty
            );
            println!("    Scored at: {}", s.scored_at.dimmed());
        }
        None => println!("\n  Not scored yet. Run `kindling score`."),
    }

    if !topics.is_empty() {
        println!("\n  Topics: {}", topics.join(", ").cyan());
    }

    if !links.is_empty() {
        println!("\n  Related posts:");
        for link in links {
            let other = if link.post_a == post.id {
                link.post_b
            } else {
                link.post_a
            };
            println!(
                "    [{:>4}]  {:.2}  {}",
                other,
                link.strength,
                link.relationship.dimmed()
            );
        }
    }
    println!();
}

/// Display full-text search hits with snippets.
pub fn display_search_results(query: &str, results: &[SearchResult]) {
    if results.is_empty() {
        println!("No results for '{}'.", query);
        return;
    }

    println!(
        "\n{}",
        format!("=== Search '{}' ({} results) ===", query, results.len()).bold()
    );
    println!();

    for result in results {
        print!("  [{}] {}", result.post_id, result.title.bold());
        if result.final_score > 0.0 {
            print!("  {}", colorize_score(result.final_score));
        }
        println!();
        println!("      {}", result.source.dimmed());
        if !result.snippet.is_empty() {
            println!("      {}", super::truncate_chars(&result.snippet, 140).dimmed());
        }
        println!();
    }
}

/// Display trending topics with proportional score bars.
pub fn display_trends(trends: &[Trend], window_days: i64) {
    if trends.is_empty() {
        println!("No trends yet. Run `kindling link` to extract topics first.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Trending Topics (last {} days) ===", window_days).bold()
    );
    println!();

    let max_score = trends
        .iter()
        .map(|t| t.score)
        .fold(0.0_f64, f64::max)
        .max(1.0);

    for trend in trends {
        let bar_len = ((trend.score / max_score) * 30.0).round() as usize;
        let bar = "█".repeat(bar_len.max(1));

        println!(
            "  {:<22} {:>6.1}  {}  {} post(s)",
            trend.topic,
            trend.score,
            bar.cyan(),
            trend.count,
        );
    }
    println!();
}

/// Colorize a final score by band.
fn colorize_score(score: f64) -> String {
    let text = format!("{:.1}", score);
    if score >= 70.0 {
        text.green().bold().to_string()
    } else if score >= 40.0 {
        text.yellow().to_string()
    } else {
        text.dimmed().to_string()
    }
}
