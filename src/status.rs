// System status display — shows DB stats, scoring coverage, and config.

use anyhow::Result;
use rusqlite::Connection;
use std::path::Path;

use crate::config::Config;
use crate::db::queries;

/// Display system status to the terminal.
pub fn show(conn: &Connection, db_display_path: &str, config: &Config) -> Result<()> {
    if !Path::new(db_display_path).exists() {
        println!("Database: not initialized");
        println!("\nRun `kindling init` to set up the database.");
        return Ok(());
    }

    // Database file size
    let file_size = std::fs::metadata(db_display_path)
        .map(|m| format_bytes(m.len()))
        .unwrap_or_else(|_| "unknown".to_string());
    println!("Database: {} ({})", db_display_path, file_size);

    // Scoring coverage
    let posts = queries::count_posts(conn)?;
    let scored = queries::count_scored(conn)?;
    println!("Posts: {} total, {} scored", posts, scored);
    if scored < posts {
        println!("  Run `kindling score` to score the remaining {}", posts - scored);
    }
    if let Some(top) = queries::top_final_score(conn)? {
        println!("Top score: {:.1}", top);
    }

    // Topic graph
    let links = queries::count_links(conn)?;
    if links == 0 {
        println!("Links: none yet");
        println!("  Run `kindling link` to connect related posts");
    } else {
        println!("Links: {}", links);
    }

    // Config summary
    println!(
        "Interests: {} configured (weights c:{} r:{} n:{})",
        config.interests.len(),
        config.scoring.community,
        config.scoring.relevance,
        config.scoring.novelty,
    );
    println!(
        "Link threshold: {}  Trend window: {} days",
        config.graph.link_threshold, config.graph.trend_window_days
    );

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
