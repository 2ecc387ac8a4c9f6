use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::Read;
use tracing::info;

use kindling::config::{self, Config};
use kindling::db::{self, models, queries};
use kindling::engine::tokenize::extract_keywords;
use kindling::graph::trends::TrendAnalyzer;
use kindling::hn::client::HnClient;
use kindling::output::terminal;
use kindling::pipeline;
use kindling::status;

/// Kindling: a personal reading queue that ranks blog posts.
///
/// Scores saved posts on community traction, relevance to your interests,
/// and novelty against everything you've already saved — then links
/// related posts into a topic graph.
#[derive(Parser)]
#[command(name = "kindling", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database and write a starter config
    Init,

    /// Add a post to the queue
    Add {
        /// The post's canonical URL
        url: String,

        /// Post title
        #[arg(long)]
        title: String,

        /// Source name (defaults to the URL's host)
        #[arg(long)]
        source: Option<String>,

        /// Author name
        #[arg(long)]
        author: Option<String>,

        /// Publication date (RFC 3339, e.g. 2026-03-01T00:00:00Z)
        #[arg(long)]
        published: Option<String>,

        /// Read the post body from this file instead of stdin
        #[arg(long)]
        file: Option<String>,
    },

    /// List posts with their final scores
    List {
        /// Max posts to show (default: 20)
        #[arg(long, default_value = "20")]
        top: u32,
    },

    /// Show one post in detail: score breakdown, topics, links
    Show {
        /// The post id (from `list`)
        id: i64,
    },

    /// Score unscored posts
    Score {
        /// Max posts to score in one pass (default: 50)
        #[arg(long, default_value = "50")]
        limit: u32,

        /// Skip the HN community lookup (community scores 0)
        #[arg(long)]
        skip_hn: bool,
    },

    /// Extract topics and link related posts
    Link {
        /// Override the configured similarity threshold
        #[arg(long)]
        min_similarity: Option<f64>,
    },

    /// Full-text search across post titles and content
    Search {
        /// The search query (FTS5 syntax, e.g. `raft OR paxos`)
        #[arg(required = true)]
        query: Vec<String>,

        /// Maximum results to show
        #[arg(long, short = 'l', default_value = "20")]
        limit: u32,

        /// Rank by combined relevance and final score instead of text match
        #[arg(long)]
        ranked: bool,
    },

    /// Rebuild the full-text search index
    Reindex,

    /// Show trending topics over a recent window
    Trends {
        /// Window in days (default: configured trend window)
        #[arg(long)]
        days: Option<i64>,

        /// Max topics to show (default: 10)
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Show system status (DB stats, scoring coverage, config)
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("kindling=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            info!("Initializing kindling database...");
            let db_path = config::db_path();
            let conn = db::initialize(&db_path)?;
            let table_count = db::schema::table_count(&conn)?;
            println!("Database initialized at: {}", db_path);
            println!("Tables created: {table_count}");

            let config_file = config::home_dir().join("config.json");
            if config_file.exists() {
                println!("Config found at: {}", config_file.display());
            } else {
                Config::starter().save()?;
                println!("Starter config written to: {}", config_file.display());
                println!("  Edit it to describe your interests.");
            }
            println!("\nNext: kindling add <url> --title \"...\" < post.txt");
        }

        Commands::Add {
            url,
            title,
            source,
            author,
            published,
            file,
        } => {
            let conn = db::open(&config::db_path())?;

            if queries::post_exists(&conn, &url)? {
                anyhow::bail!("Already saved: {}", url);
            }

            let content_raw = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("Failed to read post body from stdin")?;
                    buf
                }
            };

            let published_at = published
                .map(|p| {
                    DateTime::parse_from_rfc3339(&p)
                        .map(|t| t.with_timezone(&Utc))
                        .with_context(|| format!("Invalid --published date: {}", p))
                })
                .transpose()?;

            let source = source.unwrap_or_else(|| host_of(&url));

            let id = queries::insert_post(
                &conn,
                &source,
                &url,
                &title,
                author.as_deref(),
                published_at,
                &content_raw,
            )?;

            // Strip markup once at ingest so scoring reads clean text
            let clean = models::strip_html(&content_raw);
            let words = models::word_count(&clean);
            queries::update_content_clean(&conn, id, &clean, words)?;

            println!("Added [{}] {} ({} words)", id, title, words);
            println!("  Run `kindling score` to score it.");
        }

        Commands::List { top } => {
            let conn = db::open(&config::db_path())?;
            let posts = queries::list_posts(&conn, top, 0)?;
            terminal::display_post_list(&posts);
        }

        Commands::Show { id } => {
            let conn = db::open(&config::db_path())?;
            let Some(post) = queries::get_post(&conn, id)? else {
                anyhow::bail!("No post with id {}", id);
            };

            let score = queries::get_score(&conn, id)?;
            let topics = queries::get_post_topics(&conn, id)?;
            let links = queries::links_for_post(&conn, id)?;
            terminal::display_post_detail(&post, score.as_ref(), &topics, &links);

            let keywords = extract_keywords(&post.scoring_text(), 4);
            if !keywords.is_empty() {
                let preview: Vec<&str> = keywords.iter().map(String::as_str).take(12).collect();
                println!("  Keywords: {}", preview.join(", ").dimmed());
                println!();
            }
        }

        Commands::Score { limit, skip_hn } => {
            let config = Config::load()?;
            let conn = db::open(&config::db_path())?;

            let hn = if skip_hn {
                None
            } else {
                Some(HnClient::new(&config.hn_url)?)
            };

            let scored = pipeline::score::run(&conn, &config, hn.as_ref(), limit).await?;
            println!("Scored {} post(s).", scored);
        }

        Commands::Link { min_similarity } => {
            let config = Config::load()?;
            let conn = db::open(&config::db_path())?;

            let threshold = min_similarity.unwrap_or(config.graph.link_threshold);
            if !(0.0..=1.0).contains(&threshold) {
                anyhow::bail!("--min-similarity must be between 0 and 1");
            }

            let (posts, links) = pipeline::link::run(&conn, threshold)?;
            println!("Linked {} post(s): {} link(s) at threshold {}", posts, links, threshold);
        }

        Commands::Search {
            query,
            limit,
            ranked,
        } => {
            let conn = db::open(&config::db_path())?;
            let query = query.join(" ");

            let results = if ranked {
                queries::search_ranked(&conn, &query, limit)?
            } else {
                queries::search(&conn, &query, limit)?
            };
            terminal::display_search_results(&query, &results);
        }

        Commands::Reindex => {
            let conn = db::open(&config::db_path())?;
            println!("Rebuilding search index...");
            let indexed = queries::rebuild_search_index(&conn)?;
            println!("Indexed {} post(s).", indexed);
        }

        Commands::Trends { days, limit } => {
            let config = Config::load()?;
            let conn = db::open(&config::db_path())?;

            let window_days = days.unwrap_or(config.graph.trend_window_days);
            if window_days < 1 {
                anyhow::bail!("--days must be at least 1");
            }

            let mut analyzer = TrendAnalyzer::new();
            for post in queries::list_posts(&conn, 1000, 0)? {
                let topics = queries::get_post_topics(&conn, post.id)?;
                if topics.is_empty() {
                    continue;
                }
                // Undated posts count as "just published" for trend purposes
                let published = post.published_at.unwrap_or_else(Utc::now);
                analyzer.add_post(post.id, topics, published);
            }

            let trends = analyzer.trends(window_days, limit);
            terminal::display_trends(&trends, window_days);
        }

        Commands::Status => {
            let config = Config::load()?;
            let db_path = config::db_path();
            if std::path::Path::new(&db_path).exists() {
                let conn = db::open(&db_path)?;
                status::show(&conn, &db_path, &config)?;
            } else {
                println!("Database: not initialized");
                println!("\nRun `kindling init` to set up the database.");
            }
        }
    }

    Ok(())
}

/// Best-effort host extraction for the default source label.
fn host_of(url: &str) -> String {
    url.trim_start_matches("https://")
        .trim_start_matches("http://")
        .split('/')
        .next()
        .unwrap_or("unknown")
        .to_string()
}
