// Database queries — CRUD operations for all tables.
//
// Every database interaction goes through this module. This keeps SQL
// contained in one place and gives the rest of the app clean Rust
// interfaces over &Connection.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::models::{Post, PostLink, ScoreRecord, SearchResult};

// --- Posts ---

/// Insert a new post and return its id. Fails on a duplicate URL.
pub fn insert_post(
    conn: &Connection,
    source: &str,
    url: &str,
    title: &str,
    author: Option<&str>,
    published_at: Option<DateTime<Utc>>,
    content_raw: &str,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO posts (source, url, title, author, published_at, content_raw)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            source,
            url,
            title,
            author,
            published_at.map(|t| t.to_rfc3339()),
            content_raw,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn post_exists(conn: &Connection, url: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM posts WHERE url = ?1",
        params![url],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

const POST_COLUMNS: &str = "p.id, p.source, p.url, p.title, p.author, p.published_at,
       p.fetched_at, p.content_raw, p.content_clean, p.word_count, sc.final_score";

fn post_from_row(row: &Row) -> rusqlite::Result<Post> {
    let published_at: Option<String> = row.get(5)?;
    Ok(Post {
        id: row.get(0)?,
        source: row.get(1)?,
        url: row.get(2)?,
        title: row.get(3)?,
        author: row.get(4)?,
        published_at: published_at.as_deref().and_then(parse_timestamp),
        fetched_at: row.get(6)?,
        content_raw: row.get(7)?,
        content_clean: row.get(8)?,
        word_count: row.get(9)?,
        final_score: row.get(10)?,
    })
}

/// Parse a stored RFC 3339 timestamp. Unparseable values read as None
/// rather than failing the whole row.
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

pub fn get_post(conn: &Connection, id: i64) -> Result<Option<Post>> {
    let sql = format!(
        "SELECT {POST_COLUMNS}
         FROM posts p LEFT JOIN scores sc ON p.id = sc.post_id
         WHERE p.id = ?1"
    );
    let mut stmt = conn.prepare(&sql)?;
    let result = stmt.query_row(params![id], post_from_row).optional()?;
    Ok(result)
}

/// List posts ordered by publication date, newest first (posts without a
/// date sort last), with final scores joined in.
pub fn list_posts(conn: &Connection, limit: u32, offset: u32) -> Result<Vec<Post>> {
    let sql = format!(
        "SELECT {POST_COLUMNS}
         FROM posts p LEFT JOIN scores sc ON p.id = sc.post_id
         ORDER BY p.published_at DESC
         LIMIT ?1 OFFSET ?2"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![limit, offset], post_from_row)?;

    let mut posts = Vec::new();
    for row in rows {
        posts.push(row?);
    }
    Ok(posts)
}

pub fn update_content_clean(
    conn: &Connection,
    id: i64,
    content_clean: &str,
    word_count: u32,
) -> Result<()> {
    conn.execute(
        "UPDATE posts SET content_clean = ?1, word_count = ?2 WHERE id = ?3",
        params![content_clean, word_count, id],
    )?;
    Ok(())
}

/// Cache a post's extracted topic set as a JSON array.
pub fn set_post_topics(conn: &Connection, id: i64, topics: &[String]) -> Result<()> {
    let json = serde_json::to_string(topics)?;
    conn.execute(
        "UPDATE posts SET topics = ?1 WHERE id = ?2",
        params![json, id],
    )?;
    Ok(())
}

/// Load a post's cached topic set. Missing or unparseable JSON reads as
/// an empty set.
pub fn get_post_topics(conn: &Connection, id: i64) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT topics FROM posts WHERE id = ?1")?;
    let json: Option<Option<String>> = stmt.query_row(params![id], |row| row.get(0)).optional()?;
    Ok(json
        .flatten()
        .and_then(|j| serde_json::from_str(&j).ok())
        .unwrap_or_default())
}

// --- Scores ---

/// Post ids that have no score row yet.
pub fn unscored_post_ids(conn: &Connection, limit: u32) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare(
        "SELECT p.id FROM posts p
         LEFT JOIN scores s ON p.id = s.post_id
         WHERE s.post_id IS NULL
         LIMIT ?1",
    )?;
    let rows = stmt.query_map(params![limit], |row| row.get(0))?;

    let mut ids = Vec::new();
    for row in rows {
        ids.push(row?);
    }
    Ok(ids)
}

/// Write a post's score record. All four components land in one statement,
/// so a score row is never partially updated.
pub fn upsert_score(
    conn: &Connection,
    post_id: i64,
    community: f64,
    relevance: f64,
    novelty: f64,
    final_score: f64,
) -> Result<()> {
    conn.execute(
        "INSERT INTO scores (post_id, community_score, relevance_score, novelty_score, final_score, scored_at)
         VALUES (?1, ?2, ?3, ?4, ?5, datetime('now'))
         ON CONFLICT(post_id) DO UPDATE SET
            community_score = ?2,
            relevance_score = ?3,
            novelty_score = ?4,
            final_score = ?5,
            scored_at = datetime('now')",
        params![post_id, community, relevance, novelty, final_score],
    )?;
    Ok(())
}

pub fn get_score(conn: &Connection, post_id: i64) -> Result<Option<ScoreRecord>> {
    let mut stmt = conn.prepare(
        "SELECT post_id, community_score, relevance_score, novelty_score, final_score, scored_at
         FROM scores WHERE post_id = ?1",
    )?;
    let result = stmt
        .query_row(params![post_id], |row| {
            Ok(ScoreRecord {
                post_id: row.get(0)?,
                community: row.get(1)?,
                relevance: row.get(2)?,
                novelty: row.get(3)?,
                final_score: row.get(4)?,
                scored_at: row.get(5)?,
            })
        })
        .optional()?;
    Ok(result)
}

// --- Links ---

/// Save or update a link. The pair is normalized to smaller-id-first;
/// identity is (pair, relationship) and a re-link overwrites strength.
pub fn upsert_link(
    conn: &Connection,
    post_a: i64,
    post_b: i64,
    relationship: &str,
    strength: f64,
) -> Result<()> {
    let (post_a, post_b) = if post_a <= post_b {
        (post_a, post_b)
    } else {
        (post_b, post_a)
    };

    conn.execute(
        "INSERT INTO links (post_a, post_b, relationship, strength)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(post_a, post_b, relationship) DO UPDATE SET
            strength = ?4",
        params![post_a, post_b, relationship, strength],
    )?;
    Ok(())
}

/// Links touching a post, strongest first.
pub fn links_for_post(conn: &Connection, post_id: i64) -> Result<Vec<PostLink>> {
    let mut stmt = conn.prepare(
        "SELECT id, post_a, post_b, relationship, strength
         FROM links
         WHERE post_a = ?1 OR post_b = ?1
         ORDER BY strength DESC",
    )?;
    let rows = stmt.query_map(params![post_id], |row| {
        Ok(PostLink {
            id: row.get(0)?,
            post_a: row.get(1)?,
            post_b: row.get(2)?,
            relationship: row.get(3)?,
            strength: row.get(4)?,
        })
    })?;

    let mut links = Vec::new();
    for row in rows {
        links.push(row?);
    }
    Ok(links)
}

// --- Full-text search ---

const SEARCH_COLUMNS: &str = "p.id, p.title, p.source, p.published_at,
       snippet(posts_fts, -1, '', '', '...', 32),
       bm25(posts_fts),
       COALESCE(sc.final_score, 0)";

fn search_result_from_row(row: &Row) -> rusqlite::Result<SearchResult> {
    let published_at: Option<String> = row.get(3)?;
    Ok(SearchResult {
        post_id: row.get(0)?,
        title: row.get(1)?,
        source: row.get(2)?,
        published_at: published_at.as_deref().and_then(parse_timestamp),
        snippet: row.get(4)?,
        rank: row.get(5)?,
        final_score: row.get(6)?,
    })
}

/// Full-text search over titles and content, best bm25 match first.
pub fn search(conn: &Connection, query: &str, limit: u32) -> Result<Vec<SearchResult>> {
    let sql = format!(
        "SELECT {SEARCH_COLUMNS}
         FROM posts_fts
         JOIN posts p ON posts_fts.rowid = p.id
         LEFT JOIN scores sc ON p.id = sc.post_id
         WHERE posts_fts MATCH ?1
         ORDER BY bm25(posts_fts)
         LIMIT ?2"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![query, limit], search_result_from_row)
        .with_context(|| format!("Search failed for query: {query}"))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

/// Full-text search re-ranked by a blend of final score and text match:
/// `final_score * 0.3 - bm25 * 0.7`, descending. bm25 is negated because
/// lower bm25 means a better match.
pub fn search_ranked(conn: &Connection, query: &str, limit: u32) -> Result<Vec<SearchResult>> {
    let sql = format!(
        "SELECT {SEARCH_COLUMNS}
         FROM posts_fts
         JOIN posts p ON posts_fts.rowid = p.id
         LEFT JOIN scores sc ON p.id = sc.post_id
         WHERE posts_fts MATCH ?1
         ORDER BY (COALESCE(sc.final_score, 0) * 0.3 - bm25(posts_fts) * 0.7) DESC
         LIMIT ?2"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![query, limit], search_result_from_row)
        .with_context(|| format!("Search failed for query: {query}"))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

/// Drop and rebuild the full-text index from the posts table. Returns the
/// number of posts indexed. Normally the triggers keep the index fresh;
/// this is the recovery path.
pub fn rebuild_search_index(conn: &Connection) -> Result<usize> {
    conn.execute("DELETE FROM posts_fts", [])?;
    let indexed = conn.execute(
        "INSERT INTO posts_fts(rowid, title, content)
         SELECT id, title,
                CASE WHEN content_clean != '' THEN content_clean
                     ELSE content_raw END
         FROM posts",
        [],
    )?;
    Ok(indexed)
}

// --- Status counters ---

pub fn count_posts(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))?)
}

pub fn count_scored(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM scores", [], |row| row.get(0))?)
}

pub fn count_links(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM links", [], |row| row.get(0))?)
}

pub fn top_final_score(conn: &Connection) -> Result<Option<f64>> {
    Ok(conn.query_row("SELECT MAX(final_score) FROM scores", [], |row| row.get(0))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::create_tables;
    use chrono::TimeZone;

    fn test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        conn
    }

    fn add_post(conn: &Connection, url: &str, title: &str) -> i64 {
        insert_post(conn, "example.com", url, title, None, Some(Utc::now()), "").unwrap()
    }

    #[test]
    fn test_insert_and_get_post() {
        let conn = test_db();
        let published = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let id = insert_post(
            &conn,
            "example.com",
            "https://example.com/post",
            "A Post",
            Some("Ada"),
            Some(published),
            "<p>body</p>",
        )
        .unwrap();

        let post = get_post(&conn, id).unwrap().unwrap();
        assert_eq!(post.title, "A Post");
        assert_eq!(post.author.as_deref(), Some("Ada"));
        assert_eq!(post.published_at, Some(published));
        assert_eq!(post.content_raw, "<p>body</p>");
        assert!(post.final_score.is_none());
    }

    #[test]
    fn test_duplicate_url_rejected() {
        let conn = test_db();
        add_post(&conn, "https://example.com/p", "First");
        let dup = insert_post(
            &conn,
            "example.com",
            "https://example.com/p",
            "Second",
            None,
            None,
            "",
        );
        assert!(dup.is_err());
        assert!(post_exists(&conn, "https://example.com/p").unwrap());
        assert!(!post_exists(&conn, "https://example.com/other").unwrap());
    }

    #[test]
    fn test_list_posts_newest_first() {
        let conn = test_db();
        let old = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let new = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
        insert_post(&conn, "a", "https://a/1", "Old", None, Some(old), "").unwrap();
        insert_post(&conn, "a", "https://a/2", "New", None, Some(new), "").unwrap();

        let posts = list_posts(&conn, 10, 0).unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title, "New");
        assert_eq!(posts[1].title, "Old");
    }

    #[test]
    fn test_missing_published_at_reads_none() {
        let conn = test_db();
        let id = insert_post(&conn, "a", "https://a/1", "T", None, None, "").unwrap();
        let post = get_post(&conn, id).unwrap().unwrap();
        assert!(post.published_at.is_none());
    }

    #[test]
    fn test_update_content_clean() {
        let conn = test_db();
        let id = add_post(&conn, "https://a/1", "T");
        update_content_clean(&conn, id, "clean words here", 3).unwrap();

        let post = get_post(&conn, id).unwrap().unwrap();
        assert_eq!(post.content_clean, "clean words here");
        assert_eq!(post.word_count, 3);
    }

    #[test]
    fn test_score_upsert_and_roundtrip() {
        let conn = test_db();
        let id = add_post(&conn, "https://a/1", "T");

        assert_eq!(unscored_post_ids(&conn, 10).unwrap(), vec![id]);

        upsert_score(&conn, id, 10.0, 20.0, 30.0, 22.0).unwrap();
        assert!(unscored_post_ids(&conn, 10).unwrap().is_empty());

        let score = get_score(&conn, id).unwrap().unwrap();
        assert!((score.community - 10.0).abs() < f64::EPSILON);
        assert!((score.final_score - 22.0).abs() < f64::EPSILON);

        // Re-scoring overwrites in place
        upsert_score(&conn, id, 0.0, 50.0, 100.0, 50.0).unwrap();
        let score = get_score(&conn, id).unwrap().unwrap();
        assert!((score.final_score - 50.0).abs() < f64::EPSILON);
        assert_eq!(count_scored(&conn).unwrap(), 1);
    }

    #[test]
    fn test_final_score_joined_into_post() {
        let conn = test_db();
        let id = add_post(&conn, "https://a/1", "T");
        upsert_score(&conn, id, 1.0, 2.0, 3.0, 2.1).unwrap();

        let post = get_post(&conn, id).unwrap().unwrap();
        assert_eq!(post.final_score, Some(2.1));
    }

    #[test]
    fn test_link_upsert_identity() {
        let conn = test_db();
        let a = add_post(&conn, "https://a/1", "A");
        let b = add_post(&conn, "https://a/2", "B");

        // Reversed pair order normalizes to the same identity
        upsert_link(&conn, b, a, "shared_topics:rust", 0.5).unwrap();
        upsert_link(&conn, a, b, "shared_topics:rust", 0.75).unwrap();

        let links = links_for_post(&conn, a).unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!((links[0].post_a, links[0].post_b), (a, b));
        assert!((links[0].strength - 0.75).abs() < f64::EPSILON);

        // A different relationship is a different link
        upsert_link(&conn, a, b, "shared_topics:rust,api", 0.6).unwrap();
        assert_eq!(links_for_post(&conn, a).unwrap().len(), 2);
        assert_eq!(count_links(&conn).unwrap(), 2);
    }

    #[test]
    fn test_topics_roundtrip() {
        let conn = test_db();
        let id = add_post(&conn, "https://a/1", "T");

        assert!(get_post_topics(&conn, id).unwrap().is_empty());

        let topics = vec!["rust".to_string(), "databases".to_string()];
        set_post_topics(&conn, id, &topics).unwrap();
        assert_eq!(get_post_topics(&conn, id).unwrap(), topics);
    }

    #[test]
    fn test_search_matches_title_and_content() {
        let conn = test_db();
        let raft = insert_post(
            &conn,
            "a",
            "https://a/1",
            "Raft explained",
            None,
            None,
            "leader election and log replication walkthrough",
        )
        .unwrap();
        insert_post(&conn, "a", "https://a/2", "Sourdough", None, None, "flour and water").unwrap();

        let by_content = search(&conn, "replication", 10).unwrap();
        assert_eq!(by_content.len(), 1);
        assert_eq!(by_content[0].post_id, raft);
        assert!(by_content[0].snippet.contains("replication"));

        let by_title = search(&conn, "raft", 10).unwrap();
        assert_eq!(by_title.len(), 1);

        assert!(search(&conn, "kubernetes", 10).unwrap().is_empty());
    }

    #[test]
    fn test_search_respects_limit() {
        let conn = test_db();
        for i in 0..5 {
            insert_post(
                &conn,
                "a",
                &format!("https://a/{i}"),
                &format!("Post {i}"),
                None,
                None,
                "shared keyword everywhere",
            )
            .unwrap();
        }

        assert_eq!(search(&conn, "keyword", 3).unwrap().len(), 3);
    }

    #[test]
    fn test_search_ranked_prefers_high_scores() {
        let conn = test_db();
        // Identical text, so bm25 ties and the final score decides
        let low = insert_post(&conn, "a", "https://a/1", "Raft notes", None, None, "raft consensus").unwrap();
        let high = insert_post(&conn, "a", "https://a/2", "Raft notes", None, None, "raft consensus").unwrap();
        upsert_score(&conn, low, 0.0, 10.0, 10.0, 10.0).unwrap();
        upsert_score(&conn, high, 0.0, 90.0, 90.0, 90.0).unwrap();

        let results = search_ranked(&conn, "raft", 10).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].post_id, high);
        assert!((results[0].final_score - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_search_sees_updated_content() {
        let conn = test_db();
        let id = add_post(&conn, "https://a/1", "T");
        assert!(search(&conn, "freshly", 10).unwrap().is_empty());

        update_content_clean(&conn, id, "freshly cleaned words", 3).unwrap();
        assert_eq!(search(&conn, "freshly", 10).unwrap().len(), 1);
    }

    #[test]
    fn test_rebuild_search_index() {
        let conn = test_db();
        add_post(&conn, "https://a/1", "Raft consensus");
        add_post(&conn, "https://a/2", "Gossip protocols");

        // Wreck the index, then rebuild it
        conn.execute("DELETE FROM posts_fts", []).unwrap();
        assert!(search(&conn, "raft", 10).unwrap().is_empty());

        let indexed = rebuild_search_index(&conn).unwrap();
        assert_eq!(indexed, 2);
        assert_eq!(search(&conn, "raft", 10).unwrap().len(), 1);
    }

    #[test]
    fn test_status_counters() {
        let conn = test_db();
        assert_eq!(count_posts(&conn).unwrap(), 0);
        assert!(top_final_score(&conn).unwrap().is_none());

        let id = add_post(&conn, "https://a/1", "T");
        upsert_score(&conn, id, 0.0, 50.0, 100.0, 50.0).unwrap();

        assert_eq!(count_posts(&conn).unwrap(), 1);
        assert_eq!(top_final_score(&conn).unwrap(), Some(50.0));
    }
}
