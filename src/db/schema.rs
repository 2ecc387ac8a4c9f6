// Database schema — table creation and migrations.
//
// Simple version-based migrations: a `schema_version` table tracks which
// migrations have run, and each migration is a function executing SQL.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Create all tables if they don't exist yet.
///
/// Idempotent — safe to call on every startup.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        -- Tracks schema version for future migrations
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Stored posts. Timestamps are RFC 3339 TEXT; published_at may be
        -- NULL when the source supplied none.
        CREATE TABLE IF NOT EXISTS posts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            source TEXT NOT NULL,
            url TEXT NOT NULL UNIQUE,
            title TEXT NOT NULL,
            author TEXT,
            published_at TEXT,
            fetched_at TEXT NOT NULL DEFAULT (datetime('now')),
            content_raw TEXT NOT NULL DEFAULT '',
            content_clean TEXT NOT NULL DEFAULT '',
            word_count INTEGER NOT NULL DEFAULT 0
        );

        -- One score row per post; all four components written together
        CREATE TABLE IF NOT EXISTS scores (
            post_id INTEGER PRIMARY KEY REFERENCES posts(id),
            community_score REAL NOT NULL,
            relevance_score REAL NOT NULL,
            novelty_score REAL NOT NULL,
            final_score REAL NOT NULL,
            scored_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Topic links. post_a < post_b by convention; identity is the
        -- pair plus the relationship string, so re-linking upserts.
        CREATE TABLE IF NOT EXISTS links (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            post_a INTEGER NOT NULL REFERENCES posts(id),
            post_b INTEGER NOT NULL REFERENCES posts(id),
            relationship TEXT NOT NULL,
            strength REAL NOT NULL,
            UNIQUE(post_a, post_b, relationship)
        );

        CREATE INDEX IF NOT EXISTS idx_posts_published ON posts(published_at);
        CREATE INDEX IF NOT EXISTS idx_scores_final ON scores(final_score DESC);
        CREATE INDEX IF NOT EXISTS idx_links_posts ON links(post_a, post_b);
        ",
    )
    .context("Failed to create database tables")?;

    // Record initial schema version if not already set
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [1],
    )?;

    // Migration v2: cache each post's extracted topic set (JSON array).
    // Written by the link pass, read by `show` — saves re-classifying on
    // every display.
    run_migration(conn, 2, |c| {
        c.execute_batch("ALTER TABLE posts ADD COLUMN topics TEXT;")
    })?;

    // Migration v3: FTS5 full-text index over titles and content, kept in
    // sync by triggers. The indexed content follows the same fallback rule
    // as scoring: cleaned text when present, raw otherwise.
    run_migration(conn, 3, |c| {
        c.execute_batch(
            "
            CREATE VIRTUAL TABLE posts_fts USING fts5(title, content);

            CREATE TRIGGER posts_fts_ai AFTER INSERT ON posts BEGIN
                INSERT INTO posts_fts(rowid, title, content)
                VALUES (new.id, new.title,
                        CASE WHEN new.content_clean != '' THEN new.content_clean
                             ELSE new.content_raw END);
            END;

            CREATE TRIGGER posts_fts_au AFTER UPDATE ON posts BEGIN
                DELETE FROM posts_fts WHERE rowid = old.id;
                INSERT INTO posts_fts(rowid, title, content)
                VALUES (new.id, new.title,
                        CASE WHEN new.content_clean != '' THEN new.content_clean
                             ELSE new.content_raw END);
            END;

            CREATE TRIGGER posts_fts_ad AFTER DELETE ON posts BEGIN
                DELETE FROM posts_fts WHERE rowid = old.id;
            END;

            -- Backfill for databases that predate the index
            INSERT INTO posts_fts(rowid, title, content)
            SELECT id, title,
                   CASE WHEN content_clean != '' THEN content_clean
                        ELSE content_raw END
            FROM posts;
            ",
        )
    })?;

    Ok(())
}

/// Run a migration if it hasn't been applied yet.
fn run_migration<F>(conn: &Connection, version: i64, migrate: F) -> Result<()>
where
    F: FnOnce(&Connection) -> rusqlite::Result<()>,
{
    let already_applied: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM schema_version WHERE version = ?1",
        [version],
        |row| row.get(0),
    )?;

    if !already_applied {
        migrate(conn).with_context(|| format!("Migration v{version} failed"))?;
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [version],
        )?;
    }

    Ok(())
}

/// Count the number of tables in the database (useful for init confirmation).
pub fn table_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tables_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        create_tables(&conn).unwrap();
    }

    #[test]
    fn test_table_count() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        let count = table_count(&conn).unwrap();
        // schema_version, posts, scores, links = 4 tables
        // (+ the sqlite_sequence table AUTOINCREMENT creates)
        assert!(count >= 4, "expected at least 4 tables, got {count}");
    }

    #[test]
    fn test_migration_v2_adds_topics_column() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();

        conn.execute(
            "INSERT INTO posts (source, url, title, topics)
             VALUES ('b', 'https://b.example/1', 'T', '[\"rust\"]')",
            [],
        )
        .unwrap();

        let topics: String = conn
            .query_row("SELECT topics FROM posts WHERE url = 'https://b.example/1'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(topics, "[\"rust\"]");
    }

    #[test]
    fn test_migrations_run_once() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        create_tables(&conn).unwrap();
        create_tables(&conn).unwrap();

        let versions: Vec<i64> = conn
            .prepare("SELECT version FROM schema_version ORDER BY version")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(versions, vec![1, 2, 3]);
    }

    #[test]
    fn test_fts_triggers_track_posts() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();

        conn.execute(
            "INSERT INTO posts (source, url, title, content_raw)
             VALUES ('b', 'https://b.example/1', 'Raft explained', 'leader election and log replication')",
            [],
        )
        .unwrap();

        let hits: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM posts_fts WHERE posts_fts MATCH 'replication'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(hits, 1);

        // An update re-indexes the row
        conn.execute(
            "UPDATE posts SET content_clean = 'gossip protocols instead' WHERE title = 'Raft explained'",
            [],
        )
        .unwrap();

        let stale: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM posts_fts WHERE posts_fts MATCH 'replication'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        let fresh: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM posts_fts WHERE posts_fts MATCH 'gossip'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(stale, 0);
        assert_eq!(fresh, 1);
    }
}
