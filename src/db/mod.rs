//! Database module for SQLite persistence.
//!
//! SQLite is the source of truth for elections and ballots. The
//! `(election_id, student_id, position)` unique index on `votes` is the only
//! guard against double voting.

mod repository;

pub use repository::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS elections (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            status TEXT NOT NULL CHECK (status IN ('scheduled', 'open', 'closed')),
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS candidates (
            election_id TEXT NOT NULL REFERENCES elections(id),
            id TEXT NOT NULL,
            name TEXT NOT NULL,
            position TEXT NOT NULL,
            photo_url TEXT,
            sort_order INTEGER NOT NULL,
            PRIMARY KEY (election_id, id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS votes (
            id TEXT PRIMARY KEY,
            election_id TEXT NOT NULL,
            student_id TEXT NOT NULL,
            position TEXT NOT NULL,
            candidate_id TEXT NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY (election_id, candidate_id) REFERENCES candidates(election_id, id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_votes_one_per_position
            ON votes(election_id, student_id, position);
        CREATE INDEX IF NOT EXISTS idx_votes_student ON votes(student_id);
        CREATE INDEX IF NOT EXISTS idx_candidates_sort ON candidates(election_id, sort_order);
        CREATE INDEX IF NOT EXISTS idx_elections_status ON elections(status, created_at);
        "#,
    )
    .execute(pool)
    .await?;

    // Ballots are append-only
    sqlx::query(
        r#"
        CREATE TRIGGER IF NOT EXISTS votes_no_update
        BEFORE UPDATE ON votes
        BEGIN
            SELECT RAISE(ABORT, 'ballots are immutable');
        END;
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TRIGGER IF NOT EXISTS votes_no_delete
        BEFORE DELETE ON votes
        BEGIN
            SELECT RAISE(ABORT, 'ballots are immutable');
        END;
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
