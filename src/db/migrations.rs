// Database migrations
// Migrations are forward-only. Never edit or delete a migration after it ships.

use anyhow::Result;
use rusqlite::Connection;

/// All migrations in order. Each migration is a SQL string.
const MIGRATIONS: &[&str] = &[
    // Migration 1: Initial schema
    r#"
    -- Behavioral events, one row per finalized event
    CREATE TABLE events (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        subject_id TEXT NOT NULL,
        behavior TEXT NOT NULL CHECK (behavior IN ('grooming', 'drinking', 'collision')),
        event_value REAL NOT NULL,
        duration_secs REAL,
        timestamp_secs REAL,
        video_name TEXT NOT NULL,
        video_date TEXT NOT NULL,
        video_time TEXT NOT NULL,
        camera_id TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE INDEX idx_events_video ON events(video_name);
    CREATE INDEX idx_events_subject ON events(subject_id);
    CREATE INDEX idx_events_behavior ON events(behavior);
    "#,
];

/// Get current schema version from database
fn get_schema_version(conn: &Connection) -> Result<u32> {
    let version: u32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    Ok(version)
}

/// Run all pending migrations (crash-safe)
pub fn run_migrations(conn: &Connection) -> Result<()> {
    let current_version = get_schema_version(conn)?;
    let target_version = MIGRATIONS.len() as u32;

    // Refuse to open a DB created by a newer build
    if current_version > target_version {
        anyhow::bail!(
            "Database schema version {} is newer than this build supports (max {})",
            current_version,
            target_version
        );
    }

    if current_version == target_version {
        return Ok(());
    }

    // Apply pending migrations one-by-one
    for (i, migration) in MIGRATIONS.iter().enumerate() {
        let migration_version = (i + 1) as u32;
        if migration_version <= current_version {
            continue;
        }

        conn.execute_batch(migration)?;
        conn.execute_batch(&format!("PRAGMA user_version = {}", migration_version))?;

        log::debug!("applied migration {}", migration_version);
    }

    Ok(())
}
