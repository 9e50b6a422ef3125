// Event table access
// Insert/list/delete helpers over the events table. The pipeline
// deduplicates before inserting, so plain INSERTs are enough here.

use anyhow::Result;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::events::{Behavior, BehaviorEvent};

/// A stored event row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRow {
    pub id: i64,
    pub subject_id: String,
    pub behavior: String,
    pub event_value: f64,
    pub duration_secs: Option<f64>,
    pub timestamp_secs: Option<f64>,
    pub video_name: String,
    pub video_date: String,
    pub video_time: String,
    pub camera_id: String,
    pub created_at: String,
}

/// Insert one finalized event. Sustained behaviors fill duration_secs,
/// collisions fill timestamp_secs; event_value mirrors whichever applies.
pub fn insert_event(conn: &Connection, event: &BehaviorEvent) -> Result<i64> {
    let (duration, timestamp) = match event.behavior {
        Behavior::Grooming | Behavior::Drinking => (Some(event.value), None),
        Behavior::Collision => (None, Some(event.value)),
    };

    conn.execute(
        "INSERT INTO events (subject_id, behavior, event_value, duration_secs, timestamp_secs,
                             video_name, video_date, video_time, camera_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        rusqlite::params![
            event.subject_id,
            event.behavior.as_str(),
            event.value,
            duration,
            timestamp,
            event.video_name,
            event.video_date,
            event.video_time,
            event.camera_id,
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

/// List stored events, optionally filtered by video and/or behavior.
pub fn list_events(
    conn: &Connection,
    video_name: Option<&str>,
    behavior: Option<&str>,
    limit: i64,
) -> Result<Vec<EventRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, subject_id, behavior, event_value, duration_secs, timestamp_secs,
                video_name, video_date, video_time, camera_id, created_at
         FROM events
         WHERE (?1 IS NULL OR video_name = ?1)
           AND (?2 IS NULL OR behavior = ?2)
         ORDER BY id
         LIMIT ?3",
    )?;

    let rows = stmt
        .query_map(rusqlite::params![video_name, behavior, limit], |row| {
            Ok(EventRow {
                id: row.get(0)?,
                subject_id: row.get(1)?,
                behavior: row.get(2)?,
                event_value: row.get(3)?,
                duration_secs: row.get(4)?,
                timestamp_secs: row.get(5)?,
                video_name: row.get(6)?,
                video_date: row.get(7)?,
                video_time: row.get(8)?,
                camera_id: row.get(9)?,
                created_at: row.get(10)?,
            })
        })?
        .collect::<std::result::Result<Vec<EventRow>, _>>()?;

    Ok(rows)
}

/// Remove every event a previous run of the same video produced.
/// Called before re-analysis so a video never accumulates duplicate rows.
pub fn delete_events_for_video(conn: &Connection, video_name: &str) -> Result<usize> {
    let deleted = conn.execute("DELETE FROM events WHERE video_name = ?1", [video_name])?;
    Ok(deleted)
}
