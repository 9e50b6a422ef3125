// Database module

pub mod migrations;
pub mod schema;

use std::path::Path;

use anyhow::Result;
use rusqlite::Connection;

use crate::error::Result as HwResult;
use crate::events::{BehaviorEvent, EventSink};

/// Open or create a database at the given path
pub fn open_db(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;

    // Enable WAL mode for better concurrency
    conn.execute_batch("PRAGMA journal_mode = WAL;")?;

    // Run migrations
    migrations::run_migrations(&conn)?;

    Ok(conn)
}

/// Event sink backed by the events table.
pub struct SqliteEventSink {
    conn: Connection,
}

impl SqliteEventSink {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn into_connection(self) -> Connection {
        self.conn
    }
}

impl EventSink for SqliteEventSink {
    fn record_event(&mut self, event: &BehaviorEvent) -> HwResult<()> {
        schema::insert_event(&self.conn, event)?;
        Ok(())
    }
}
