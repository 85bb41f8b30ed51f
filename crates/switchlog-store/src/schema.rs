//! Database schema and migrations.

use rusqlite::Connection;
use tracing::debug;

use crate::error::{Error, Result};

/// Current schema version, tracked via SQLite's `user_version` pragma.
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema, migrating older databases forward.
pub fn initialize(conn: &Connection) -> Result<()> {
    let version: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    if version > SCHEMA_VERSION {
        return Err(Error::SchemaTooNew {
            found: version,
            supported: SCHEMA_VERSION,
        });
    }

    if version == 0 {
        debug!("creating fresh schema at version {SCHEMA_VERSION}");
        create_schema(conn)?;
    } else if version < SCHEMA_VERSION {
        migrate(conn, version)?;
    }

    conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    Ok(())
}

fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Session intervals; stop_at = 0 marks an interval still open
        CREATE TABLE IF NOT EXISTS intervals (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            group_id TEXT NOT NULL,
            device TEXT NOT NULL,
            start_at INTEGER NOT NULL,
            stop_at INTEGER NOT NULL DEFAULT 0
        );

        -- Open-interval lookup: (group, stop_at = 0) hits this directly
        CREATE INDEX IF NOT EXISTS idx_intervals_group_open
            ON intervals(group_id, stop_at, start_at);

        -- Window queries scan by start_at
        CREATE INDEX IF NOT EXISTS idx_intervals_window
            ON intervals(start_at, stop_at);
        "#,
    )?;

    Ok(())
}

/// Run migrations from `old_version` to [`SCHEMA_VERSION`].
fn migrate(conn: &Connection, old_version: i32) -> Result<()> {
    // Add future migrations here
    // if old_version < 2 { migrate_to_v2(conn)?; }

    let _ = (conn, old_version);
    Ok(())
}
