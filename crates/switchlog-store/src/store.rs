//! Main store implementation.

use std::io::Write;
use std::path::Path;

use rusqlite::{Connection, OptionalExtension, Row, TransactionBehavior, params};
use tracing::{debug, info};

use switchlog_types::Interval;

use crate::error::{Error, Result};
use crate::queries::WindowQuery;
use crate::schema;

/// SQLite-based store for session intervals.
///
/// One open interval at most may exist per group; the store's conditional
/// single-row update in [`Store::close_open_before`] is shaped so that even
/// a corrupted database (several open rows) never closes more than one.
///
/// Mutating operations take `&mut self` and run inside an exclusive write
/// transaction, so batches touching the same group are serialized rather
/// than racing to synthesize duplicate session starts.
pub struct Store {
    pub(crate) conn: Connection,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        info!("Opening database at {}", path.display());
        let conn = Connection::open(path)?;

        // Enable foreign keys and WAL mode for better performance
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        schema::initialize(&conn)?;

        Ok(Self { conn })
    }

    /// Open the default database location.
    pub fn open_default() -> Result<Self> {
        Self::open(crate::default_db_path())
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    /// Close the open interval for `group_id` whose `start_at` is strictly
    /// before `ts`, setting its stop time to `stop_at`.
    ///
    /// Returns the number of rows affected (0 or 1). At most one row is ever
    /// updated, even if the single-open invariant has been violated.
    pub fn close_open_before(&mut self, group_id: &str, ts: i64, stop_at: i64) -> Result<usize> {
        close_open_before(&self.conn, group_id, ts, stop_at)
    }

    /// Append the given intervals as new rows, atomically as a unit.
    ///
    /// Assigns the database row id back into each interval. Either all
    /// intervals appear or none do.
    pub fn insert_all(&mut self, intervals: &mut [Interval]) -> Result<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        insert_all(&tx, intervals)?;
        tx.commit()?;
        Ok(())
    }

    /// Fetch every interval overlapping the query's window, newest first.
    pub fn query_overlap(&self, query: &WindowQuery) -> Result<Vec<Interval>> {
        let sql = query.build_sql();
        let params = query.params();

        debug!("Executing query: {}", sql);

        let params_ref: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let intervals = stmt
            .query_map(params_ref.as_slice(), row_to_interval)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(intervals)
    }

    /// Get the currently open interval for a group, if any.
    pub fn open_interval(&self, group_id: &str) -> Result<Option<Interval>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, group_id, device, start_at, stop_at FROM intervals
             WHERE group_id = ? AND stop_at = 0
             ORDER BY start_at DESC
             LIMIT 1",
        )?;

        let interval = stmt.query_row([group_id], row_to_interval).optional()?;
        Ok(interval)
    }

    /// Count stored intervals, optionally for one group.
    pub fn count_intervals(&self, group_id: Option<&str>) -> Result<u64> {
        let count: i64 = match group_id {
            Some(id) => self.conn.query_row(
                "SELECT COUNT(*) FROM intervals WHERE group_id = ?",
                [id],
                |row| row.get(0),
            )?,
            None => self
                .conn
                .query_row("SELECT COUNT(*) FROM intervals", [], |row| row.get(0))?,
        };

        Ok(count as u64)
    }
}

// Export operations
impl Store {
    /// Export the intervals matching a window query as CSV.
    ///
    /// Returns the number of records written.
    pub fn export_csv<W: Write>(&self, query: &WindowQuery, writer: W) -> Result<usize> {
        let intervals = self.query_overlap(query)?;

        let mut wtr = csv::Writer::from_writer(writer);
        for interval in &intervals {
            wtr.serialize(interval)?;
        }
        wtr.flush()?;

        info!("Exported {} intervals as CSV", intervals.len());
        Ok(intervals.len())
    }

    /// Export the intervals matching a window query as a JSON array.
    ///
    /// Returns the number of records written.
    pub fn export_json<W: Write>(&self, query: &WindowQuery, writer: W) -> Result<usize> {
        let intervals = self.query_overlap(query)?;
        serde_json::to_writer(writer, &intervals)?;

        info!("Exported {} intervals as JSON", intervals.len());
        Ok(intervals.len())
    }
}

fn row_to_interval(row: &Row<'_>) -> rusqlite::Result<Interval> {
    Ok(Interval {
        id: row.get(0)?,
        group_id: row.get(1)?,
        device: row.get(2)?,
        start_at: row.get(3)?,
        stop_at: row.get(4)?,
    })
}

/// Single-row conditional close, usable inside a caller's transaction.
///
/// The inner `LIMIT 1` subquery keeps the update to one row even when more
/// than one open interval exists for the group.
pub(crate) fn close_open_before(
    conn: &Connection,
    group_id: &str,
    ts: i64,
    stop_at: i64,
) -> Result<usize> {
    let affected = conn.execute(
        "UPDATE intervals SET stop_at = ?1
         WHERE id IN (
             SELECT id FROM intervals
             WHERE group_id = ?2 AND stop_at = 0 AND start_at < ?3
             ORDER BY start_at DESC
             LIMIT 1
         )",
        params![stop_at, group_id, ts],
    )?;

    Ok(affected)
}

/// Parameterized bulk insert, usable inside a caller's transaction.
pub(crate) fn insert_all(conn: &Connection, intervals: &mut [Interval]) -> Result<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO intervals (group_id, device, start_at, stop_at) VALUES (?1, ?2, ?3, ?4)",
    )?;

    for interval in intervals.iter_mut() {
        stmt.execute(params![
            interval.group_id,
            interval.device,
            interval.start_at,
            interval.stop_at,
        ])?;
        interval.id = conn.last_insert_rowid();
    }

    Ok(())
}
