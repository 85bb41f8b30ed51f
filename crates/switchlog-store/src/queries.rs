//! Window query builder for stored intervals.
//!
//! A window query answers "which intervals overlap `[begin, end)`",
//! including intervals that are still open. Open intervals are always
//! relevant to a window no matter how long ago they started, so they are
//! matched regardless of `begin`.
//!
//! # Example
//!
//! ```
//! use switchlog_store::{Store, WindowQuery};
//!
//! let store = Store::open_in_memory()?;
//!
//! // Everything overlapping the collaborator's default trailing day
//! let recent = store.query_overlap(&WindowQuery::last_24h())?;
//!
//! // A specific window, one group only
//! let query = WindowQuery::new(1_000, 2_000).group("c0ffee");
//! let intervals = store.query_overlap(&query)?;
//! # Ok::<(), switchlog_store::Error>(())
//! ```

use time::{Duration, OffsetDateTime};

/// Query for intervals overlapping a `[begin, end)` window.
///
/// An interval matches when `start_at < end` and either `stop_at > begin`
/// or the interval is still open (`stop_at = 0`). Results are ordered by
/// `start_at` descending. There is no pagination; callers are expected to
/// bound the window to a reasonable span.
#[derive(Debug, Clone)]
pub struct WindowQuery {
    /// Window start, epoch milliseconds (inclusive).
    pub begin: i64,
    /// Window end, epoch milliseconds (exclusive).
    pub end: i64,
    /// Restrict to one group (optional).
    pub group_id: Option<String>,
}

impl WindowQuery {
    /// Query the window `[begin, end)`.
    pub fn new(begin: i64, end: i64) -> Self {
        Self {
            begin,
            end,
            group_id: None,
        }
    }

    /// Query the trailing 24 hours ending now, the default window used by
    /// dashboard collaborators.
    pub fn last_24h() -> Self {
        let end = now_ms();
        Self::new(end - Duration::hours(24).whole_milliseconds() as i64, end)
    }

    /// Restrict the query to one group.
    pub fn group(mut self, group_id: &str) -> Self {
        self.group_id = Some(group_id.to_string());
        self
    }

    /// Build the SQL for this window.
    pub(crate) fn build_sql(&self) -> String {
        let mut sql = String::from(
            "SELECT id, group_id, device, start_at, stop_at FROM intervals \
             WHERE start_at < ? AND (stop_at > ? OR stop_at = 0)",
        );
        if self.group_id.is_some() {
            sql.push_str(" AND group_id = ?");
        }
        sql.push_str(" ORDER BY start_at DESC");
        sql
    }

    /// Positional parameters matching [`Self::build_sql`].
    pub(crate) fn params(&self) -> Vec<Box<dyn rusqlite::ToSql>> {
        let mut params: Vec<Box<dyn rusqlite::ToSql>> =
            vec![Box::new(self.end), Box::new(self.begin)];
        if let Some(ref group_id) = self.group_id {
            params.push(Box::new(group_id.clone()));
        }
        params
    }
}

/// Current wall-clock time in epoch milliseconds.
pub(crate) fn now_ms() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_query_fields() {
        let query = WindowQuery::new(100, 200);
        assert_eq!(query.begin, 100);
        assert_eq!(query.end, 200);
        assert!(query.group_id.is_none());
    }

    #[test]
    fn test_window_query_group_filter() {
        let query = WindowQuery::new(100, 200).group("g-17");
        assert_eq!(query.group_id, Some("g-17".to_string()));
    }

    #[test]
    fn test_build_sql_without_group() {
        let sql = WindowQuery::new(100, 200).build_sql();
        assert!(sql.contains("start_at < ?"));
        assert!(sql.contains("stop_at > ? OR stop_at = 0"));
        assert!(sql.contains("ORDER BY start_at DESC"));
        assert!(!sql.contains("group_id = ?"));
    }

    #[test]
    fn test_build_sql_with_group() {
        let query = WindowQuery::new(100, 200).group("g-17");
        let sql = query.build_sql();
        assert!(sql.contains("AND group_id = ?"));
        assert_eq!(query.params().len(), 3);
    }

    #[test]
    fn test_last_24h_spans_a_day() {
        let query = WindowQuery::last_24h();
        assert_eq!(query.end - query.begin, 24 * 60 * 60 * 1000);
        assert!(query.end <= now_ms() + 1000);
    }
}
