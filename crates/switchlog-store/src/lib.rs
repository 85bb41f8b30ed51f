//! SQLite-backed session interval storage for switchlog.
//!
//! This crate records device on/off toggle events and reconstructs them
//! into non-overlapping per-group time intervals ("sessions"), tolerating
//! batches that leave a session still open.
//!
//! # Features
//!
//! - Reconcile ordered toggle batches into interval rows, joining a new
//!   batch onto a previously unfinished interval
//! - Window queries for intervals overlapping `[begin, end)`, always
//!   surfacing still-open intervals
//! - Atomic close-then-insert: a batch either fully applies or not at all
//! - CSV/JSON export of a queried window
//!
//! # Example
//!
//! ```no_run
//! use switchlog_store::{Store, WindowQuery};
//! use switchlog_types::{EventBatch, ToggleEvent};
//!
//! let mut store = Store::open_default()?;
//!
//! store.record_batch(&EventBatch {
//!     group_id: "c0ffee".to_string(),
//!     device: "garage heater".to_string(),
//!     events: vec![ToggleEvent { on: true, ts: 1_700_000_000_000 }],
//! })?;
//!
//! let recent = store.query_overlap(&WindowQuery::last_24h())?;
//! # Ok::<(), switchlog_store::Error>(())
//! ```

mod error;
mod queries;
mod reconcile;
mod schema;
mod store;

pub use error::{Error, Result};
pub use queries::WindowQuery;
pub use reconcile::{ReconcileOutcome, pair_events};
pub use store::Store;

/// Default database path following platform conventions.
///
/// - Linux: `~/.local/share/switchlog/sessions.db`
/// - macOS: `~/Library/Application Support/switchlog/sessions.db`
/// - Windows: `C:\Users\<user>\AppData\Local\switchlog\sessions.db`
pub fn default_db_path() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("switchlog")
        .join("sessions.db")
}
