//! Reconciliation of toggle event batches into session intervals.
//!
//! A batch is an ordered run of on/off toggles for one group. Reconciling
//! it means joining the batch onto whatever the store already knows: a
//! leading "off" closes the group's open interval if one exists, and the
//! remaining events pair up left to right into closed intervals, with a
//! trailing unmatched "on" left open.
//!
//! # Example
//!
//! ```
//! use switchlog_store::Store;
//! use switchlog_types::{EventBatch, ToggleEvent};
//!
//! let mut store = Store::open_in_memory()?;
//! let outcome = store.record_batch(&EventBatch {
//!     group_id: "c0ffee".to_string(),
//!     device: "garage heater".to_string(),
//!     events: vec![
//!         ToggleEvent { on: true, ts: 1_000 },
//!         ToggleEvent { on: false, ts: 5_000 },
//!         ToggleEvent { on: true, ts: 8_000 },
//!     ],
//! })?;
//! assert_eq!(outcome.inserted.len(), 2);
//! assert!(outcome.inserted[1].is_open());
//! # Ok::<(), switchlog_store::Error>(())
//! ```

use rusqlite::TransactionBehavior;
use tracing::{debug, info};

use switchlog_types::{EventBatch, Interval, STOP_OPEN, ToggleEvent};

use crate::error::Result;
use crate::store::{Store, close_open_before, insert_all};

/// What a reconciliation did to the store.
#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    /// Whether a previously open interval was closed by the batch's
    /// leading "off" event.
    pub closed_existing: bool,
    /// The newly inserted intervals, in batch order, with row ids assigned.
    pub inserted: Vec<Interval>,
}

/// Pair events into intervals, left to right.
///
/// Every "on" event opens an interval stopped by the timestamp of the
/// following event if there is one, else left open. "off" events never
/// produce rows of their own; they only terminate the interval opened by
/// the preceding "on". Alternation is deliberately not re-validated, so a
/// malformed run of consecutive "on" events yields intervals stopped by
/// the next event's timestamp whatever its kind. Downstream consumers
/// depend on this exact pairing rule.
pub fn pair_events(group_id: &str, device: &str, events: &[ToggleEvent]) -> Vec<Interval> {
    let mut intervals = Vec::new();

    for (i, event) in events.iter().enumerate() {
        if event.on {
            let stop_at = events.get(i + 1).map_or(STOP_OPEN, |next| next.ts);
            intervals.push(Interval::new(group_id, device, event.ts, stop_at));
        }
    }

    intervals
}

impl Store {
    /// Reconcile an event batch into the store.
    ///
    /// Validation happens before any storage access; a batch that fails it
    /// has mutated nothing. The close-then-insert sequence then runs inside
    /// a single exclusive transaction, so no partial effect is ever visible
    /// and concurrent batches for the same group cannot both miss the open
    /// interval and synthesize duplicate starts.
    ///
    /// A batch whose first event is "off" either closes the group's open
    /// interval (absorbing that event) or, when no open interval exists,
    /// gains a synthesized matching "on" at the same timestamp. The lone
    /// "off" then still produces a well-formed zero-length interval rather
    /// than being silently dropped.
    pub fn record_batch(&mut self, batch: &EventBatch) -> Result<ReconcileOutcome> {
        batch.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut events = batch.events.clone();
        let mut closed_existing = false;

        // A leading "off" belongs to an interval opened in an earlier batch
        if !events[0].on {
            let first_ts = events[0].ts;
            let affected = close_open_before(&tx, &batch.group_id, first_ts, first_ts)?;

            if affected == 1 {
                closed_existing = true;
                events.remove(0);
                debug!(
                    group_id = %batch.group_id,
                    stop_at = first_ts,
                    "closed open interval from previous batch"
                );
            } else {
                // No open interval to close; synthesize the matching "on"
                events.insert(
                    0,
                    ToggleEvent {
                        on: true,
                        ts: first_ts,
                    },
                );
            }
        }

        let mut inserted = pair_events(&batch.group_id, &batch.device, &events);
        if !inserted.is_empty() {
            insert_all(&tx, &mut inserted)?;
        }

        tx.commit()?;

        info!(
            group_id = %batch.group_id,
            device = %batch.device,
            closed_existing,
            inserted = inserted.len(),
            "reconciled event batch"
        );

        Ok(ReconcileOutcome {
            closed_existing,
            inserted,
        })
    }
}
