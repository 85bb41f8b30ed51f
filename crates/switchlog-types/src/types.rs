//! Core types for toggle events and session intervals.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};

/// Sentinel `stop_at` value marking an interval that has not stopped yet.
pub const STOP_OPEN: i64 = 0;

/// A single on/off toggle reported by a device.
///
/// `ts` is a raw epoch-milliseconds timestamp; no timezone handling is
/// applied anywhere in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ToggleEvent {
    /// `true` for "turned on", `false` for "turned off".
    pub on: bool,
    /// Epoch milliseconds at which the toggle happened.
    pub ts: i64,
}

/// An ordered batch of toggle events submitted in one reconciliation call.
///
/// Events are expected to alternate on/off in timestamp order, but only the
/// leading event is treated specially by the reconciler; alternation is not
/// re-validated after that (see [`crate::Interval`] pairing semantics).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct EventBatch {
    /// Stable key scoping which toggle history the events belong to.
    pub group_id: String,
    /// Free-text device label, descriptive only.
    pub device: String,
    /// The ordered toggle events.
    pub events: Vec<ToggleEvent>,
}

impl EventBatch {
    /// Decode a batch from a raw JSON payload.
    ///
    /// Shape errors (non-boolean `on`, non-numeric `ts`, missing fields)
    /// surface as [`ValidationError::Malformed`] so the caller can reject
    /// the submission before touching storage.
    ///
    /// # Examples
    ///
    /// ```
    /// use switchlog_types::EventBatch;
    ///
    /// let batch = EventBatch::from_json(
    ///     r#"{"groupId":"g1","device":"pump","events":[{"on":true,"ts":1000}]}"#,
    /// ).unwrap();
    /// assert_eq!(batch.events.len(), 1);
    ///
    /// assert!(EventBatch::from_json(
    ///     r#"{"groupId":"g1","device":"pump","events":[{"on":"yes","ts":1000}]}"#,
    /// ).is_err());
    /// ```
    #[cfg(feature = "serde")]
    pub fn from_json(payload: &str) -> ValidationResult<Self> {
        let batch: Self =
            serde_json::from_str(payload).map_err(|e| ValidationError::Malformed(e.to_string()))?;
        batch.validate()?;
        Ok(batch)
    }

    /// Check the batch preconditions: non-empty `group_id`, non-empty
    /// `device`, at least one event.
    pub fn validate(&self) -> ValidationResult<()> {
        if self.group_id.is_empty() {
            return Err(ValidationError::EmptyGroupId);
        }
        if self.device.is_empty() {
            return Err(ValidationError::EmptyDevice);
        }
        if self.events.is_empty() {
            return Err(ValidationError::EmptyBatch);
        }
        Ok(())
    }
}

/// A recorded on/off session for one group.
///
/// The sole persisted entity. An interval is created closed when a batch
/// contains a matched on/off pair, or open (`stop_at == STOP_OPEN`) when a
/// batch ends on an unmatched "on". Closing the open interval is the only
/// mutation ever applied; intervals are never deleted or split.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Interval {
    /// Database row ID; 0 until assigned by the store.
    pub id: i64,
    /// Group identifier owning this session.
    pub group_id: String,
    /// Device label at the time of recording.
    pub device: String,
    /// Epoch milliseconds at which the device turned on.
    pub start_at: i64,
    /// Epoch milliseconds at which the device turned off, or
    /// [`STOP_OPEN`] while still on.
    pub stop_at: i64,
}

impl Interval {
    /// Create a not-yet-stored interval.
    pub fn new(group_id: &str, device: &str, start_at: i64, stop_at: i64) -> Self {
        Self {
            id: 0,
            group_id: group_id.to_string(),
            device: device.to_string(),
            start_at,
            stop_at,
        }
    }

    /// Whether the interval is still open (device still on).
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.stop_at == STOP_OPEN
    }

    /// Duration in milliseconds, or `None` while the interval is open.
    #[must_use]
    pub fn duration_ms(&self) -> Option<i64> {
        if self.is_open() {
            None
        } else {
            Some(self.stop_at - self.start_at)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(events: Vec<ToggleEvent>) -> EventBatch {
        EventBatch {
            group_id: "group-1".to_string(),
            device: "heater".to_string(),
            events,
        }
    }

    #[test]
    fn test_validate_accepts_well_formed_batch() {
        let b = batch(vec![ToggleEvent { on: true, ts: 1000 }]);
        assert!(b.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_group_id() {
        let mut b = batch(vec![ToggleEvent { on: true, ts: 1000 }]);
        b.group_id.clear();
        assert!(matches!(b.validate(), Err(ValidationError::EmptyGroupId)));
    }

    #[test]
    fn test_validate_rejects_empty_device() {
        let mut b = batch(vec![ToggleEvent { on: true, ts: 1000 }]);
        b.device.clear();
        assert!(matches!(b.validate(), Err(ValidationError::EmptyDevice)));
    }

    #[test]
    fn test_validate_rejects_empty_events() {
        let b = batch(Vec::new());
        assert!(matches!(b.validate(), Err(ValidationError::EmptyBatch)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json_round_trip() {
        let b = EventBatch::from_json(
            r#"{"groupId":"g1","device":"pump","events":[{"on":true,"ts":10},{"on":false,"ts":20}]}"#,
        )
        .unwrap();
        assert_eq!(b.group_id, "g1");
        assert_eq!(b.events, vec![
            ToggleEvent { on: true, ts: 10 },
            ToggleEvent { on: false, ts: 20 },
        ]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json_rejects_non_boolean_on() {
        let err = EventBatch::from_json(
            r#"{"groupId":"g1","device":"pump","events":[{"on":1,"ts":10}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::Malformed(_)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json_rejects_non_numeric_ts() {
        let err = EventBatch::from_json(
            r#"{"groupId":"g1","device":"pump","events":[{"on":true,"ts":"soon"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::Malformed(_)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json_rejects_missing_events() {
        let err = EventBatch::from_json(r#"{"groupId":"g1","device":"pump"}"#).unwrap_err();
        assert!(matches!(err, ValidationError::Malformed(_)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json_applies_validation() {
        let err =
            EventBatch::from_json(r#"{"groupId":"","device":"pump","events":[{"on":true,"ts":1}]}"#)
                .unwrap_err();
        assert!(matches!(err, ValidationError::EmptyGroupId));
    }

    #[test]
    fn test_interval_open_sentinel() {
        let open = Interval::new("g1", "pump", 100, STOP_OPEN);
        assert!(open.is_open());
        assert_eq!(open.duration_ms(), None);

        let closed = Interval::new("g1", "pump", 100, 250);
        assert!(!closed.is_open());
        assert_eq!(closed.duration_ms(), Some(150));
    }

    #[test]
    fn test_interval_new_has_unassigned_id() {
        let interval = Interval::new("g1", "pump", 100, 200);
        assert_eq!(interval.id, 0);
    }
}
