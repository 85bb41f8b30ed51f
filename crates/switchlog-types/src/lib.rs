//! Platform-agnostic types for switchlog on/off session recording.
//!
//! This crate provides the shared types used by the storage layer
//! (switchlog-store) and by any transport that submits event batches.
//!
//! # Features
//!
//! - Toggle event and event batch types with precondition validation
//! - The persisted `Interval` entity with its open-interval sentinel
//! - Validation error types raised before any storage access
//!
//! # Example
//!
//! ```
//! use switchlog_types::{EventBatch, ToggleEvent};
//!
//! let batch = EventBatch {
//!     group_id: "c0ffee".to_string(),
//!     device: "garage heater".to_string(),
//!     events: vec![
//!         ToggleEvent { on: true, ts: 1_700_000_000_000 },
//!         ToggleEvent { on: false, ts: 1_700_000_600_000 },
//!     ],
//! };
//! assert!(batch.validate().is_ok());
//! ```

pub mod error;
pub mod types;

pub use error::{ValidationError, ValidationResult};
pub use types::{EventBatch, Interval, STOP_OPEN, ToggleEvent};
