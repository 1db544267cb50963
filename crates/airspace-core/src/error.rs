//! Error kinds surfaced by the monitor.

use thiserror::Error;

/// Errors returned by heap, admission and configuration operations.
///
/// None of these are fatal: a full heap or an empty queue are expected
/// steady-state conditions and callers decide whether to report or skip.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MonitorError {
    /// Insertion attempted on a heap that is already at its bound.
    #[error("priority heap is full (capacity {capacity})")]
    CapacityExceeded { capacity: usize },

    /// Extraction or peek on an empty heap.
    #[error("priority heap is empty")]
    EmptyQueue,

    /// Aircraft record failed validation at admission.
    #[error("malformed aircraft record: {0}")]
    MalformedRecord(String),

    /// Monitor configuration failed validation.
    #[error("invalid monitor configuration: {0}")]
    InvalidConfig(String),
}
