//! Per-playlist run coordination
//!
//! This module sequences parsing, validation, rebuilding and
//! writing of each playlist and keeps run-wide counts.

pub mod coordinator;
pub mod persist;

// Re-export commonly used items
pub use coordinator::{Coordinator, DocumentReport, PersistDecision, RunTotals};
pub use persist::{FsPersister, Persist};
