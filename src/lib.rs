//! Playlist stream checking and rebuilding
//!
//! Reads M3U-style playlists, probes every stream over HTTP with a bounded
//! number of probes in flight, and writes a copy that keeps only the streams
//! that answered.

pub mod config;
pub mod core;
pub mod discovery;
pub mod pipeline;
pub mod playlist;
pub mod reporting;
pub mod ui;
pub mod validation;

pub use crate::core::constants;
pub use crate::core::{
    Document, Outcome, ResourceEntry, Result, StreamsUpError, ValidatedEntry, ValidatedSet,
    ValidationResult,
};
pub use crate::pipeline::{Coordinator, DocumentReport, FsPersister, Persist, PersistDecision, RunTotals};
pub use crate::playlist::{PlaylistSyntax, parse, rebuild};
pub use crate::validation::{Executor, HttpValidator, ValidateResource};
