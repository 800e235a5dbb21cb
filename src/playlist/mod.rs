//! Playlist parsing and rebuilding
//!
//! This module turns playlist text into stream entries and writes
//! a new playlist from the entries that passed validation.

pub mod parser;
pub mod rebuilder;
pub mod syntax;

// Re-export commonly used items
pub use parser::parse;
pub use rebuilder::{has_content_beyond_header, rebuild};
pub use syntax::{LineKind, PlaylistSyntax};
