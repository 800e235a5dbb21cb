//! Playlist discovery and output paths
//!
//! This module expands input paths into playlist files and decides
//! where each rebuilt playlist is written.

pub mod path_utils;

// Re-export commonly used items
pub use path_utils::{PlaylistFile, destination_for, expand_paths, is_checked_output};
