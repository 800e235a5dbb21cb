//! User interface components
//!
//! This module contains the command-line definitions, terminal
//! colors, progress bars and result display.

pub mod cli;
pub mod color;
pub mod output;
pub mod progress;

// Re-export commonly used items
pub use cli::{Cli, cli_to_config};
pub use output::{DocumentFailure, display_config_info, display_document_report, display_summary};
pub use progress::ProgressReporter;
