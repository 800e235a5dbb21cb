//! Stream validation logic
//!
//! This module handles probing streams over HTTP and running
//! many probes concurrently under a fixed limit.

pub mod executor;
pub mod validator;

// Re-export commonly used items
pub use executor::Executor;
pub use validator::{HttpValidator, ProbeMethod, ValidateResource};
