//! Logging and run reporting
//!
//! This module holds structured logging helpers used across the
//! application.

pub mod logging;
