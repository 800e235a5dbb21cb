use crate::config::Config;
use crate::core::types::{Outcome, ValidationResult};
use log::{debug, error, info, warn};
use std::path::Path;

/// Initialize the logger with appropriate level based on verbosity
pub fn init_logger(verbose: bool, quiet: bool) {
    let level = if quiet {
        log::LevelFilter::Off
    } else if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Off // Only show structured logs in verbose mode
    };

    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    debug!("Logger initialized with level: {level:?}");
}

/// Log configuration information
pub fn log_config_info(config: &Config, concurrency: usize) {
    let timeout = config.timeout_duration().as_secs();
    let max_redirects = config.max_redirects();
    let retry_attempts = config.retry_attempts();
    let retry_delay = config.retry_delay_duration().as_millis();
    let probe_method = config.probe_method.as_deref().unwrap_or("head");
    let skip_ssl_verification = config.skip_ssl_verification.unwrap_or(false);

    info!("Configuration: concurrency={concurrency}, timeout={timeout}s, max_redirects={max_redirects}");
    info!("Retry: rounds={retry_attempts}, delay={retry_delay}ms");
    info!("HTTP: probe_method={probe_method}, skip_ssl={skip_ssl_verification}");
}

/// Log playlist file information
pub fn log_file_info<P: AsRef<Path>>(file_count: usize, files: &[P]) {
    info!("Processing {file_count} playlist(s)");
    for (i, file) in files.iter().enumerate() {
        debug!("  {}. {}", i + 1, file.as_ref().display());
    }
}

/// Log the start of a playlist
pub fn log_document_start(name: &str, stream_count: usize) {
    info!("Checking {stream_count} stream(s) in {name}");
}

/// Log individual probe results for debugging
pub fn log_probe_result(result: &ValidationResult) {
    let uri = &result.entry.resource_uri;
    match &result.outcome {
        Outcome::Reachable(final_uri) if final_uri == uri => debug!("✓ {uri}"),
        Outcome::Reachable(final_uri) => debug!("✓ {uri} -> {final_uri}"),
        Outcome::Unreachable(status) => debug!("✗ {uri} -> {status}"),
        Outcome::TimedOut => debug!("✗ {uri} -> timed out"),
        Outcome::TransportError(desc) => debug!("✗ {uri} -> {desc}"),
    }
}

/// Log playlist completion
pub fn log_document_complete(name: &str, validated: usize, total: usize, written: bool) {
    if written {
        info!("✅ {name}: {validated}/{total} streams reachable, playlist written");
    } else {
        warn!("❌ {name}: {validated}/{total} streams reachable, nothing written");
    }
}

/// Log run completion
pub fn log_run_complete(documents: usize, validated: usize, total: usize, duration_ms: u128) {
    info!("Run complete: {validated}/{total} streams reachable across {documents} playlist(s) ({duration_ms}ms)");
}

/// Log error information
pub fn log_error(message: &str, source: Option<&dyn std::error::Error>) {
    match source {
        Some(err) => error!("{message}: {err}"),
        None => error!("{message}"),
    }
}

/// Log warning information
pub fn log_warning(message: &str) {
    warn!("{message}");
}
