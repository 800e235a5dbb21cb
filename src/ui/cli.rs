// Command-line interface definitions and parsing for streamsup

use crate::config::CliConfig;
use crate::core::constants::{defaults, output_formats, timeouts};
use crate::core::error::{Result, StreamsUpError};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Playlist files or directories to check
    #[arg(required = true)]
    pub files: Vec<String>,

    // Core Options
    /// Recursively process directories
    #[arg(short = 'r', long, help_heading = "Core Options")]
    pub recursive: bool,

    /// Probe timeout in seconds (default: 10)
    #[arg(
        short = 't',
        long,
        value_name = "SECONDS",
        help_heading = "Core Options"
    )]
    pub timeout: Option<u64>,

    /// Concurrent probes (default: CPU cores)
    #[arg(long, value_name = "COUNT", help_heading = "Core Options")]
    pub concurrency: Option<usize>,

    /// Redirects followed per stream (default: 5)
    #[arg(long, value_name = "COUNT", help_heading = "Core Options")]
    pub max_redirects: Option<usize>,

    // Output Files
    /// Write rebuilt playlists into this directory
    #[arg(
        short = 'o',
        long,
        value_name = "DIR",
        conflicts_with = "in_place",
        help_heading = "Output Files"
    )]
    pub output_dir: Option<String>,

    /// Overwrite each playlist with its rebuilt version
    #[arg(long, help_heading = "Output Files")]
    pub in_place: bool,

    // Filtering & Content
    /// Playlist extensions to process (e.g., m3u,m3u8)
    #[arg(long, value_name = "EXTENSIONS", help_heading = "Filtering & Content")]
    pub include: Option<String>,

    /// Stream URLs to accept without probing (comma-separated)
    #[arg(long, value_name = "URLS", help_heading = "Filtering & Content")]
    pub allowlist: Option<String>,

    /// Status codes to accept besides 2xx (comma-separated)
    #[arg(long, value_name = "CODES", help_heading = "Filtering & Content")]
    pub allow_status: Option<String>,

    /// Stream URL patterns to drop without probing (regex)
    #[arg(long, value_name = "REGEX", help_heading = "Filtering & Content")]
    pub exclude_pattern: Vec<String>,

    // Probing
    /// Probe with GET instead of HEAD
    #[arg(long, help_heading = "Probing")]
    pub use_get: bool,

    /// Extra rounds for unreachable streams (default: 0)
    #[arg(long, value_name = "COUNT", help_heading = "Probing")]
    pub retry: Option<u8>,

    /// Delay before each retry round in ms (default: 1000)
    #[arg(long, value_name = "MS", help_heading = "Probing")]
    pub retry_delay: Option<u64>,

    // Output & Verbosity
    /// Suppress progress output
    #[arg(short = 'q', long, help_heading = "Output & Verbosity")]
    pub quiet: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long, help_heading = "Output & Verbosity")]
    pub verbose: bool,

    /// Output format [default: text]
    #[arg(long, value_name = "FORMAT", value_parser = output_formats::ALL, help_heading = "Output & Verbosity")]
    pub format: Option<String>,

    /// Disable progress bars
    #[arg(long, help_heading = "Output & Verbosity")]
    pub no_progress: bool,

    // Network & Security
    /// Custom User-Agent header
    #[arg(long, value_name = "AGENT", help_heading = "Network & Security")]
    pub user_agent: Option<String>,

    /// HTTP/HTTPS proxy URL
    #[arg(long, value_name = "URL", help_heading = "Network & Security")]
    pub proxy: Option<String>,

    /// Skip SSL certificate verification
    #[arg(long, help_heading = "Network & Security")]
    pub insecure: bool,

    // Configuration
    /// Use specific config file
    #[arg(long, value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Ignore config files
    #[arg(long, help_heading = "Configuration")]
    pub no_config: bool,
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_status_codes(raw: &str) -> Result<Vec<u16>> {
    split_list(raw)
        .into_iter()
        .map(|s| match s.parse::<u16>() {
            Ok(code) if (100..=599).contains(&code) => Ok(code),
            _ => Err(StreamsUpError::InvalidArgument(format!(
                "Status code '{s}' is not a valid HTTP status code. Expected a number between 100-599."
            ))),
        })
        .collect()
}

/// Convert derive-based CLI arguments to a CliConfig, rejecting invalid values
pub fn cli_to_config(cli: &Cli) -> Result<CliConfig> {
    let mut cli_config = CliConfig::default();

    // Core options
    if let Some(timeout) = cli.timeout {
        if timeout == 0 {
            return Err(StreamsUpError::InvalidArgument(
                "Timeout cannot be 0. Expected a positive integer representing seconds."
                    .to_string(),
            ));
        }
        if timeout > timeouts::MAX_TIMEOUT_SECONDS {
            eprintln!(
                "Warning: Timeout of {timeout} seconds is quite large. Consider using a smaller value for better user experience."
            );
        }
        cli_config.timeout = Some(timeout);
    }

    if let Some(concurrency) = cli.concurrency {
        if concurrency == 0 {
            return Err(StreamsUpError::InvalidArgument(
                "Concurrency cannot be 0. Expected a positive integer representing the number of concurrent probes."
                    .to_string(),
            ));
        }
        if concurrency > 100 {
            eprintln!(
                "Warning: Concurrency of {concurrency} is quite high and may overwhelm servers. Consider using a smaller value."
            );
        }
        cli_config.threads = Some(concurrency);
    }

    if let Some(max_redirects) = cli.max_redirects {
        if max_redirects > defaults::MAX_REDIRECTS_LIMIT {
            return Err(StreamsUpError::InvalidArgument(format!(
                "Max redirects of {max_redirects} exceeds the limit of {}.",
                defaults::MAX_REDIRECTS_LIMIT
            )));
        }
        cli_config.max_redirects = Some(max_redirects);
    }

    // Filtering & inclusion
    if let Some(ref include_str) = cli.include {
        cli_config.file_types = Some(split_list(include_str));
    }

    if let Some(ref allowlist_str) = cli.allowlist {
        cli_config.allowlist = Some(split_list(allowlist_str));
    }

    if let Some(ref status_str) = cli.allow_status {
        cli_config.allowed_status_codes = Some(parse_status_codes(status_str)?);
    }

    if !cli.exclude_pattern.is_empty() {
        cli_config.exclude_patterns = Some(cli.exclude_pattern.clone());
    }

    // Probing
    cli_config.use_get = cli.use_get;
    cli_config.retry_attempts = cli.retry;
    cli_config.retry_delay = cli.retry_delay;

    // Output & format
    cli_config.quiet = cli.quiet;
    cli_config.verbose = cli.verbose;
    cli_config.no_progress = cli.no_progress;
    cli_config.output_format = cli.format.clone();

    // Network & security
    cli_config.user_agent = cli.user_agent.clone();
    cli_config.proxy = cli.proxy.clone();
    cli_config.skip_ssl_verification = cli.insecure;

    // Configuration
    cli_config.config_file = cli.config.clone();
    cli_config.no_config = cli.no_config;

    Ok(cli_config)
}
