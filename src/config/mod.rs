//! Configuration management
//!
//! This module handles loading and managing configuration from
//! TOML files and CLI arguments.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::core::constants::{
    config_files, defaults, output_formats, playlist, probe_methods, timeouts,
};
use crate::core::error::{Result, StreamsUpError};
use crate::playlist::PlaylistSyntax;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Timeout in seconds for a single probe attempt
    pub timeout: Option<u64>,

    /// Number of probes in flight at once
    pub threads: Option<usize>,

    /// Redirect hops followed per stream
    pub max_redirects: Option<usize>,

    /// Rounds re-probing streams that were not reachable
    pub retry_attempts: Option<u8>,

    /// Delay between retry rounds in milliseconds
    pub retry_delay: Option<u64>,

    /// Probe method (head, get)
    pub probe_method: Option<String>,

    /// HTTP status codes treated as reachable
    pub allowed_status_codes: Option<Vec<u16>>,

    /// Streams containing any of these strings are kept without probing
    pub allowlist: Option<Vec<String>>,

    /// Stream patterns to drop without probing (regex)
    pub exclude_patterns: Option<Vec<String>>,

    /// Custom User-Agent header
    pub user_agent: Option<String>,

    /// HTTP/HTTPS proxy URL
    pub proxy: Option<String>,

    /// Skip SSL certificate verification
    pub skip_ssl_verification: Option<bool>,

    /// Output format (text, json, minimal)
    pub output_format: Option<String>,

    /// Enable verbose logging
    pub verbose: Option<bool>,

    /// Playlist extensions picked up when walking directories
    pub file_types: Option<Vec<String>>,

    /// Header line of rebuilt playlists
    pub header: Option<String>,

    /// Prefix of metadata lines
    pub metadata_marker: Option<String>,

    /// URI prefixes recognized as streams
    pub schemes: Option<Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout: Some(timeouts::DEFAULT_TIMEOUT_SECONDS),
            threads: None, // Will default to CPU core count
            max_redirects: Some(defaults::MAX_REDIRECTS),
            retry_attempts: Some(defaults::RETRY_ATTEMPTS),
            retry_delay: Some(timeouts::DEFAULT_RETRY_DELAY_MS),
            probe_method: Some(probe_methods::DEFAULT.to_string()),
            allowed_status_codes: None,
            allowlist: None,
            exclude_patterns: None,
            user_agent: None,
            proxy: None,
            skip_ssl_verification: Some(false),
            output_format: Some(output_formats::DEFAULT.to_string()),
            verbose: Some(false),
            file_types: None,
            header: None,
            metadata_marker: None,
            schemes: None,
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            StreamsUpError::Config(format!(
                "Could not read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            StreamsUpError::Config(format!(
                "Invalid TOML in config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Try to find and load a config file in standard locations
    pub fn load_from_standard_locations() -> Self {
        if let Ok(config) = Self::load_from_file(config_files::FILE_NAME) {
            return config;
        }

        for i in 1..=config_files::PARENT_SEARCH_DEPTH {
            let path = format!("{}{}", "../".repeat(i), config_files::FILE_NAME);
            if let Ok(config) = Self::load_from_file(&path) {
                return config;
            }
        }

        Self::default()
    }

    /// Merge this config with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli_config: &CliConfig) {
        // Probing
        if let Some(timeout) = cli_config.timeout {
            self.timeout = Some(timeout);
        }
        if let Some(threads) = cli_config.threads {
            self.threads = Some(threads);
        }
        if let Some(max_redirects) = cli_config.max_redirects {
            self.max_redirects = Some(max_redirects);
        }
        if let Some(retry_attempts) = cli_config.retry_attempts {
            self.retry_attempts = Some(retry_attempts);
        }
        if let Some(retry_delay) = cli_config.retry_delay {
            self.retry_delay = Some(retry_delay);
        }
        if cli_config.use_get {
            self.probe_method = Some(probe_methods::GET.to_string());
        }

        // Filtering
        if let Some(ref allowed_status_codes) = cli_config.allowed_status_codes {
            self.allowed_status_codes = Some(allowed_status_codes.clone());
        }
        if let Some(ref allowlist) = cli_config.allowlist {
            self.allowlist = Some(allowlist.clone());
        }
        if let Some(ref exclude_patterns) = cli_config.exclude_patterns {
            self.exclude_patterns = Some(exclude_patterns.clone());
        }
        if let Some(ref file_types) = cli_config.file_types {
            self.file_types = Some(file_types.clone());
        }

        // Output & format
        if cli_config.verbose {
            self.verbose = Some(true);
        }
        if let Some(ref output_format) = cli_config.output_format {
            self.output_format = Some(output_format.clone());
        }

        // Network & security
        if let Some(ref user_agent) = cli_config.user_agent {
            self.user_agent = Some(user_agent.clone());
        }
        if let Some(ref proxy) = cli_config.proxy {
            self.proxy = Some(proxy.clone());
        }
        if cli_config.skip_ssl_verification {
            self.skip_ssl_verification = Some(true);
        }
    }

    /// Compile exclude patterns into regex objects
    pub fn compile_exclude_patterns(&self) -> Result<Vec<Regex>> {
        let mut compiled = Vec::new();
        if let Some(ref patterns) = self.exclude_patterns {
            for pattern in patterns {
                compiled.push(Regex::new(pattern)?);
            }
        }
        Ok(compiled)
    }

    /// Playlist extensions as a set, defaulting to m3u/m3u8
    pub fn file_types_as_set(&self) -> HashSet<String> {
        match self.file_types {
            Some(ref types) => types.iter().map(|t| t.to_ascii_lowercase()).collect(),
            None => playlist::DEFAULT_FILE_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Get timeout as Duration
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout.unwrap_or(timeouts::DEFAULT_TIMEOUT_SECONDS))
    }

    /// Get retry delay as Duration
    pub fn retry_delay_duration(&self) -> Duration {
        Duration::from_millis(
            self.retry_delay
                .unwrap_or(timeouts::DEFAULT_RETRY_DELAY_MS),
        )
    }

    /// Concurrency limit, defaulting to the CPU core count
    pub fn concurrency(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get).max(1)
    }

    pub fn max_redirects(&self) -> usize {
        self.max_redirects.unwrap_or(defaults::MAX_REDIRECTS)
    }

    pub fn retry_attempts(&self) -> u8 {
        self.retry_attempts.unwrap_or(defaults::RETRY_ATTEMPTS)
    }

    pub fn uses_get_probes(&self) -> bool {
        self.probe_method.as_deref() == Some(probe_methods::GET)
    }

    /// Playlist syntax with configured overrides applied
    pub fn playlist_syntax(&self) -> PlaylistSyntax {
        let mut syntax = PlaylistSyntax::default();
        if let Some(ref header) = self.header {
            syntax.header = header.clone();
        }
        if let Some(ref marker) = self.metadata_marker {
            syntax.metadata_marker = marker.clone();
        }
        if let Some(ref schemes) = self.schemes {
            syntax.schemes = schemes.clone();
        }
        syntax
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err(StreamsUpError::Config(
                    "Timeout cannot be 0. Expected a positive integer representing seconds."
                        .to_string(),
                ));
            }
            if timeout > timeouts::MAX_TIMEOUT_SECONDS {
                return Err(StreamsUpError::Config(format!(
                    "Timeout of {timeout} seconds is extremely large (>1 hour). Consider using a smaller value."
                )));
            }
        }

        if let Some(threads) = self.threads {
            if threads == 0 {
                return Err(StreamsUpError::Config(
                    "Thread count cannot be 0. Expected a positive integer.".to_string(),
                ));
            }
            if threads > defaults::MAX_THREADS {
                return Err(StreamsUpError::Config(format!(
                    "Thread count of {threads} is extremely high and may cause system instability. Consider using a smaller value."
                )));
            }
        }

        if let Some(max_redirects) = self.max_redirects
            && max_redirects > defaults::MAX_REDIRECTS_LIMIT
        {
            return Err(StreamsUpError::Config(format!(
                "Redirect limit of {max_redirects} is very high. Expected at most {}.",
                defaults::MAX_REDIRECTS_LIMIT
            )));
        }

        if let Some(retry) = self.retry_attempts
            && retry > defaults::MAX_RETRY_ATTEMPTS
        {
            return Err(StreamsUpError::Config(format!(
                "Retry attempts of {retry} is very high and may cause long delays. Consider using a smaller value."
            )));
        }

        if let Some(ref codes) = self.allowed_status_codes {
            for &code in codes {
                if !(100..=599).contains(&code) {
                    return Err(StreamsUpError::Config(format!(
                        "Status code {code} is not a valid HTTP status code. Expected a number between 100-599."
                    )));
                }
            }
        }

        if let Some(ref format) = self.output_format
            && !output_formats::ALL.contains(&format.as_str())
        {
            return Err(StreamsUpError::Config(format!(
                "Invalid output format '{format}'. Expected one of: {}.",
                output_formats::ALL.join(", ")
            )));
        }

        if let Some(ref method) = self.probe_method
            && !probe_methods::ALL.contains(&method.as_str())
        {
            return Err(StreamsUpError::Config(format!(
                "Invalid probe method '{method}'. Expected one of: {}.",
                probe_methods::ALL.join(", ")
            )));
        }

        if let Some(ref schemes) = self.schemes
            && (schemes.is_empty() || schemes.iter().any(|s| s.trim().is_empty()))
        {
            return Err(StreamsUpError::Config(
                "Schemes cannot be empty. Expected prefixes such as \"http://\".".to_string(),
            ));
        }

        for (name, value) in [("Header", &self.header), ("Metadata marker", &self.metadata_marker)]
        {
            if let Some(value) = value
                && value.trim().is_empty()
            {
                return Err(StreamsUpError::Config(format!("{name} cannot be empty.")));
            }
        }

        self.compile_exclude_patterns()?;

        Ok(())
    }
}

/// Configuration options that can come from CLI
#[derive(Debug, Default)]
pub struct CliConfig {
    // Probing
    pub timeout: Option<u64>,          // --timeout
    pub threads: Option<usize>,        // --concurrency
    pub max_redirects: Option<usize>,  // --max-redirects
    pub retry_attempts: Option<u8>,    // --retry
    pub retry_delay: Option<u64>,      // --retry-delay
    pub use_get: bool,                 // --use-get

    // Filtering
    pub allowed_status_codes: Option<Vec<u16>>, // --allow-status
    pub allowlist: Option<Vec<String>>,         // --allowlist
    pub exclude_patterns: Option<Vec<String>>,  // --exclude-pattern
    pub file_types: Option<Vec<String>>,        // --include

    // Output & format
    pub quiet: bool,                   // --quiet
    pub verbose: bool,                 // --verbose
    pub output_format: Option<String>, // --format
    pub no_progress: bool,             // --no-progress

    // Network & security
    pub user_agent: Option<String>,  // --user-agent
    pub proxy: Option<String>,       // --proxy
    pub skip_ssl_verification: bool, // --insecure

    // Configuration
    pub config_file: Option<String>, // --config
    pub no_config: bool,             // --no-config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.timeout, Some(timeouts::DEFAULT_TIMEOUT_SECONDS));
        assert_eq!(config.max_redirects, Some(defaults::MAX_REDIRECTS));
        assert_eq!(config.retry_attempts, Some(0));
        assert_eq!(
            config.output_format,
            Some(output_formats::DEFAULT.to_string())
        );
        assert!(!config.uses_get_probes());
        assert!(config.concurrency() >= 1);
    }

    #[test]
    fn test_config_load_from_file() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(
            b"timeout = 3\nthreads = 8\nmax_redirects = 2\nprobe_method = \"get\"\nallowed_status_codes = [403]\n",
        )?;

        let config = Config::load_from_file(file.path())?;
        assert_eq!(config.timeout, Some(3));
        assert_eq!(config.concurrency(), 8);
        assert_eq!(config.max_redirects(), 2);
        assert!(config.uses_get_probes());
        assert_eq!(config.allowed_status_codes, Some(vec![403]));
        // Keys missing from the file are absent rather than defaulted
        assert_eq!(config.retry_attempts, None);
        assert_eq!(config.retry_attempts(), 0);

        Ok(())
    }

    #[test]
    fn test_config_load_from_file_invalid_toml() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(b"timeout = [")?;

        let err = Config::load_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid TOML"));
        Ok(())
    }

    #[test]
    fn test_config_load_from_missing_file() {
        let err = Config::load_from_file("definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, StreamsUpError::Config(_)));
    }

    #[test]
    fn test_merge_with_cli_overrides_file_values() {
        let mut config = Config {
            timeout: Some(30),
            threads: Some(2),
            ..Default::default()
        };
        let cli_config = CliConfig {
            timeout: Some(5),
            max_redirects: Some(1),
            use_get: true,
            allowlist: Some(vec!["trusted.test".to_string()]),
            skip_ssl_verification: true,
            ..Default::default()
        };

        config.merge_with_cli(&cli_config);

        assert_eq!(config.timeout, Some(5));
        assert_eq!(config.threads, Some(2));
        assert_eq!(config.max_redirects, Some(1));
        assert!(config.uses_get_probes());
        assert_eq!(config.allowlist, Some(vec!["trusted.test".to_string()]));
        assert_eq!(config.skip_ssl_verification, Some(true));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let cases = vec![
            Config {
                timeout: Some(0),
                ..Default::default()
            },
            Config {
                threads: Some(0),
                ..Default::default()
            },
            Config {
                max_redirects: Some(500),
                ..Default::default()
            },
            Config {
                retry_attempts: Some(100),
                ..Default::default()
            },
            Config {
                allowed_status_codes: Some(vec![99]),
                ..Default::default()
            },
            Config {
                output_format: Some("xml".to_string()),
                ..Default::default()
            },
            Config {
                probe_method: Some("options".to_string()),
                ..Default::default()
            },
            Config {
                schemes: Some(vec![]),
                ..Default::default()
            },
            Config {
                header: Some("  ".to_string()),
                ..Default::default()
            },
            Config {
                exclude_patterns: Some(vec!["[invalid".to_string()]),
                ..Default::default()
            },
        ];

        for config in cases {
            assert!(config.validate().is_err(), "expected error for {config:?}");
        }
    }

    #[test]
    fn test_validate_accepts_default() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_file_types_default_to_playlists() {
        let types = Config::default().file_types_as_set();
        assert!(types.contains("m3u"));
        assert!(types.contains("m3u8"));

        let config = Config {
            file_types: Some(vec!["txt".to_string()]),
            ..Default::default()
        };
        assert_eq!(config.file_types_as_set().len(), 1);
    }

    #[test]
    fn test_playlist_syntax_overrides() {
        let config = Config {
            metadata_marker: Some("#TITLE".to_string()),
            schemes: Some(vec!["rtsp://".to_string()]),
            ..Default::default()
        };

        let syntax = config.playlist_syntax();
        assert_eq!(syntax.header, playlist::HEADER);
        assert_eq!(syntax.metadata_marker, "#TITLE");
        assert_eq!(syntax.schemes, vec!["rtsp://".to_string()]);
    }

    #[test]
    fn test_durations() {
        let config = Config {
            timeout: Some(7),
            retry_delay: Some(250),
            ..Default::default()
        };
        assert_eq!(config.timeout_duration(), Duration::from_secs(7));
        assert_eq!(config.retry_delay_duration(), Duration::from_millis(250));
    }
}
