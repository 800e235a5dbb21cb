/// Application-wide constants to avoid magic values throughout the codebase.
///
/// This module centralizes all magic strings, numbers, and other literal values
/// used across the application, making them easier to maintain and modify.
/// Output format constants
pub mod output_formats {
    /// Text output format - colorful summary per playlist
    pub const TEXT: &str = "text";
    /// JSON output format - structured output for automation
    pub const JSON: &str = "json";
    /// Minimal output format - plain text without colors
    pub const MINIMAL: &str = "minimal";

    /// Default output format
    pub const DEFAULT: &str = TEXT;

    /// All valid output formats
    pub const ALL: [&str; 3] = [TEXT, JSON, MINIMAL];
}

/// Playlist syntax defaults (extended M3U)
pub mod playlist {
    /// Header line every rebuilt playlist starts with
    pub const HEADER: &str = "#EXTM3U";
    /// Prefix of the metadata line that describes the following stream
    pub const METADATA_MARKER: &str = "#EXTINF";
    /// Prefix shared by every comment/directive line
    pub const COMMENT_PREFIX: &str = "#";
    /// URI schemes recognized as stream references
    pub const DEFAULT_SCHEMES: [&str; 2] = ["http://", "https://"];
    /// File extensions processed when walking directories
    pub const DEFAULT_FILE_TYPES: [&str; 2] = ["m3u", "m3u8"];
    /// Infix used for the output file name when writing next to the source
    pub const CHECKED_INFIX: &str = "checked";
}

/// Probe method constants
pub mod probe_methods {
    /// Header-only request
    pub const HEAD: &str = "head";
    /// GET request whose body is never read
    pub const GET: &str = "get";

    /// Default probe method
    pub const DEFAULT: &str = HEAD;

    /// All valid probe methods
    pub const ALL: [&str; 2] = [HEAD, GET];
}

/// Timeout and duration constants
pub mod timeouts {
    /// Default per-probe timeout in seconds
    pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
    /// Maximum reasonable timeout in seconds (1 hour)
    pub const MAX_TIMEOUT_SECONDS: u64 = 3600;
    /// Default delay between retry rounds in milliseconds
    pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;
}

/// Default configuration values
pub mod defaults {
    /// Default number of redirect hops followed per probe
    pub const MAX_REDIRECTS: usize = 5;
    /// Default number of retry rounds for unreachable entries
    pub const RETRY_ATTEMPTS: u8 = 0;
    /// Upper bound for the concurrency limit
    pub const MAX_THREADS: usize = 1000;
    /// Upper bound for redirect hops
    pub const MAX_REDIRECTS_LIMIT: usize = 50;
    /// Upper bound for retry rounds
    pub const MAX_RETRY_ATTEMPTS: u8 = 20;
}

/// Configuration file constants
pub mod config_files {
    /// Name of the configuration file looked up in the working directory
    pub const FILE_NAME: &str = ".streamsup.toml";
    /// How many parent directories are searched for the configuration file
    pub const PARENT_SEARCH_DEPTH: usize = 3;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_formats_constants() {
        assert_eq!(output_formats::TEXT, "text");
        assert_eq!(output_formats::JSON, "json");
        assert_eq!(output_formats::MINIMAL, "minimal");
        assert_eq!(output_formats::DEFAULT, "text");
        assert_eq!(output_formats::ALL.len(), 3);
    }

    #[test]
    fn test_playlist_constants() {
        assert_eq!(playlist::HEADER, "#EXTM3U");
        assert!(playlist::METADATA_MARKER.starts_with(playlist::COMMENT_PREFIX));
        assert!(playlist::DEFAULT_SCHEMES.contains(&"https://"));
    }

    #[test]
    fn test_probe_method_constants() {
        assert_eq!(probe_methods::DEFAULT, "head");
        assert!(probe_methods::ALL.contains(&probe_methods::GET));
    }

    #[test]
    fn test_default_constants() {
        assert_eq!(defaults::MAX_REDIRECTS, 5);
        assert_eq!(defaults::RETRY_ATTEMPTS, 0);
        assert_eq!(timeouts::DEFAULT_TIMEOUT_SECONDS, 10);
    }
}
