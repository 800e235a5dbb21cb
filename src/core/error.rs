use std::fmt;

/// Error types for streamsup operations.
///
/// Per-stream probe failures are not errors; they are reported as
/// [`Outcome`](crate::core::types::Outcome) values. The variants below abort
/// a single playlist or the whole run.
#[derive(Debug)]
pub enum StreamsUpError {
    /// IO error (file operations, etc.)
    Io(std::io::Error),

    /// Configuration error
    Config(String),

    /// HTTP client error
    Http(reqwest::Error),

    /// Path expansion error
    PathExpansion(String),

    /// Regex compilation error
    Regex(regex::Error),

    /// TOML parsing error
    TomlParsing(toml::de::Error),

    /// File not found error
    FileNotFound(String),

    /// Invalid argument error
    InvalidArgument(String),

    /// File walking/ignore error
    FileWalking(ignore::Error),

    /// A playlist could not be read
    DocumentRead {
        path: String,
        source: std::io::Error,
    },

    /// A rebuilt playlist could not be written
    DocumentWrite {
        path: String,
        source: std::io::Error,
    },
}

impl fmt::Display for StreamsUpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamsUpError::Io(err) => write!(f, "IO error: {err}"),
            StreamsUpError::Config(msg) => write!(f, "Configuration error: {msg}"),
            StreamsUpError::Http(err) => write!(f, "HTTP error: {err}"),
            StreamsUpError::PathExpansion(msg) => write!(f, "Path expansion error: {msg}"),
            StreamsUpError::Regex(err) => write!(f, "Regex error: {err}"),
            StreamsUpError::TomlParsing(err) => write!(f, "TOML parsing error: {err}"),
            StreamsUpError::FileNotFound(path) => write!(f, "File not found: {path}"),
            StreamsUpError::InvalidArgument(msg) => write!(f, "Invalid argument: {msg}"),
            StreamsUpError::FileWalking(err) => write!(f, "File walking error: {err}"),
            StreamsUpError::DocumentRead { path, source } => {
                write!(f, "Could not read playlist '{path}': {source}")
            }
            StreamsUpError::DocumentWrite { path, source } => {
                write!(f, "Could not write playlist '{path}': {source}")
            }
        }
    }
}

impl std::error::Error for StreamsUpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StreamsUpError::Io(err) => Some(err),
            StreamsUpError::Http(err) => Some(err),
            StreamsUpError::Regex(err) => Some(err),
            StreamsUpError::TomlParsing(err) => Some(err),
            StreamsUpError::FileWalking(err) => Some(err),
            StreamsUpError::DocumentRead { source, .. } => Some(source),
            StreamsUpError::DocumentWrite { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StreamsUpError {
    fn from(err: std::io::Error) -> Self {
        StreamsUpError::Io(err)
    }
}

impl From<reqwest::Error> for StreamsUpError {
    fn from(err: reqwest::Error) -> Self {
        StreamsUpError::Http(err)
    }
}

impl From<regex::Error> for StreamsUpError {
    fn from(err: regex::Error) -> Self {
        StreamsUpError::Regex(err)
    }
}

impl From<toml::de::Error> for StreamsUpError {
    fn from(err: toml::de::Error) -> Self {
        StreamsUpError::TomlParsing(err)
    }
}

impl From<ignore::Error> for StreamsUpError {
    fn from(err: ignore::Error) -> Self {
        StreamsUpError::FileWalking(err)
    }
}

/// Type alias for Results using StreamsUpError
pub type Result<T> = std::result::Result<T, StreamsUpError>;
