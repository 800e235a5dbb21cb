use crate::core::constants::playlist;

/// How a single playlist line is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Header,
    Metadata,
    Resource,
    /// `#` line that is neither header nor metadata (e.g. `#EXTVLCOPT`)
    Comment,
    Other,
}

/// Recognized prefixes of the playlist format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistSyntax {
    pub header: String,
    pub metadata_marker: String,
    pub schemes: Vec<String>,
}

impl Default for PlaylistSyntax {
    fn default() -> Self {
        Self {
            header: playlist::HEADER.to_string(),
            metadata_marker: playlist::METADATA_MARKER.to_string(),
            schemes: playlist::DEFAULT_SCHEMES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl PlaylistSyntax {
    pub fn classify(&self, line: &str) -> LineKind {
        let line = line.trim();

        if line.is_empty() {
            LineKind::Blank
        } else if line.starts_with(&self.header) {
            LineKind::Header
        } else if line.starts_with(&self.metadata_marker) {
            LineKind::Metadata
        } else if self.is_resource(line) {
            LineKind::Resource
        } else if line.starts_with(playlist::COMMENT_PREFIX) {
            LineKind::Comment
        } else {
            LineKind::Other
        }
    }

    /// Whether the line starts with one of the recognized URI schemes (ASCII case-insensitive)
    pub fn is_resource(&self, line: &str) -> bool {
        self.schemes.iter().any(|scheme| {
            line.get(..scheme.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
        })
    }
}
