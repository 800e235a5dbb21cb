use rustc_hash::FxHashMap;
use std::fmt;

/// A stream reference found in a playlist.
///
/// Positions are 0-indexed line indices into [`Document::lines`]. The
/// metadata line, when present, is the marker line that describes this
/// stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEntry {
    /// Metadata line (e.g. `#EXTINF:-1,Title`) paired with this stream
    pub metadata_line: Option<String>,
    /// The stream URI as written in the playlist
    pub resource_uri: String,
    /// Line index of the stream URI
    pub position: usize,
    /// Line index of the metadata line
    pub metadata_position: Option<usize>,
}

impl ResourceEntry {
    pub fn new(resource_uri: impl Into<String>, position: usize) -> Self {
        Self {
            metadata_line: None,
            resource_uri: resource_uri.into(),
            position,
            metadata_position: None,
        }
    }

    pub fn with_metadata(mut self, metadata_line: impl Into<String>, position: usize) -> Self {
        self.metadata_line = Some(metadata_line.into());
        self.metadata_position = Some(position);
        self
    }
}

/// Result of probing a single stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Success status, carrying the URI that answered (after redirects)
    Reachable(String),
    /// A response arrived but its status is not acceptable
    Unreachable(u16),
    /// A probe attempt exceeded its time budget
    TimedOut,
    /// DNS, connection, TLS or URI failure
    TransportError(String),
}

impl Outcome {
    pub fn is_reachable(&self) -> bool {
        matches!(self, Outcome::Reachable(_))
    }

    /// Final URI of a reachable stream
    pub fn final_uri(&self) -> Option<&str> {
        match self {
            Outcome::Reachable(uri) => Some(uri),
            _ => None,
        }
    }

    /// HTTP status of an unreachable stream
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Outcome::Unreachable(code) => Some(*code),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Reachable(uri) => write!(f, "reachable ({uri})"),
            Outcome::Unreachable(code) => write!(f, "{code}"),
            Outcome::TimedOut => write!(f, "timed out"),
            Outcome::TransportError(msg) => write!(f, "{msg}"),
        }
    }
}

/// A probed entry together with its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub entry: ResourceEntry,
    pub outcome: Outcome,
}

impl ValidationResult {
    pub fn new(entry: ResourceEntry, outcome: Outcome) -> Self {
        Self { entry, outcome }
    }

    pub fn is_ok(&self) -> bool {
        self.outcome.is_reachable()
    }

    pub fn is_not_ok(&self) -> bool {
        !self.is_ok()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} - {} - L{}",
            self.outcome,
            self.entry.resource_uri,
            self.entry.position + 1
        )
    }
}

/// What the rebuilder needs to know about a reachable stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedEntry {
    pub metadata_line: Option<String>,
    pub metadata_position: Option<usize>,
    pub final_uri: String,
}

/// Reachable streams keyed by the line index of their original URI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedSet {
    entries: FxHashMap<usize, ValidatedEntry>,
}

impl ValidatedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, position: usize, entry: ValidatedEntry) -> Option<ValidatedEntry> {
        self.entries.insert(position, entry)
    }

    /// Insert a result if it is reachable. Returns whether it was inserted.
    pub fn record(&mut self, result: ValidationResult) -> bool {
        let ValidationResult { entry, outcome } = result;
        match outcome {
            Outcome::Reachable(final_uri) => {
                self.entries.insert(
                    entry.position,
                    ValidatedEntry {
                        metadata_line: entry.metadata_line,
                        metadata_position: entry.metadata_position,
                        final_uri,
                    },
                );
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, position: usize) -> Option<&ValidatedEntry> {
        self.entries.get(&position)
    }

    pub fn contains(&self, position: usize) -> bool {
        self.entries.contains_key(&position)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.keys().copied()
    }

    /// Move every entry of `other` into this set
    pub fn merge(&mut self, other: ValidatedSet) {
        self.entries.extend(other.entries);
    }

    /// Map from metadata line index to the stream line index it describes
    pub fn metadata_index(&self) -> FxHashMap<usize, usize> {
        self.entries
            .iter()
            .filter_map(|(&position, entry)| entry.metadata_position.map(|meta| (meta, position)))
            .collect()
    }
}

impl Extend<ValidationResult> for ValidatedSet {
    fn extend<I: IntoIterator<Item = ValidationResult>>(&mut self, iter: I) {
        for result in iter {
            self.record(result);
        }
    }
}

impl FromIterator<ValidationResult> for ValidatedSet {
    fn from_iter<I: IntoIterator<Item = ValidationResult>>(iter: I) -> Self {
        let mut set = ValidatedSet::new();
        set.extend(iter);
        set
    }
}

/// A parsed playlist: its raw lines and the stream entries found in them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub lines: Vec<String>,
    pub entries: Vec<ResourceEntry>,
}

impl Document {
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn has_entries(&self) -> bool {
        !self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    fn entry(uri: &str, position: usize) -> ResourceEntry {
        ResourceEntry::new(uri, position)
    }

    #[test]
    fn test_validation_result__reachable__is_ok() {
        let vr = ValidationResult::new(
            entry("http://a.test/x", 1),
            Outcome::Reachable("http://a.test/x".to_string()),
        );

        assert!(vr.is_ok());
        assert!(!vr.is_not_ok());
    }

    #[test]
    fn test_validation_result__failures__are_not_ok() {
        let outcomes = vec![
            Outcome::Unreachable(404),
            Outcome::TimedOut,
            Outcome::TransportError("connection refused".to_string()),
        ];

        for outcome in outcomes {
            let vr = ValidationResult::new(entry("http://a.test/x", 1), outcome);
            assert!(vr.is_not_ok());
        }
    }

    #[test]
    fn test_validation_result__to_string() {
        let vr = ValidationResult::new(entry("http://a.test/x", 4), Outcome::Unreachable(404));
        assert_eq!(vr.to_string(), "404 - http://a.test/x - L5");

        let vr = ValidationResult::new(entry("http://a.test/x", 0), Outcome::TimedOut);
        assert_eq!(vr.to_string(), "timed out - http://a.test/x - L1");
    }

    #[test]
    fn test_outcome__accessors() {
        let reachable = Outcome::Reachable("http://b.test/".to_string());
        assert_eq!(reachable.final_uri(), Some("http://b.test/"));
        assert_eq!(reachable.status_code(), None);

        let unreachable = Outcome::Unreachable(503);
        assert_eq!(unreachable.final_uri(), None);
        assert_eq!(unreachable.status_code(), Some(503));
    }

    #[test]
    fn test_validated_set__records_only_reachable() {
        let mut set = ValidatedSet::new();

        let inserted = set.record(ValidationResult::new(
            entry("http://a.test/x", 2).with_metadata("#EXTINF:-1,Alpha", 1),
            Outcome::Reachable("http://a.test/moved".to_string()),
        ));
        let rejected = set.record(ValidationResult::new(
            entry("http://b.test/y", 4),
            Outcome::Unreachable(404),
        ));

        assert!(inserted);
        assert!(!rejected);
        assert_eq!(set.len(), 1);
        assert!(set.contains(2));
        assert!(!set.contains(4));

        let validated = set.get(2).expect("entry at position 2");
        assert_eq!(validated.final_uri, "http://a.test/moved");
        assert_eq!(validated.metadata_line.as_deref(), Some("#EXTINF:-1,Alpha"));
    }

    #[test]
    fn test_validated_set__metadata_index() {
        let set: ValidatedSet = vec![
            ValidationResult::new(
                entry("http://a.test/x", 2).with_metadata("#EXTINF:-1,Alpha", 1),
                Outcome::Reachable("http://a.test/x".to_string()),
            ),
            ValidationResult::new(
                entry("http://c.test/z", 7),
                Outcome::Reachable("http://c.test/z".to_string()),
            ),
        ]
        .into_iter()
        .collect();

        let index = set.metadata_index();
        assert_eq!(index.len(), 1);
        assert_eq!(index.get(&1), Some(&2));
    }

    #[test]
    fn test_validated_set__merge() {
        let mut first: ValidatedSet = vec![ValidationResult::new(
            entry("http://a.test/x", 1),
            Outcome::Reachable("http://a.test/x".to_string()),
        )]
        .into_iter()
        .collect();
        let second: ValidatedSet = vec![ValidationResult::new(
            entry("http://b.test/y", 3),
            Outcome::Reachable("http://b.test/y".to_string()),
        )]
        .into_iter()
        .collect();

        first.merge(second);

        let mut positions: Vec<usize> = first.positions().collect();
        positions.sort_unstable();
        assert_eq!(positions, vec![1, 3]);
    }
}
