use crate::core::types::{Document, ResourceEntry};
use crate::playlist::syntax::{LineKind, PlaylistSyntax};

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Split playlist text into lines and collect its stream entries.
///
/// A metadata line stays pending until the next stream line consumes it.
/// Blank and comment lines in between keep it pending; any other content
/// line discards it. Parsing never fails: a stream without a preceding
/// metadata line simply has no metadata.
pub fn parse(raw: &str, syntax: &PlaylistSyntax) -> Document {
    let raw = raw.strip_prefix(BYTE_ORDER_MARK).unwrap_or(raw);
    let lines: Vec<String> = raw.lines().map(str::to_string).collect();

    let mut entries = Vec::new();
    let mut pending: Option<(usize, &str)> = None;

    for (index, line) in lines.iter().enumerate() {
        match syntax.classify(line) {
            LineKind::Metadata => pending = Some((index, line.trim())),
            LineKind::Resource => {
                let mut entry = ResourceEntry::new(line.trim(), index);
                if let Some((metadata_position, metadata_line)) = pending.take() {
                    entry = entry.with_metadata(metadata_line, metadata_position);
                }
                entries.push(entry);
            }
            LineKind::Blank | LineKind::Comment => {}
            LineKind::Header | LineKind::Other => pending = None,
        }
    }

    Document { lines, entries }
}
