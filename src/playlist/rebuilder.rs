use rustc_hash::{FxHashMap, FxHashSet};

use crate::core::types::ValidatedSet;
use crate::playlist::syntax::{LineKind, PlaylistSyntax};

/// Output lines plus the set of values already written.
struct PlaylistWriter<'a> {
    lines: Vec<&'a str>,
    seen: FxHashSet<&'a str>,
}

impl<'a> PlaylistWriter<'a> {
    fn new(header: &'a str) -> Self {
        let mut writer = Self {
            lines: Vec::new(),
            seen: FxHashSet::default(),
        };
        writer.push(header);
        writer
    }

    fn push(&mut self, line: &'a str) -> bool {
        if self.seen.insert(line) {
            self.lines.push(line);
            true
        } else {
            false
        }
    }

    fn contains(&self, line: &str) -> bool {
        self.seen.contains(line)
    }

    /// A marker is only written when its stream is written right after it.
    fn push_pair(&mut self, metadata_line: &'a str, uri: &'a str) {
        if self.contains(uri) {
            return;
        }
        self.push(metadata_line);
        self.push(uri);
    }

    fn finish(self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}

/// Rebuild a playlist containing only the validated streams.
///
/// Output starts with the header, keeps non-stream lines in place, writes
/// each reachable stream with its final URI right after its metadata line,
/// and never writes the same line value twice. Surrounding whitespace of
/// every line is trimmed.
pub fn rebuild<'a>(
    lines: &'a [String],
    validated: &'a ValidatedSet,
    syntax: &'a PlaylistSyntax,
) -> String {
    let mut writer = PlaylistWriter::new(&syntax.header);
    let metadata_index = validated.metadata_index();
    let mut consumed: FxHashSet<usize> = FxHashSet::default();

    for (index, line) in lines.iter().enumerate() {
        if consumed.contains(&index) {
            continue;
        }

        let line = line.trim();
        match syntax.classify(line) {
            LineKind::Blank | LineKind::Header => {}
            LineKind::Metadata => {
                let Some(stream_position) =
                    paired_stream(index, lines, validated, &metadata_index, syntax)
                else {
                    continue;
                };
                let Some(entry) = validated.get(stream_position) else {
                    continue;
                };
                consumed.insert(stream_position);

                // Directives between marker and stream belong to that stream and
                // go in front of the pair so the pair stays adjacent.
                let stream_written = writer.contains(&entry.final_uri);
                for between in index + 1..stream_position {
                    let directive = lines[between].trim();
                    if syntax.classify(directive) != LineKind::Comment {
                        continue;
                    }
                    consumed.insert(between);
                    if !stream_written {
                        writer.push(directive);
                    }
                }
                writer.push_pair(line, &entry.final_uri);
            }
            LineKind::Resource => {
                if let Some(entry) = validated.get(index) {
                    writer.push(&entry.final_uri);
                }
            }
            LineKind::Comment | LineKind::Other => {
                writer.push(line);
            }
        }
    }

    writer.finish()
}

/// Stream line described by the metadata line at `index`, if that stream is validated.
///
/// Entries recorded with a metadata position are looked up directly. For
/// entries supplied without one, the stream on the following line is used.
fn paired_stream(
    index: usize,
    lines: &[String],
    validated: &ValidatedSet,
    metadata_index: &FxHashMap<usize, usize>,
    syntax: &PlaylistSyntax,
) -> Option<usize> {
    if let Some(&position) = metadata_index.get(&index) {
        return (position > index).then_some(position);
    }

    let next = index + 1;
    let next_line = lines.get(next)?;
    let entry = validated.get(next)?;
    (syntax.classify(next_line) == LineKind::Resource && entry.metadata_position.is_none())
        .then_some(next)
}

/// Whether rebuilt text holds anything besides the header line
pub fn has_content_beyond_header(text: &str) -> bool {
    text.lines().filter(|line| !line.trim().is_empty()).nth(1).is_some()
}
