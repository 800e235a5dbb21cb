use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::core::constants::playlist::CHECKED_INFIX;
use crate::core::error::{Result, StreamsUpError};

fn has_wanted_extension(path: &Path, file_types: Option<&HashSet<String>>) -> bool {
    let Some(extensions) = file_types else {
        return true;
    };
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => extensions.contains(&ext.to_ascii_lowercase()),
        // Include files without extensions if "" is in the set
        None => extensions.contains(""),
    }
}

/// True for files this tool wrote itself, e.g. `news.checked.m3u`
pub fn is_checked_output(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .and_then(|stem| stem.rsplit_once('.'))
        .is_some_and(|(_, infix)| infix == CHECKED_INFIX)
}

/// A playlist found on disk.
///
/// `relative` is the path below the directory it was found in, or just the
/// file name for files given directly.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PlaylistFile {
    pub path: PathBuf,
    pub relative: PathBuf,
}

impl PlaylistFile {
    fn given(path: &Path) -> Self {
        let relative = path
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| path.to_path_buf());
        Self {
            path: path.to_path_buf(),
            relative,
        }
    }

    fn walked(path: &Path, root: &Path) -> Self {
        match path.strip_prefix(root) {
            Ok(relative) if !relative.as_os_str().is_empty() => Self {
                path: path.to_path_buf(),
                relative: relative.to_path_buf(),
            },
            _ => Self::given(path),
        }
    }
}

impl AsRef<Path> for PlaylistFile {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

pub fn expand_paths(
    input_paths: Vec<&Path>,
    recursive: bool,
    file_types: Option<&HashSet<String>>,
) -> Result<Vec<PlaylistFile>> {
    let mut result_paths = Vec::new();

    for path in input_paths {
        if path.is_file() {
            if has_wanted_extension(path, file_types) {
                result_paths.push(PlaylistFile::given(path));
            }
        } else if path.is_dir() && recursive {
            let mut builder = ignore::WalkBuilder::new(path);
            builder.hidden(false); // Include hidden files

            for entry in builder.build() {
                let entry = entry?;
                let entry_path = entry.path();

                if entry_path.is_file()
                    && has_wanted_extension(entry_path, file_types)
                    && !is_checked_output(entry_path)
                {
                    result_paths.push(PlaylistFile::walked(entry_path, path));
                }
            }
        } else if path.is_dir() {
            return Err(StreamsUpError::PathExpansion(format!(
                "'{}' is a directory. Use --recursive to process directories.",
                path.display()
            )));
        } else {
            return Err(StreamsUpError::FileNotFound(path.display().to_string()));
        }
    }

    result_paths.sort();
    result_paths.dedup();
    Ok(result_paths)
}

/// Where the rebuilt copy of `file` is written.
///
/// In place overwrites the source. With an output directory the file keeps
/// its path relative to the walked directory. Otherwise
/// `<stem>.checked.<ext>` is written next to the source.
pub fn destination_for(file: &PlaylistFile, output_dir: Option<&Path>, in_place: bool) -> PathBuf {
    let source = file.path.as_path();
    if in_place {
        return source.to_path_buf();
    }

    if let Some(dir) = output_dir {
        return dir.join(&file.relative);
    }

    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match source.extension() {
        Some(ext) => format!("{stem}.{CHECKED_INFIX}.{}", ext.to_string_lossy()),
        None => format!("{stem}.{CHECKED_INFIX}"),
    };
    source.with_file_name(name)
}
