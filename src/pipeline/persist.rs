use std::path::Path;
use std::{fs, io};

/// Writes a rebuilt playlist to its destination.
pub trait Persist {
    fn persist(&self, destination: &Path, content: &str) -> io::Result<()>;
}

/// Writes playlists to the filesystem, creating parent directories.
#[derive(Debug, Default)]
pub struct FsPersister;

impl Persist for FsPersister {
    fn persist(&self, destination: &Path, content: &str) -> io::Result<()> {
        if let Some(parent) = destination.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(destination, content)
    }
}
