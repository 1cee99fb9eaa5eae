//! File and directory descriptors returned by fetch and list operations

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::path;

/// A readable byte stream handed out by an access. Dropping it releases it.
pub type ContentStream = Box<dyn Read + Send>;

type Opener = Arc<dyn Fn() -> io::Result<ContentStream> + Send + Sync>;

/// Snapshot of a file or directory entry.
///
/// Built on demand and never mutated. The contents are opened lazily each
/// time [`BasicFile::contents`] is called.
#[derive(Clone)]
pub struct BasicFile {
    name: String,
    full_path: String,
    path: String,
    extension: String,
    is_directory: bool,
    opener: Opener,
}

impl BasicFile {
    /// Create a descriptor whose contents come from `opener`.
    pub fn new<F>(
        name: impl Into<String>,
        full_path: impl Into<String>,
        path: impl Into<String>,
        is_directory: bool,
        opener: F,
    ) -> Self
    where
        F: Fn() -> io::Result<ContentStream> + Send + Sync + 'static,
    {
        let name = name.into();
        let extension = path::extension(&name).to_string();
        Self {
            name,
            full_path: full_path.into(),
            path: path.into(),
            extension,
            is_directory,
            opener: Arc::new(opener),
        }
    }

    /// Describe a local filesystem entry, `relative` being its path from the
    /// owning access root.
    pub fn from_location(location: &Path, relative: String) -> Self {
        let name = location
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let owned: PathBuf = location.to_path_buf();
        BasicFile::new(
            name,
            path::to_unix(location),
            relative,
            location.is_dir(),
            move || {
                let file = File::open(&owned)?;
                Ok(Box::new(BufReader::new(file)) as ContentStream)
            },
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute location in the backing store.
    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    /// Location relative to the owning access root, starting with `/`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Extension derived from the name, for directories too.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn is_directory(&self) -> bool {
        self.is_directory
    }

    /// Open the contents for reading.
    pub fn contents(&self) -> io::Result<ContentStream> {
        (self.opener)()
    }
}

impl fmt::Debug for BasicFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicFile")
            .field("name", &self.name)
            .field("full_path", &self.full_path)
            .field("path", &self.path)
            .field("extension", &self.extension)
            .field("is_directory", &self.is_directory)
            .finish_non_exhaustive()
    }
}
