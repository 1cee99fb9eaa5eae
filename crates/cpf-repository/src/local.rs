//! Filesystem-backed content access
//!
//! [`PathBasedAccess`] implements every read and write operation on top of
//! local file primitives. Where a logical path lands on disk is decided by a
//! [`PathResolver`], so the same access serves plain roots, plugin folders and
//! contained folders.

use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use crate::access::{ListOptions, ReadAccess, ReadWriteAccess};
use crate::file::{BasicFile, ContentStream};
use crate::filter::FileFilter;
use crate::io::write_atomic;
use crate::listing::{self, EntryTree};
use crate::path;
use crate::text::TextEncoding;

/// Maps logical paths to locations on disk.
pub trait PathResolver: Send + Sync {
    /// Location of `path`. The empty path denotes the root itself.
    fn resolve(&self, path: &str) -> PathBuf;

    /// Anchor against which returned [`BasicFile`] paths are relativized.
    fn root(&self) -> &Path;

    /// Whether a listed entry below the starting point is shown.
    fn shows(&self, _entry: &Path, _include_hidden: bool) -> bool {
        true
    }

    /// Called after a folder was created with `hidden = true`.
    fn mark_hidden(&self, _folder: &Path) {}
}

/// Resolves logical paths directly beneath a fixed root.
#[derive(Debug, Clone)]
pub struct RootedResolver {
    root: PathBuf,
    hide_dot_entries: bool,
}

impl RootedResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            hide_dot_entries: false,
        }
    }

    /// Skip dot-prefixed entries in listings unless hidden entries are
    /// requested.
    pub fn hiding_dot_entries(mut self) -> Self {
        self.hide_dot_entries = true;
        self
    }
}

impl PathResolver for RootedResolver {
    fn resolve(&self, path: &str) -> PathBuf {
        path::join_under(&self.root, path)
    }

    fn root(&self) -> &Path {
        &self.root
    }

    fn shows(&self, entry: &Path, include_hidden: bool) -> bool {
        if !self.hide_dot_entries || include_hidden {
            return true;
        }
        !entry
            .file_name()
            .is_some_and(|n| n.to_string_lossy().starts_with('.'))
    }
}

/// Read-write access to files under the locations chosen by `R`.
#[derive(Debug, Clone)]
pub struct PathBasedAccess<R> {
    resolver: R,
    encoding: TextEncoding,
}

impl PathBasedAccess<RootedResolver> {
    /// Access rooted at `root`, showing every entry.
    pub fn rooted(root: impl Into<PathBuf>) -> Self {
        Self::new(RootedResolver::new(root))
    }
}

impl<R: PathResolver> PathBasedAccess<R> {
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            encoding: TextEncoding::default(),
        }
    }

    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn root(&self) -> &Path {
        self.resolver.root()
    }

    /// Where `path` lives on disk.
    pub fn locate(&self, path: &str) -> PathBuf {
        self.resolver.resolve(path)
    }

    fn describe(&self, location: &Path) -> BasicFile {
        BasicFile::from_location(location, path::relativize(self.root(), location))
    }
}

impl<R: PathResolver> ReadAccess for PathBasedAccess<R> {
    fn read(&self, path: &str) -> Option<ContentStream> {
        let location = self.locate(path);
        if !location.is_file() {
            tracing::debug!(path, location = %location.display(), "Nothing to read");
            return None;
        }
        match fs::File::open(&location) {
            Ok(file) => Some(Box::new(BufReader::new(file))),
            Err(e) => {
                tracing::warn!(location = %location.display(), error = %e, "Failed to open file");
                None
            }
        }
    }

    fn exists(&self, path: &str) -> bool {
        self.locate(path).exists()
    }

    fn last_modified(&self, path: &str) -> u64 {
        fs::metadata(self.locate(path))
            .and_then(|m| m.modified())
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0)
    }

    fn list_files(
        &self,
        path: &str,
        filter: &dyn FileFilter,
        options: ListOptions,
    ) -> Vec<BasicFile> {
        let start = self.locate(path);
        if !start.exists() {
            return Vec::new();
        }
        listing::collect(&LocalTree { access: self }, start, filter, options)
    }

    fn fetch_file(&self, path: &str) -> Option<BasicFile> {
        let location = self.locate(path);
        location.exists().then(|| self.describe(&location))
    }

    fn encoding(&self) -> TextEncoding {
        self.encoding
    }
}

impl<R: PathResolver> ReadWriteAccess for PathBasedAccess<R> {
    fn save_stream(&self, path: &str, content: &mut dyn Read) -> bool {
        let location = self.locate(path);
        match write_atomic(&location, content) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(path, error = %e, "Failed to save file");
                false
            }
        }
    }

    fn delete_file(&self, path: &str) -> bool {
        let location = self.locate(path);
        let outcome = if location.is_dir() {
            fs::remove_dir(&location)
        } else {
            fs::remove_file(&location)
        };
        match outcome {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(location = %location.display(), error = %e, "Delete failed");
                false
            }
        }
    }

    fn create_folder(&self, path: &str, hidden: bool) -> bool {
        let location = self.locate(path);
        if location.exists() {
            tracing::debug!(location = %location.display(), "Folder already exists");
            return false;
        }
        match fs::create_dir_all(&location) {
            Ok(()) => {
                if hidden {
                    self.resolver.mark_hidden(&location);
                }
                true
            }
            Err(e) => {
                tracing::warn!(location = %location.display(), error = %e, "Failed to create folder");
                false
            }
        }
    }
}

struct LocalTree<'a, R> {
    access: &'a PathBasedAccess<R>,
}

impl<R: PathResolver> EntryTree for LocalTree<'_, R> {
    type Entry = PathBuf;

    fn is_dir(&self, entry: &PathBuf) -> bool {
        entry.is_dir()
    }

    fn children(&self, entry: &PathBuf) -> Vec<PathBuf> {
        match fs::read_dir(entry) {
            Ok(entries) => entries.filter_map(|e| e.ok()).map(|e| e.path()).collect(),
            Err(e) => {
                tracing::warn!(location = %entry.display(), error = %e, "Failed to list folder");
                Vec::new()
            }
        }
    }

    fn describe(&self, entry: &PathBuf) -> BasicFile {
        self.access.describe(entry)
    }

    fn shows(&self, entry: &PathBuf, include_hidden: bool) -> bool {
        self.access.resolver.shows(entry, include_hidden)
    }
}
