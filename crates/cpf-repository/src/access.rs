//! Capability traits for content access
//!
//! [`ReadAccess`] is the base capability. [`ReadWriteAccess`] adds mutation and
//! [`UserContentAccess`] adds permission checks on top of that. Concrete
//! accesses implement only the capabilities they actually support.
//!
//! Content operations never fail with an error. "Not there" and "did not
//! happen" are reported as `None`, `false`, an empty listing or a zero
//! timestamp; underlying I/O faults are logged and swallowed.

use std::io::Read;

use crate::file::{BasicFile, ContentStream};
use crate::filter::FileFilter;
use crate::text::TextEncoding;

/// How far and how wide a listing reaches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// `None` descends without bound; `Some(0)` lists the starting entry only.
    pub max_depth: Option<u32>,
    /// Whether directories themselves appear in the listing.
    pub include_dirs: bool,
    /// Whether hidden entries may appear. Honoured by accesses that have a
    /// notion of hidden entries.
    pub include_hidden: bool,
}

impl ListOptions {
    /// Options for a depth given in the signed convention, where any negative
    /// value means unbounded.
    pub fn from_depth(max_depth: i32) -> Self {
        Self {
            max_depth: u32::try_from(max_depth).ok(),
            ..Self::default()
        }
    }

    pub fn max_depth(mut self, depth: u32) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn include_dirs(mut self, include: bool) -> Self {
        self.include_dirs = include;
        self
    }

    pub fn include_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }
}

/// Kinds of access a caller may ask permission for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileAccess {
    Read,
    Write,
    Execute,
    Delete,
}

/// Read-only access to content under some root.
pub trait ReadAccess: Send + Sync {
    /// Open the entry at `path`, or `None` if it does not exist.
    fn read(&self, path: &str) -> Option<ContentStream>;

    fn exists(&self, path: &str) -> bool;

    /// Milliseconds since the Unix epoch, 0 if the entry is absent.
    fn last_modified(&self, path: &str) -> u64;

    /// Walk from `path`, collecting entries accepted by `filter`.
    ///
    /// Result order follows the backing store's enumeration and is not
    /// guaranteed to be sorted.
    fn list_files(
        &self,
        path: &str,
        filter: &dyn FileFilter,
        options: ListOptions,
    ) -> Vec<BasicFile>;

    fn fetch_file(&self, path: &str) -> Option<BasicFile>;

    /// Encoding used by [`ReadAccess::read_text`].
    fn encoding(&self) -> TextEncoding {
        TextEncoding::default()
    }

    /// Read the whole entry. The stream is released on every exit path.
    fn read_bytes(&self, path: &str) -> Option<Vec<u8>> {
        let mut stream = self.read(path)?;
        let mut buf = Vec::new();
        match stream.read_to_end(&mut buf) {
            Ok(_) => Some(buf),
            Err(e) => {
                tracing::warn!(path, error = %e, "Failed to read content");
                None
            }
        }
    }

    /// Read the whole entry and decode it with [`ReadAccess::encoding`].
    fn read_text(&self, path: &str) -> Option<String> {
        let bytes = self.read_bytes(path)?;
        let encoding = self.encoding();
        let text = encoding.decode(&bytes);
        if text.is_none() {
            tracing::warn!(path, %encoding, "Content is not valid text");
        }
        text
    }
}

/// Read access plus the ability to change content.
pub trait ReadWriteAccess: ReadAccess {
    /// Create or replace the entry at `path` from a stream, creating parent
    /// folders as needed. `false` means nothing was written.
    fn save_stream(&self, path: &str, content: &mut dyn Read) -> bool;

    fn delete_file(&self, path: &str) -> bool;

    /// Create the folder at `path` and any missing ancestors.
    fn create_folder(&self, path: &str, hidden: bool) -> bool;

    fn save_file(&self, path: &str, content: &[u8]) -> bool {
        let mut reader = content;
        self.save_stream(path, &mut reader)
    }

    /// Encode with [`ReadAccess::encoding`] and save.
    fn save_text(&self, path: &str, text: &str) -> bool {
        let encoding = self.encoding();
        match encoding.encode(text) {
            Some(bytes) => self.save_file(path, &bytes),
            None => {
                tracing::warn!(path, %encoding, "Text cannot be encoded");
                false
            }
        }
    }

    /// Read `from` fully and save it at `to`. `to` is untouched when `from`
    /// cannot be read.
    fn copy_file(&self, from: &str, to: &str) -> bool {
        match self.read_bytes(from) {
            Some(bytes) => self.save_file(to, &bytes),
            None => false,
        }
    }
}

/// Read-write access to user content, which is subject to permissions.
pub trait UserContentAccess: ReadWriteAccess {
    fn has_access(&self, path: &str, access: FileAccess) -> bool;
}
