//! User content: read-write access subject to permission checks

use std::io::Read;

use crate::access::{FileAccess, ListOptions, ReadAccess, ReadWriteAccess, UserContentAccess};
use crate::file::{BasicFile, ContentStream};
use crate::filter::FileFilter;
use crate::path;
use crate::text::TextEncoding;

/// Wraps a read-write access with a simple permission policy.
///
/// Reading and executing require the entry to exist. Writing and deleting are
/// refused beneath hidden segments and beneath any protected prefix, judged
/// on the path with its dot segments resolved, and for paths climbing above
/// the root. Refused writes report `false` like any other failed write.
#[derive(Debug, Clone)]
pub struct ProtectedContent<A> {
    inner: A,
    protected: Vec<String>,
}

impl<A: ReadWriteAccess> ProtectedContent<A> {
    /// Protects `/etc`, the repository's system area.
    pub fn new(inner: A) -> Self {
        Self::with_protected(inner, ["/etc"])
    }

    pub fn with_protected<I, S>(inner: A, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            inner,
            protected: prefixes
                .into_iter()
                .map(|p| path::segments(p.as_ref()).collect::<Vec<_>>().join("/"))
                .collect(),
        }
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }

    fn is_protected(&self, logical: &str) -> bool {
        let segments: Vec<&str> = path::segments(logical).collect();
        self.protected.iter().any(|prefix| {
            let prefix: Vec<&str> = path::segments(prefix).collect();
            segments.starts_with(&prefix)
        })
    }

    fn may_change(&self, logical: &str, access: FileAccess) -> bool {
        let allowed = self.has_access(logical, access);
        if !allowed {
            tracing::debug!(path = logical, ?access, "Permission denied");
        }
        allowed
    }
}

impl<A: ReadWriteAccess> ReadAccess for ProtectedContent<A> {
    fn read(&self, path: &str) -> Option<ContentStream> {
        self.inner.read(path)
    }

    fn exists(&self, path: &str) -> bool {
        self.inner.exists(path)
    }

    fn last_modified(&self, path: &str) -> u64 {
        self.inner.last_modified(path)
    }

    fn list_files(
        &self,
        path: &str,
        filter: &dyn FileFilter,
        options: ListOptions,
    ) -> Vec<BasicFile> {
        self.inner.list_files(path, filter, options)
    }

    fn fetch_file(&self, path: &str) -> Option<BasicFile> {
        self.inner.fetch_file(path)
    }

    fn encoding(&self) -> TextEncoding {
        self.inner.encoding()
    }
}

impl<A: ReadWriteAccess> ReadWriteAccess for ProtectedContent<A> {
    fn save_stream(&self, path: &str, content: &mut dyn Read) -> bool {
        self.may_change(path, FileAccess::Write) && self.inner.save_stream(path, content)
    }

    fn delete_file(&self, path: &str) -> bool {
        self.may_change(path, FileAccess::Delete) && self.inner.delete_file(path)
    }

    fn create_folder(&self, path: &str, hidden: bool) -> bool {
        self.may_change(path, FileAccess::Write) && self.inner.create_folder(path, hidden)
    }
}

impl<A: ReadWriteAccess> UserContentAccess for ProtectedContent<A> {
    fn has_access(&self, path: &str, access: FileAccess) -> bool {
        match access {
            FileAccess::Read | FileAccess::Execute => self.inner.exists(path),
            FileAccess::Write | FileAccess::Delete => match path::normalize_logical(path) {
                Some(logical) => {
                    !path::has_hidden_segment(&logical) && !self.is_protected(&logical)
                }
                None => false,
            },
        }
    }
}
