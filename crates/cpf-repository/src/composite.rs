//! Several read-only sources presented as one

use std::fmt;
use std::sync::Arc;

use crate::access::{ListOptions, ReadAccess};
use crate::file::{BasicFile, ContentStream};
use crate::filter::FileFilter;
use crate::path;

/// Ordered read-only sources sharing one external base path.
///
/// Each operation composes `base_path + path` and is answered by the first
/// source, in list order, for which that path exists. Listings come from that
/// single source and are never merged across sources.
#[derive(Clone)]
pub struct CompositeReadAccess {
    sources: Arc<[Arc<dyn ReadAccess>]>,
    base_path: String,
}

impl CompositeReadAccess {
    /// `base_path` of `None` means the empty base.
    pub fn new(sources: impl Into<Arc<[Arc<dyn ReadAccess>]>>, base_path: Option<&str>) -> Self {
        Self {
            sources: sources.into(),
            base_path: base_path.unwrap_or_default().to_string(),
        }
    }

    pub fn sources(&self) -> &[Arc<dyn ReadAccess>] {
        &self.sources
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// The path handed to sources for a caller's `path`.
    pub fn full_path(&self, path: &str) -> String {
        path::compose(&self.base_path, path)
    }

    /// The first source holding `full_path`.
    fn owner(&self, full_path: &str) -> Option<&Arc<dyn ReadAccess>> {
        let found = self
            .sources
            .iter()
            .enumerate()
            .find(|(_, source)| source.exists(full_path));
        match found {
            Some((index, source)) => {
                tracing::debug!(path = full_path, source = index, "Resolved composite path");
                Some(source)
            }
            None => {
                tracing::debug!(path = full_path, "No source holds path");
                None
            }
        }
    }
}

impl ReadAccess for CompositeReadAccess {
    fn read(&self, path: &str) -> Option<ContentStream> {
        let full_path = self.full_path(path);
        self.owner(&full_path)?.read(&full_path)
    }

    fn exists(&self, path: &str) -> bool {
        self.owner(&self.full_path(path)).is_some()
    }

    /// Timestamp from the owning source, or 0 when no source holds the path.
    fn last_modified(&self, path: &str) -> u64 {
        let full_path = self.full_path(path);
        self.owner(&full_path)
            .map(|source| source.last_modified(&full_path))
            .unwrap_or(0)
    }

    fn list_files(
        &self,
        path: &str,
        filter: &dyn FileFilter,
        options: ListOptions,
    ) -> Vec<BasicFile> {
        let full_path = self.full_path(path);
        self.owner(&full_path)
            .map(|source| source.list_files(&full_path, filter, options))
            .unwrap_or_default()
    }

    fn fetch_file(&self, path: &str) -> Option<BasicFile> {
        let full_path = self.full_path(path);
        self.owner(&full_path)?.fetch_file(&full_path)
    }

    /// Decodes with the owning source's encoding.
    fn read_text(&self, path: &str) -> Option<String> {
        let full_path = self.full_path(path);
        self.owner(&full_path)?.read_text(&full_path)
    }
}

impl fmt::Debug for CompositeReadAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeReadAccess")
            .field("sources", &self.sources.len())
            .field("base_path", &self.base_path)
            .finish()
    }
}
