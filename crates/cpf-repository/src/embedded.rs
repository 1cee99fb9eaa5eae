//! Read-only access to resources bundled with the binary

use std::collections::{BTreeMap, BTreeSet};
use std::io::Cursor;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::access::{ListOptions, ReadAccess};
use crate::file::{BasicFile, ContentStream};
use crate::filter::FileFilter;
use crate::listing::{self, EntryTree};
use crate::path;
use crate::text::TextEncoding;

/// Resources held in memory, addressed by logical path.
///
/// Folders are implied by the paths of the resources beneath them. Entries
/// whose name starts with `.` are hidden from listings unless requested.
#[derive(Debug, Clone)]
pub struct EmbeddedAccess {
    name: String,
    resources: BTreeMap<String, Arc<[u8]>>,
    loaded_at: u64,
    encoding: TextEncoding,
}

impl EmbeddedAccess {
    /// An empty bundle; `name` prefixes the full paths it reports.
    pub fn new(name: impl Into<String>) -> Self {
        let loaded_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0);
        Self {
            name: name.into(),
            resources: BTreeMap::new(),
            loaded_at,
            encoding: TextEncoding::default(),
        }
    }

    /// A bundle from a static table, as produced by `include_bytes!`.
    pub fn from_static(name: impl Into<String>, table: &[(&str, &'static [u8])]) -> Self {
        table
            .iter()
            .fold(Self::new(name), |bundle, (path, bytes)| bundle.with_resource(path, *bytes))
    }

    pub fn with_resource(mut self, path: &str, content: impl Into<Arc<[u8]>>) -> Self {
        self.resources.insert(key(path), content.into());
        self
    }

    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    fn is_folder(&self, key: &str) -> bool {
        if key.is_empty() {
            return true;
        }
        let prefix = format!("{key}/");
        self.resources
            .range(prefix.clone()..)
            .next()
            .is_some_and(|(k, _)| k.starts_with(&prefix))
    }

    fn describe(&self, key: &str) -> BasicFile {
        let relative = format!("/{key}");
        let full_path = format!("{}:{}", self.name, relative);
        let name = path::file_name(key).to_string();
        if self.is_folder(key) {
            return BasicFile::new(name, full_path, relative, true, || {
                Err(std::io::Error::other("embedded folders have no contents"))
            });
        }
        let content = self.resources.get(key).cloned().unwrap_or_else(|| Arc::from(Vec::new()));
        BasicFile::new(name, full_path, relative, false, move || {
            Ok(Box::new(Cursor::new(Arc::clone(&content))) as ContentStream)
        })
    }
}

/// Canonical key: segments joined by `/`, no leading or trailing separator.
fn key(logical: &str) -> String {
    path::segments(logical).collect::<Vec<_>>().join("/")
}

impl ReadAccess for EmbeddedAccess {
    fn read(&self, path: &str) -> Option<ContentStream> {
        let content = self.resources.get(&key(path))?;
        Some(Box::new(Cursor::new(Arc::clone(content))))
    }

    fn exists(&self, path: &str) -> bool {
        let key = key(path);
        self.resources.contains_key(&key) || self.is_folder(&key)
    }

    fn last_modified(&self, path: &str) -> u64 {
        if self.exists(path) { self.loaded_at } else { 0 }
    }

    fn list_files(
        &self,
        path: &str,
        filter: &dyn FileFilter,
        options: ListOptions,
    ) -> Vec<BasicFile> {
        let start = key(path);
        if !self.exists(&start) {
            return Vec::new();
        }
        listing::collect(self, start, filter, options)
    }

    fn fetch_file(&self, path: &str) -> Option<BasicFile> {
        let key = key(path);
        self.exists(&key).then(|| self.describe(&key))
    }

    fn encoding(&self) -> TextEncoding {
        self.encoding
    }
}

impl EntryTree for EmbeddedAccess {
    type Entry = String;

    fn is_dir(&self, entry: &String) -> bool {
        self.is_folder(entry)
    }

    fn children(&self, entry: &String) -> Vec<String> {
        let prefix = if entry.is_empty() {
            String::new()
        } else {
            format!("{entry}/")
        };
        let names: BTreeSet<&str> = self
            .resources
            .range(prefix.clone()..)
            .take_while(|(k, _)| k.starts_with(&prefix))
            .filter_map(|(k, _)| k[prefix.len()..].split('/').next())
            .collect();
        names.into_iter().map(|n| format!("{prefix}{n}")).collect()
    }

    fn describe(&self, entry: &String) -> BasicFile {
        EmbeddedAccess::describe(self, entry)
    }

    fn shows(&self, entry: &String, include_hidden: bool) -> bool {
        include_hidden || !path::file_name(entry).starts_with('.')
    }
}
