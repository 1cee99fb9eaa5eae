//! Plugin system-folder access that never leaves its base directory
//!
//! Callers address plugin resources in two conventions: plugin-relative
//! (`/static/app.js`) or fully qualified through the solution's system folder
//! (`/system/<plugin>/static/app.js`). [`SystemResolver`] reconciles both,
//! and [`ContainedAccess`] rejects anything that resolves outside the base
//! directory as not found. The same containment serves plain rooted folders
//! such as the plugin's repository folder.

use std::io::Read;
use std::path::{Path, PathBuf};

use crate::access::{ListOptions, ReadAccess, ReadWriteAccess};
use crate::file::{BasicFile, ContentStream};
use crate::filter::FileFilter;
use crate::local::{PathBasedAccess, PathResolver, RootedResolver};
use crate::path;
use crate::text::TextEncoding;
use crate::{Error, Result};

const SYSTEM_SEGMENT: &str = "system";

/// Finds the folder a plugin is installed in.
pub trait PluginLocator: Send + Sync {
    fn plugin_dir(&self, plugin_id: &str) -> Option<PathBuf>;
}

/// Plugins live in `<system_dir>/<plugin_id>`.
#[derive(Debug, Clone)]
pub struct SystemDirLocator {
    system_dir: PathBuf,
}

impl SystemDirLocator {
    pub fn new(system_dir: impl Into<PathBuf>) -> Self {
        Self {
            system_dir: system_dir.into(),
        }
    }

    pub fn system_dir(&self) -> &Path {
        &self.system_dir
    }
}

impl PluginLocator for SystemDirLocator {
    fn plugin_dir(&self, plugin_id: &str) -> Option<PathBuf> {
        if plugin_id.is_empty() || plugin_id.contains(['/', '\\']) || plugin_id.starts_with('.') {
            return None;
        }
        let dir = self.system_dir.join(plugin_id);
        dir.is_dir().then_some(dir)
    }
}

/// Resolves paths beneath a plugin base directory, applying the legacy
/// `/system/<plugin>/` alias.
#[derive(Debug, Clone)]
pub struct SystemResolver {
    base_dir: PathBuf,
}

impl SystemResolver {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn base_segments(&self) -> Vec<String> {
        self.base_dir
            .components()
            .filter_map(|c| match c {
                std::path::Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect()
    }

    /// The solution system folder above the base directory: the prefix up to
    /// the last `system` segment.
    fn system_root(&self) -> Option<PathBuf> {
        self.base_dir
            .ancestors()
            .find(|a| a.file_name().is_some_and(|n| n == SYSTEM_SEGMENT))
            .map(Path::to_path_buf)
    }
}

/// Split `/system/<plugin>/rest` into `(<plugin>, /rest)`.
fn split_system_alias(logical: &str) -> Option<(&str, &str)> {
    let after_system = logical.strip_prefix("/system/")?;
    let (plugin, rest) = match after_system.find(path::SEPARATOR) {
        Some(idx) => (&after_system[..idx], &after_system[idx..]),
        None => (after_system, ""),
    };
    (!plugin.is_empty()).then_some((plugin, rest))
}

impl PathResolver for SystemResolver {
    fn resolve(&self, logical: &str) -> PathBuf {
        if let Some((plugin, rest)) = split_system_alias(logical) {
            let segments = self.base_segments();
            let names_alias = |w: &[String]| w[0] == SYSTEM_SEGMENT && w[1] == plugin;

            if segments.len() >= 2 && names_alias(&segments[segments.len() - 2..]) {
                tracing::debug!(logical, "Stripping redundant system alias");
                return path::join_under(&self.base_dir, rest);
            }

            if !segments.windows(2).any(names_alias) {
                if let Some(system_root) = self.system_root() {
                    let target = system_root.join(plugin);
                    tracing::debug!(logical, target = %target.display(), "Retargeting system alias");
                    return path::join_under(&target, rest);
                }
            }
        }
        path::join_under(&self.base_dir, logical)
    }

    fn root(&self) -> &Path {
        &self.base_dir
    }
}

/// `base_path` beneath `root`, with dot segments resolved.
///
/// # Errors
///
/// Returns [`Error::Configuration`] when the result is not `root` or below it.
pub(crate) fn narrow(root: &Path, base_path: &str) -> Result<PathBuf> {
    path::normalize(&path::join_under(root, base_path))
        .filter(|dir| path::is_within(root, dir))
        .ok_or_else(|| {
            Error::configuration(format!(
                "base path '{base_path}' leaves {}",
                root.display()
            ))
        })
}

/// Read-write access confined to a base directory.
///
/// Every operation first checks that the resolved location, normalized, lies
/// within the base directory. Anything else behaves as absent: reads return
/// `None`, writes return `false`, listings are empty.
///
/// The check is lexical. A symbolic link inside the base is followed wherever
/// it points.
#[derive(Debug, Clone)]
pub struct ContainedAccess<R = SystemResolver> {
    inner: PathBasedAccess<R>,
}

impl ContainedAccess {
    /// Contain access to `plugin_dir`, optionally narrowed to `base_path`
    /// beneath it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when `plugin_dir` is not an existing
    /// directory, or when `base_path` leads out of it.
    pub fn new(plugin_dir: impl AsRef<Path>, base_path: Option<&str>) -> Result<Self> {
        let plugin_dir = plugin_dir.as_ref();
        if plugin_dir.as_os_str().is_empty() {
            return Err(Error::configuration("plugin directory is empty"));
        }
        let canonical = dunce::canonicalize(plugin_dir).map_err(|e| {
            Error::configuration(format!(
                "couldn't find a valid base path at {}: {e}",
                plugin_dir.display()
            ))
        })?;
        if !canonical.is_dir() {
            return Err(Error::configuration(format!(
                "{} is not a directory",
                canonical.display()
            )));
        }

        let base_dir = match base_path.filter(|b| !b.is_empty()) {
            Some(base) => narrow(&canonical, base)?,
            None => canonical,
        };

        Ok(Self {
            inner: PathBasedAccess::new(SystemResolver::new(base_dir)),
        })
    }

    /// Contain access to the folder `locator` reports for `plugin_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownPlugin`] when the locator does not know the
    /// plugin, or [`Error::Configuration`] as for [`ContainedAccess::new`].
    pub fn for_plugin(
        locator: &dyn PluginLocator,
        plugin_id: &str,
        base_path: Option<&str>,
    ) -> Result<Self> {
        let plugin_dir = locator
            .plugin_dir(plugin_id)
            .ok_or_else(|| Error::UnknownPlugin {
                plugin_id: plugin_id.to_string(),
            })?;
        Self::new(plugin_dir, base_path)
    }
}

impl ContainedAccess<RootedResolver> {
    /// Contain access to `root`, narrowed to `base_path` beneath it. The
    /// folders need not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when `base_path` leads out of `root`.
    pub fn rooted(root: &Path, base_path: &str, hide_dot_entries: bool) -> Result<Self> {
        let mut resolver = RootedResolver::new(narrow(root, base_path)?);
        if hide_dot_entries {
            resolver = resolver.hiding_dot_entries();
        }
        Ok(Self::wrap(PathBasedAccess::new(resolver)))
    }
}

impl<R: PathResolver> ContainedAccess<R> {
    /// Contain `inner` to its resolver's root.
    pub fn wrap(inner: PathBasedAccess<R>) -> Self {
        Self { inner }
    }

    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.inner = self.inner.with_encoding(encoding);
        self
    }

    pub fn base_dir(&self) -> &Path {
        self.inner.root()
    }

    /// Whether `path` resolves inside the base directory.
    pub fn contains(&self, path: &str) -> bool {
        let location = self.inner.locate(path);
        let inside = path::is_within(self.base_dir(), &location);
        if !inside {
            tracing::debug!(path, location = %location.display(), "Path escapes base directory");
        }
        inside
    }
}

impl<R: PathResolver> ReadAccess for ContainedAccess<R> {
    fn read(&self, path: &str) -> Option<ContentStream> {
        if !self.contains(path) {
            return None;
        }
        self.inner.read(path)
    }

    fn exists(&self, path: &str) -> bool {
        self.inner.exists(path) && self.contains(path)
    }

    fn last_modified(&self, path: &str) -> u64 {
        if !self.contains(path) {
            return 0;
        }
        self.inner.last_modified(path)
    }

    fn list_files(
        &self,
        path: &str,
        filter: &dyn FileFilter,
        options: ListOptions,
    ) -> Vec<BasicFile> {
        if !self.contains(path) {
            return Vec::new();
        }
        self.inner.list_files(path, filter, options)
    }

    fn fetch_file(&self, path: &str) -> Option<BasicFile> {
        if !self.exists(path) {
            return None;
        }
        self.inner.fetch_file(path)
    }

    fn encoding(&self) -> TextEncoding {
        self.inner.encoding()
    }
}

impl<R: PathResolver> ReadWriteAccess for ContainedAccess<R> {
    fn save_stream(&self, path: &str, content: &mut dyn Read) -> bool {
        if !self.contains(path) {
            return false;
        }
        self.inner.save_stream(path, content)
    }

    fn delete_file(&self, path: &str) -> bool {
        if !self.contains(path) {
            return false;
        }
        self.inner.delete_file(path)
    }

    fn create_folder(&self, path: &str, hidden: bool) -> bool {
        if !self.contains(path) {
            return false;
        }
        self.inner.create_folder(path, hidden)
    }
}

impl<R: PathResolver> std::fmt::Display for ContainedAccess<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ContainedAccess:{}", self.base_dir().display())
    }
}
