//! Constructors for accesses, selected by a kind tag

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::access::ReadWriteAccess;
use crate::config::SourceConfig;
use crate::contained::ContainedAccess;
use crate::local::{PathBasedAccess, RootedResolver};
use crate::text::TextEncoding;
use crate::{Error, Result};

/// Settings shared by every source built from one configuration.
#[derive(Debug, Clone, Default)]
pub struct BuildContext {
    /// Relative locations are resolved against this directory.
    pub config_dir: PathBuf,
    pub encoding: TextEncoding,
}

impl BuildContext {
    fn absolute(&self, location: &Path) -> PathBuf {
        if location.is_absolute() {
            location.to_path_buf()
        } else {
            self.config_dir.join(location)
        }
    }
}

/// Builds an access from its configuration.
pub type AccessConstructor = fn(&SourceConfig, &BuildContext) -> Result<Arc<dyn ReadWriteAccess>>;

/// Maps kind tags to access constructors.
#[derive(Debug, Clone, Default)]
pub struct AccessRegistry {
    constructors: HashMap<String, AccessConstructor>,
}

impl AccessRegistry {
    pub const FILESYSTEM: &'static str = "filesystem";
    pub const CONTAINED: &'static str = "contained";

    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in kinds.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Self::FILESYSTEM, build_filesystem);
        registry.register(Self::CONTAINED, build_contained);
        registry
    }

    /// Register `constructor` under `kind`, replacing any previous one.
    pub fn register(&mut self, kind: impl Into<String>, constructor: AccessConstructor) {
        self.constructors.insert(kind.into(), constructor);
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.constructors.contains_key(kind)
    }

    /// Registered kinds, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }

    /// Build the access described by `source`.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownAccessKind`] for unregistered kinds, otherwise whatever
    /// the constructor reports.
    pub fn build(
        &self,
        source: &SourceConfig,
        context: &BuildContext,
    ) -> Result<Arc<dyn ReadWriteAccess>> {
        let constructor =
            self.constructors
                .get(&source.kind)
                .ok_or_else(|| Error::UnknownAccessKind {
                    kind: source.kind.clone(),
                })?;
        tracing::debug!(kind = %source.kind, "Building access");
        constructor(source, context)
    }
}

fn build_filesystem(
    source: &SourceConfig,
    context: &BuildContext,
) -> Result<Arc<dyn ReadWriteAccess>> {
    let root = source
        .root
        .as_deref()
        .filter(|r| !r.as_os_str().is_empty())
        .ok_or_else(|| Error::configuration("filesystem source needs a `root`"))?;
    let mut resolver = RootedResolver::new(context.absolute(root));
    if source.hide_dot_entries {
        resolver = resolver.hiding_dot_entries();
    }
    Ok(Arc::new(
        PathBasedAccess::new(resolver).with_encoding(context.encoding),
    ))
}

fn build_contained(
    source: &SourceConfig,
    context: &BuildContext,
) -> Result<Arc<dyn ReadWriteAccess>> {
    let plugin_dir = source
        .plugin_dir
        .as_deref()
        .ok_or_else(|| Error::configuration("contained source needs a `plugin_dir`"))?;
    let access = ContainedAccess::new(context.absolute(plugin_dir), source.base_path.as_deref())?;
    Ok(Arc::new(access.with_encoding(context.encoding)))
}
