//! Where plugins obtain their content accesses
//!
//! [`ContentAccessFactory`] is the boundary between the access layer and the
//! host platform. The layer only relies on the handles it returns honouring
//! the access traits. [`LocalContentAccessFactory`] serves a solution
//! directory laid out on the local filesystem.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::access::{ReadAccess, ReadWriteAccess, UserContentAccess};
use crate::contained::{ContainedAccess, PluginLocator, SystemDirLocator};
use crate::local::RootedResolver;
use crate::text::TextEncoding;
use crate::user::ProtectedContent;
use crate::{Error, Result};

/// Hands out accesses scoped to the calling plugin.
pub trait ContentAccessFactory: Send + Sync {
    /// Content owned by users, subject to permissions.
    fn user_content_access(&self, base_path: &str) -> Result<Arc<dyn UserContentAccess>>;

    /// The calling plugin's folder in the content repository.
    fn plugin_repository_reader(&self, base_path: &str) -> Result<Arc<dyn ReadAccess>>;
    fn plugin_repository_writer(&self, base_path: &str) -> Result<Arc<dyn ReadWriteAccess>>;

    /// The calling plugin's installation folder.
    fn plugin_system_reader(&self, base_path: &str) -> Result<Arc<dyn ReadAccess>>;
    fn plugin_system_writer(&self, base_path: &str) -> Result<Arc<dyn ReadWriteAccess>>;

    /// Another plugin's installation folder.
    fn other_plugin_system_reader(
        &self,
        plugin_id: &str,
        base_path: &str,
    ) -> Result<Arc<dyn ReadAccess>>;
    fn other_plugin_system_writer(
        &self,
        plugin_id: &str,
        base_path: &str,
    ) -> Result<Arc<dyn ReadWriteAccess>>;
}

/// Every handle is confined to its folder, narrowed by `base_path`. A
/// `base_path` leading out of that folder is a configuration fault.
///
/// Solution layout:
///
/// ```text
/// <solution>/system/<plugin>/            installation folders
/// <solution>/repository/                 user content
/// <solution>/repository/public/<plugin>/ plugin repository folders
/// ```
#[derive(Debug, Clone)]
pub struct LocalContentAccessFactory {
    solution_root: PathBuf,
    plugin_id: String,
    locator: SystemDirLocator,
    encoding: TextEncoding,
}

impl LocalContentAccessFactory {
    pub const SYSTEM_DIR: &'static str = "system";
    pub const REPOSITORY_DIR: &'static str = "repository";
    pub const PUBLIC_DIR: &'static str = "public";

    /// Factory for `plugin_id` within `solution_root`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when `solution_root` does not exist,
    /// or [`Error::UnknownPlugin`] when the plugin has no installation folder
    /// under `<solution>/system`.
    pub fn new(solution_root: impl Into<PathBuf>, plugin_id: impl Into<String>) -> Result<Self> {
        let solution_root = solution_root.into();
        let solution_root = dunce::canonicalize(&solution_root).map_err(|e| {
            Error::configuration(format!(
                "couldn't find the solution at {}: {e}",
                solution_root.display()
            ))
        })?;
        let plugin_id = plugin_id.into();
        let locator = SystemDirLocator::new(solution_root.join(Self::SYSTEM_DIR));
        if locator.plugin_dir(&plugin_id).is_none() {
            return Err(Error::UnknownPlugin { plugin_id });
        }
        Ok(Self {
            solution_root,
            plugin_id,
            locator,
            encoding: TextEncoding::default(),
        })
    }

    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn plugin_id(&self) -> &str {
        &self.plugin_id
    }

    pub fn solution_root(&self) -> &Path {
        &self.solution_root
    }

    fn repository_root(&self) -> PathBuf {
        self.solution_root.join(Self::REPOSITORY_DIR)
    }

    fn plugin_repository(&self, base_path: &str) -> Result<ContainedAccess<RootedResolver>> {
        let root = self
            .repository_root()
            .join(Self::PUBLIC_DIR)
            .join(&self.plugin_id);
        Ok(ContainedAccess::rooted(&root, base_path, true)?.with_encoding(self.encoding))
    }

    fn system(&self, plugin_id: &str, base_path: &str) -> Result<ContainedAccess> {
        let base = Some(base_path).filter(|b| !b.is_empty());
        Ok(ContainedAccess::for_plugin(&self.locator, plugin_id, base)?.with_encoding(self.encoding))
    }
}

impl ContentAccessFactory for LocalContentAccessFactory {
    fn user_content_access(&self, base_path: &str) -> Result<Arc<dyn UserContentAccess>> {
        let inner = ContainedAccess::rooted(&self.repository_root(), base_path, true)?
            .with_encoding(self.encoding);
        Ok(Arc::new(ProtectedContent::new(inner)))
    }

    fn plugin_repository_reader(&self, base_path: &str) -> Result<Arc<dyn ReadAccess>> {
        Ok(Arc::new(self.plugin_repository(base_path)?))
    }

    fn plugin_repository_writer(&self, base_path: &str) -> Result<Arc<dyn ReadWriteAccess>> {
        Ok(Arc::new(self.plugin_repository(base_path)?))
    }

    fn plugin_system_reader(&self, base_path: &str) -> Result<Arc<dyn ReadAccess>> {
        Ok(Arc::new(self.system(&self.plugin_id, base_path)?))
    }

    fn plugin_system_writer(&self, base_path: &str) -> Result<Arc<dyn ReadWriteAccess>> {
        Ok(Arc::new(self.system(&self.plugin_id, base_path)?))
    }

    fn other_plugin_system_reader(
        &self,
        plugin_id: &str,
        base_path: &str,
    ) -> Result<Arc<dyn ReadAccess>> {
        Ok(Arc::new(self.system(plugin_id, base_path)?))
    }

    fn other_plugin_system_writer(
        &self,
        plugin_id: &str,
        base_path: &str,
    ) -> Result<Arc<dyn ReadWriteAccess>> {
        Ok(Arc::new(self.system(plugin_id, base_path)?))
    }
}
