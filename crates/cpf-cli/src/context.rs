//! The content the CLI operates on
//!
//! Reads go through a composite of every configured source. Writes go to the
//! first source, under the same base path.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cpf_repository::{
    AccessRegistry, CompositeReadAccess, PathBasedAccess, ReadAccess, ReadWriteAccess,
    SourcesConfig,
};

use crate::error::{CliError, Result};

pub struct AccessContext {
    reader: CompositeReadAccess,
    writer: Arc<dyn ReadWriteAccess>,
}

impl AccessContext {
    /// Open the sources described by a sources file. `base` overrides the
    /// file's base path.
    pub fn from_sources(file: &Path, base: Option<&str>) -> Result<Self> {
        let mut config = SourcesConfig::load(file)?;
        if let Some(base) = base {
            config.base_path = Some(base.to_string());
        }
        let sources = config.build_sources(&AccessRegistry::with_builtins())?;
        Self::layered(sources, config.base_path.as_deref())
    }

    /// Layer plain content directories, earlier ones first.
    pub fn from_roots(roots: &[PathBuf], base: Option<&str>) -> Result<Self> {
        let mut sources: Vec<Arc<dyn ReadWriteAccess>> = Vec::with_capacity(roots.len());
        for root in roots {
            if !root.is_dir() {
                return Err(CliError::user(format!(
                    "root {} is not a directory",
                    root.display()
                )));
            }
            sources.push(Arc::new(PathBasedAccess::rooted(root)));
        }
        Self::layered(sources, base)
    }

    fn layered(sources: Vec<Arc<dyn ReadWriteAccess>>, base: Option<&str>) -> Result<Self> {
        let writer = sources
            .first()
            .cloned()
            .ok_or_else(|| CliError::user("either --sources or --root is required"))?;
        let readers: Vec<Arc<dyn ReadAccess>> = sources
            .into_iter()
            .map(|source| source as Arc<dyn ReadAccess>)
            .collect();
        tracing::debug!(sources = readers.len(), base = ?base, "Opened content");
        Ok(Self {
            reader: CompositeReadAccess::new(readers, base),
            writer,
        })
    }

    pub fn reader(&self) -> &CompositeReadAccess {
        &self.reader
    }

    pub fn writer(&self) -> &dyn ReadWriteAccess {
        self.writer.as_ref()
    }

    /// The first source's path for a content path.
    pub fn write_path(&self, path: &str) -> String {
        self.reader.full_path(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpf_test_utils::TestSolution;
    use std::fs;

    #[test]
    fn roots_are_layered_in_order() {
        let solution = TestSolution::new()
            .with_file("overrides/theme.css", "dark")
            .with_file("defaults/theme.css", "light")
            .with_file("defaults/base.css", "base");
        let roots = [
            solution.root().join("overrides"),
            solution.root().join("defaults"),
        ];

        let context = AccessContext::from_roots(&roots, None).unwrap();
        assert_eq!(context.reader().read_text("/theme.css").unwrap(), "dark");
        assert_eq!(context.reader().read_text("/base.css").unwrap(), "base");

        assert!(context.writer().save_text(&context.write_path("/new.css"), "new"));
        solution.assert_file_contains("overrides/new.css", "new");
    }

    #[test]
    fn base_path_applies_to_reads_and_writes() {
        let solution = TestSolution::new().with_file("content/public/a.txt", "a");
        let roots = [solution.root().join("content")];

        let context = AccessContext::from_roots(&roots, Some("/public")).unwrap();
        assert_eq!(context.reader().read_text("/a.txt").unwrap(), "a");
        assert_eq!(context.write_path("/b.txt"), "/public/b.txt");
    }

    #[test]
    fn missing_root_is_a_user_error() {
        let solution = TestSolution::new();
        let err = AccessContext::from_roots(&[solution.root().join("nope")], None)
            .err()
            .unwrap();
        assert!(matches!(err, CliError::User { .. }));
    }

    #[test]
    fn no_sources_at_all_is_a_user_error() {
        let err = AccessContext::from_roots(&[], None).err().unwrap();
        assert!(err.to_string().contains("--root"));
    }

    #[test]
    fn sources_file_builds_the_composite() {
        let solution = TestSolution::new()
            .with_plugin("cde")
            .with_file("system/cde/resources/base.css", "plugin");
        fs::write(
            solution.root().join("sources.toml"),
            "[[source]]\nkind = \"contained\"\nplugin_dir = \"system/cde\"\nbase_path = \"resources\"\n",
        )
        .unwrap();

        let context = AccessContext::from_sources(&solution.root().join("sources.toml"), None).unwrap();
        assert_eq!(context.reader().read_text("/base.css").unwrap(), "plugin");
        assert!(!context.reader().exists("/../../sources.toml"));
    }
}
