//! TOML description of a composite access
//!
//! ```toml
//! base_path = "/"
//! encoding = "utf-8"
//!
//! [[source]]
//! kind = "filesystem"
//! root = "/opt/solution/repository/public"
//!
//! [[source]]
//! kind = "contained"
//! plugin_dir = "/opt/solution/system/cde"
//! base_path = "resources"
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::access::{ReadAccess, ReadWriteAccess};
use crate::composite::CompositeReadAccess;
use crate::io::write_atomic;
use crate::registry::{AccessRegistry, BuildContext};
use crate::text::TextEncoding;
use crate::{Error, Result};

/// One source of a composite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Registry tag selecting the constructor.
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hide_dot_entries: bool,
}

/// Ordered sources under one external base path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    #[serde(default)]
    pub encoding: TextEncoding,
    #[serde(default, rename = "source")]
    pub sources: Vec<SourceConfig>,
    /// Directory relative locations resolve against.
    #[serde(skip)]
    pub config_dir: PathBuf,
}

impl SourcesConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self::parse(&content, config_dir).map_err(|message| Error::ConfigParse {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parse TOML text; relative locations will resolve against `config_dir`.
    pub fn from_toml_str(content: &str, config_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::parse(content, config_dir.into()).map_err(|message| Error::ConfigParse {
            path: PathBuf::from("<inline>"),
            message,
        })
    }

    fn parse(content: &str, config_dir: PathBuf) -> std::result::Result<Self, String> {
        let mut config: Self = toml::from_str(content).map_err(|e| e.to_string())?;
        config.config_dir = config_dir;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::ConfigSerialize {
            message: e.to_string(),
        })
    }

    /// Save atomically as TOML.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_toml_string()?;
        write_atomic(path, &mut content.as_bytes())
    }

    fn context(&self) -> BuildContext {
        BuildContext {
            config_dir: self.config_dir.clone(),
            encoding: self.encoding,
        }
    }

    /// Build every source, in order.
    ///
    /// # Errors
    ///
    /// [`Error::Configuration`] when no source is configured, or the first
    /// error any source reports.
    pub fn build_sources(&self, registry: &AccessRegistry) -> Result<Vec<Arc<dyn ReadWriteAccess>>> {
        if self.sources.is_empty() {
            return Err(Error::configuration("no sources configured"));
        }
        let context = self.context();
        self.sources
            .iter()
            .map(|source| registry.build(source, &context))
            .collect()
    }

    /// Build the composite read access the configuration describes.
    pub fn build(&self, registry: &AccessRegistry) -> Result<CompositeReadAccess> {
        let readers: Vec<Arc<dyn ReadAccess>> = self
            .build_sources(registry)?
            .into_iter()
            .map(|source| source as Arc<dyn ReadAccess>)
            .collect();
        Ok(CompositeReadAccess::new(readers, self.base_path.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    const SAMPLE: &str = r#"
base_path = "/"
encoding = "iso-8859-1"

[[source]]
kind = "filesystem"
root = "overrides"
hide_dot_entries = true

[[source]]
kind = "filesystem"
root = "defaults"
"#;

    #[test]
    fn parses_sources_in_order() {
        let config = SourcesConfig::from_toml_str(SAMPLE, "/etc/cpf").unwrap();
        assert_eq!(config.base_path.as_deref(), Some("/"));
        assert_eq!(config.encoding, TextEncoding::Latin1);
        assert_eq!(config.sources.len(), 2);
        assert_eq!(config.sources[0].root, Some(PathBuf::from("overrides")));
        assert!(config.sources[0].hide_dot_entries);
        assert!(!config.sources[1].hide_dot_entries);
        assert_eq!(config.config_dir, PathBuf::from("/etc/cpf"));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = SourcesConfig::from_toml_str("[[source]]\nkind = ", "/").unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = SourcesConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn empty_sources_refuse_to_build() {
        let config = SourcesConfig::default();
        let err = config.build(&AccessRegistry::with_builtins()).unwrap_err();
        assert!(err.is_configuration_fault());
    }

    #[test]
    fn builds_composite_with_first_match_semantics() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("overrides")).unwrap();
        fs::create_dir_all(dir.path().join("defaults")).unwrap();
        fs::write(dir.path().join("overrides/theme.css"), "dark").unwrap();
        fs::write(dir.path().join("defaults/theme.css"), "light").unwrap();
        fs::write(dir.path().join("defaults/only.css"), "default only").unwrap();
        fs::write(dir.path().join("sources.toml"), SAMPLE).unwrap();

        let config = SourcesConfig::load(&dir.path().join("sources.toml")).unwrap();
        let composite = config.build(&AccessRegistry::with_builtins()).unwrap();
        assert_eq!(composite.read_text("/theme.css").unwrap(), "dark");
        assert_eq!(composite.read_text("only.css").unwrap(), "default only");
    }

    #[test]
    fn save_then_load_preserves_sources() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.toml");
        let original = SourcesConfig::from_toml_str(SAMPLE, dir.path()).unwrap();
        original.save(&path).unwrap();

        let reloaded = SourcesConfig::load(&path).unwrap();
        assert_eq!(reloaded, original);
    }
}
