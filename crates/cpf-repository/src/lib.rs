//! Content access layer for CPF plugins
//!
//! Uniform read/write access to plugin installation folders, plugin
//! repository folders, user content and bundled resources, addressed by
//! `/`-separated logical paths.

pub mod access;
pub mod composite;
pub mod config;
pub mod contained;
pub mod embedded;
pub mod error;
pub mod factory;
pub mod file;
pub mod filter;
pub mod io;
mod listing;
pub mod local;
pub mod path;
pub mod registry;
pub mod settings;
pub mod text;
pub mod user;

pub use access::{FileAccess, ListOptions, ReadAccess, ReadWriteAccess, UserContentAccess};
pub use composite::CompositeReadAccess;
pub use config::{SourceConfig, SourcesConfig};
pub use contained::{ContainedAccess, PluginLocator, SystemDirLocator};
pub use embedded::EmbeddedAccess;
pub use error::{Error, Result};
pub use factory::{ContentAccessFactory, LocalContentAccessFactory};
pub use file::{BasicFile, ContentStream};
pub use filter::{AcceptAll, FileFilter, GenericFileFilter};
pub use local::{PathBasedAccess, PathResolver, RootedResolver};
pub use registry::{AccessConstructor, AccessRegistry, BuildContext};
pub use settings::Settings;
pub use text::TextEncoding;
pub use user::ProtectedContent;
