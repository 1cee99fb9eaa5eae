//! Predicates used to prune listings

use crate::file::BasicFile;

/// Decides whether an entry makes it into a listing.
///
/// Any `Fn(&BasicFile) -> bool` is a filter.
pub trait FileFilter {
    fn accept(&self, file: &BasicFile) -> bool;
}

impl<F> FileFilter for F
where
    F: Fn(&BasicFile) -> bool,
{
    fn accept(&self, file: &BasicFile) -> bool {
        self(file)
    }
}

/// Accepts every entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl FileFilter for AcceptAll {
    fn accept(&self, _file: &BasicFile) -> bool {
        true
    }
}

/// Matches files by name and/or extension; directories pass only when
/// `accept_directories` is set.
///
/// An empty extension list matches any extension. The name matches either the
/// full file name or the name without its extension. Extension comparison is
/// case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct GenericFileFilter {
    name: Option<String>,
    extensions: Vec<String>,
    accept_directories: bool,
}

impl GenericFileFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter on any of the given extensions (with or without a leading dot).
    pub fn with_extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
                .collect(),
            ..Self::default()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn accepting_directories(mut self) -> Self {
        self.accept_directories = true;
        self
    }
}

impl FileFilter for GenericFileFilter {
    fn accept(&self, file: &BasicFile) -> bool {
        if file.is_directory() {
            return self.accept_directories;
        }

        if let Some(name) = &self.name {
            let stem = file
                .name()
                .strip_suffix(file.extension())
                .and_then(|s| s.strip_suffix('.'))
                .unwrap_or(file.name());
            if file.name() != name && stem != name {
                return false;
            }
        }

        self.extensions.is_empty()
            || self
                .extensions
                .iter()
                .any(|e| e.eq_ignore_ascii_case(file.extension()))
    }
}
