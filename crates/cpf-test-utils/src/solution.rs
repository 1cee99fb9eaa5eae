//! [`TestSolution`] builder for content-access scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary solution directory:
///
/// ```text
/// <root>/system/<plugin>/
/// <root>/repository/
/// <root>/repository/public/<plugin>/
/// ```
///
/// # Example
///
/// ```rust,no_run
/// use cpf_test_utils::TestSolution;
///
/// let solution = TestSolution::new()
///     .with_plugin("cde")
///     .with_file("system/cde/static/app.js", "app");
/// solution.assert_file_contains("system/cde/static/app.js", "app");
/// ```
pub struct TestSolution {
    temp_dir: TempDir,
}

impl Default for TestSolution {
    fn default() -> Self {
        Self::new()
    }
}

impl TestSolution {
    /// An empty solution with `system` and `repository` folders.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("system")).unwrap();
        fs::create_dir_all(temp_dir.path().join("repository")).unwrap();
        Self { temp_dir }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn system_dir(&self) -> PathBuf {
        self.root().join("system")
    }

    pub fn plugin_dir(&self, plugin_id: &str) -> PathBuf {
        self.system_dir().join(plugin_id)
    }

    pub fn repository_dir(&self) -> PathBuf {
        self.root().join("repository")
    }

    /// Install an empty plugin folder under `system`.
    pub fn with_plugin(self, plugin_id: &str) -> Self {
        fs::create_dir_all(self.plugin_dir(plugin_id)).unwrap();
        self
    }

    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.write(path, content);
        self
    }

    /// Write `content` at `path` (relative to the root), creating parents.
    pub fn write(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.root().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
        full_path
    }

    pub fn mkdir(&self, path: &str) -> PathBuf {
        let full_path = self.root().join(path);
        fs::create_dir_all(&full_path).unwrap();
        full_path
    }

    pub fn read(&self, path: &str) -> String {
        let full_path = self.root().join(path);
        fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()))
    }

    /// Assert that `path` (relative to the root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the root) does **not** exist.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `path` (relative to the root) contains `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let file_content = self.read(path);
        assert!(
            file_content.contains(content),
            "File {path} does not contain expected content.\nExpected: {content}\nActual: {file_content}"
        );
    }
}
