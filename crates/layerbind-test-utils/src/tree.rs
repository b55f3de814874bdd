//! [`TestTree`] builder for layered configuration scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::TempDir;

/// A temporary directory tree with helpers to drop configuration files at
/// arbitrary depths.
///
/// # Example
///
/// ```rust,no_run
/// use layerbind_test_utils::tree::TestTree;
/// use serde_json::json;
///
/// let tree = TestTree::new();
/// tree.base("", json!({ "properties": { "K": "root" } }));
/// tree.base("mid/leaf", json!({ "properties": { "K": "leaf" } }));
/// let leaf = tree.path("mid/leaf");
/// ```
pub struct TestTree {
    temp_dir: TempDir,
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTree {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Return (and create) a directory relative to the root.
    pub fn path(&self, relative: &str) -> PathBuf {
        let dir = if relative.is_empty() {
            self.root().to_path_buf()
        } else {
            self.root().join(relative)
        };
        fs::create_dir_all(&dir)
            .unwrap_or_else(|e| panic!("TestTree::path: failed to create {}: {e}", dir.display()));
        dir
    }

    /// Write `Configuration.json` into `relative`.
    pub fn base(&self, relative: &str, content: Value) -> PathBuf {
        self.write(relative, "Configuration.json", &content.to_string())
    }

    /// Write `Configuration.local.json` into `relative`.
    pub fn local(&self, relative: &str, content: Value) -> PathBuf {
        self.write(relative, "Configuration.local.json", &content.to_string())
    }

    /// Write `Configuration.curves.json` into `relative`.
    pub fn curves(&self, relative: &str, content: Value) -> PathBuf {
        self.write(relative, "Configuration.curves.json", &content.to_string())
    }

    /// Write an arbitrary file into `relative`.
    pub fn write(&self, relative: &str, file_name: &str, content: &str) -> PathBuf {
        let path = self.path(relative).join(file_name);
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("TestTree::write: failed to write {}: {e}", path.display()));
        path
    }

    /// Create a `.git` marker directory inside `relative`.
    ///
    /// Directory structure only: enough for repository-root detection.
    pub fn fake_git_dir(&self, relative: &str) {
        fs::create_dir_all(self.path(relative).join(".git"))
            .unwrap_or_else(|e| panic!("TestTree::fake_git_dir: failed to create .git: {e}"));
    }

    /// Create a `.hg` marker directory inside `relative`.
    pub fn fake_hg_dir(&self, relative: &str) {
        fs::create_dir_all(self.path(relative).join(".hg"))
            .unwrap_or_else(|e| panic!("TestTree::fake_hg_dir: failed to create .hg: {e}"));
    }
}
