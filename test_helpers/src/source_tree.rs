//! Temporary directories populated with annotated source files.

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// A temporary directory that generator tests fill with `.rs` files.
///
/// The directory is removed when the tree is dropped.
///
/// # Examples
///
/// ```
/// use layerconf_test_helpers::SourceTree;
///
/// let tree = SourceTree::new()?
///     .with_file("server.rs", "pub struct ServerConfig;")?;
/// assert!(tree.contains("server.rs"));
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug)]
pub struct SourceTree {
    dir: TempDir,
    root: Utf8PathBuf,
}

impl SourceTree {
    /// Create an empty tree.
    ///
    /// # Errors
    ///
    /// Returns an error when the temporary directory cannot be created or
    /// its path is not valid UTF-8.
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create temporary source tree")?;
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .map_err(|path| anyhow!("temporary dir is not UTF-8: {}", path.display()))?;
        Ok(Self { dir, root })
    }

    /// Write `contents` to `name` inside the tree and return the tree.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be written.
    pub fn with_file(self, name: &str, contents: &str) -> Result<Self> {
        self.write(name, contents)?;
        Ok(self)
    }

    /// Write `contents` to `name` inside the tree, replacing any old file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be written.
    pub fn write(&self, name: &str, contents: &str) -> Result<()> {
        let path = self.path(name);
        std::fs::write(&path, contents).with_context(|| format!("write {path}"))
    }

    /// Read `name` back as text.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read.
    pub fn read(&self, name: &str) -> Result<String> {
        let path = self.path(name);
        std::fs::read_to_string(&path).with_context(|| format!("read {path}"))
    }

    /// Whether `name` exists inside the tree.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.path(name).exists()
    }

    /// Absolute path of `name` inside the tree.
    #[must_use]
    pub fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    /// The tree's root directory.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Names of the files currently in the tree, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be listed.
    pub fn file_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for listed in std::fs::read_dir(self.dir.path()).context("list source tree")? {
            let entry = listed?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }
}
