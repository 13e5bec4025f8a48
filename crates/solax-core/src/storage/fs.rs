//! Filesystem seam for the persisted configuration file.
//!
//! On the device the configuration lives on the onboard flash filesystem;
//! on a host it lives in a data directory.  [`ConfigFs`] hides the difference
//! behind two calls, so [`crate::ConfigStore`] never touches `std::fs`
//! directly and can be tested against [`MemoryFs`] or a mock.
//!
//! File names are flash-style absolute names such as `/BaseConfig.json`.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Minimal file access needed by the configuration store.
#[cfg_attr(test, mockall::automock)]
pub trait ConfigFs {
    /// Reads the whole file.  Returns `Ok(None)` when it does not exist.
    fn read(&self, name: &str) -> io::Result<Option<Vec<u8>>>;

    /// Replaces the file's contents with `bytes`.
    fn write(&mut self, name: &str, bytes: &[u8]) -> io::Result<()>;
}

// ── Directory-backed filesystem ───────────────────────────────────────────────

/// [`ConfigFs`] rooted at a directory on the host filesystem.
///
/// Writes go to a sibling `*.tmp` file which is then renamed over the
/// target.  A failed write leaves the previous file intact.
#[derive(Debug, Clone)]
pub struct DirFs {
    root: PathBuf,
}

impl DirFs {
    /// Opens `root`, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a flash-style name to a path below the root.
    pub fn resolve(&self, name: &str) -> PathBuf {
        self.root.join(name.trim_start_matches('/'))
    }
}

impl ConfigFs for DirFs {
    fn read(&self, name: &str) -> io::Result<Option<Vec<u8>>> {
        match fs::read(self.resolve(name)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&mut self, name: &str, bytes: &[u8]) -> io::Result<()> {
        let target = self.resolve(name);
        let mut staging = target.clone().into_os_string();
        staging.push(".tmp");
        let staging = PathBuf::from(staging);

        let result = write_staged(&staging, &target, bytes);
        if result.is_err() {
            let _ = fs::remove_file(&staging);
        }
        result
    }
}

fn write_staged(staging: &Path, target: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(staging)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    fs::rename(staging, target)
}

// ── In-memory filesystem ──────────────────────────────────────────────────────

/// [`ConfigFs`] backed by a map, for tests and hosts without storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a filesystem holding a single file.
    pub fn with_file(name: &str, contents: impl Into<Vec<u8>>) -> Self {
        let mut fs = Self::new();
        fs.files.insert(name.to_string(), contents.into());
        fs
    }

    /// Returns the current contents of `name`, if present.
    pub fn contents(&self, name: &str) -> Option<&[u8]> {
        self.files.get(name).map(Vec::as_slice)
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<u8>> {
        self.files.remove(name)
    }
}

impl ConfigFs for MemoryFs {
    fn read(&self, name: &str) -> io::Result<Option<Vec<u8>>> {
        Ok(self.files.get(name).cloned())
    }

    fn write(&mut self, name: &str, bytes: &[u8]) -> io::Result<()> {
        self.files.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!("solax_fs_test_{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_dir_fs_open_creates_missing_root() {
        // Arrange
        let root = temp_root();
        assert!(!root.exists());

        // Act
        let fs = DirFs::open(&root).expect("open");

        // Assert
        assert!(fs.root().is_dir());

        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_dir_fs_read_missing_file_is_none() {
        let root = temp_root();
        let fs = DirFs::open(&root).unwrap();

        assert!(fs.read("/BaseConfig.json").unwrap().is_none());

        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_dir_fs_write_then_read_returns_bytes() {
        // Arrange
        let root = temp_root();
        let mut fs = DirFs::open(&root).unwrap();

        // Act
        fs.write("/BaseConfig.json", b"{\"mqttroot\":\"a\"}").unwrap();
        fs.write("/BaseConfig.json", b"{}").unwrap();

        // Assert: second write fully replaces the first
        assert_eq!(fs.read("/BaseConfig.json").unwrap().as_deref(), Some(&b"{}"[..]));
        assert!(root.join("BaseConfig.json").is_file());
        assert!(
            !root.join("BaseConfig.json.tmp").exists(),
            "staging file must be renamed away"
        );

        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_dir_fs_failed_staging_keeps_previous_file() {
        // Arrange: a directory squatting on the staging path makes the
        // write fail before the target is touched
        let root = temp_root();
        let mut fs = DirFs::open(&root).unwrap();
        fs.write("/BaseConfig.json", b"{\"mqttroot\":\"old\"}").unwrap();
        std::fs::create_dir(root.join("BaseConfig.json.tmp")).unwrap();

        // Act
        let result = fs.write("/BaseConfig.json", b"{\"mqttroot\":\"new\"}");

        // Assert
        assert!(result.is_err());
        assert_eq!(
            fs.read("/BaseConfig.json").unwrap().as_deref(),
            Some(&b"{\"mqttroot\":\"old\"}"[..])
        );

        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_dir_fs_failed_rename_removes_staging_file() {
        // Arrange: the target is a non-empty directory, so the rename fails
        let root = temp_root();
        let mut fs = DirFs::open(&root).unwrap();
        std::fs::create_dir_all(root.join("BaseConfig.json").join("occupied")).unwrap();

        // Act
        let result = fs.write("/BaseConfig.json", b"{}");

        // Assert
        assert!(result.is_err());
        assert!(root.join("BaseConfig.json").is_dir());
        assert!(!root.join("BaseConfig.json.tmp").exists());

        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_dir_fs_resolve_strips_leading_slash() {
        let fs = DirFs { root: PathBuf::from("/data") };
        assert_eq!(fs.resolve("/BaseConfig.json"), PathBuf::from("/data/BaseConfig.json"));
    }

    #[test]
    fn test_memory_fs_round_trip() {
        let mut fs = MemoryFs::new();
        assert!(fs.read("/a").unwrap().is_none());

        fs.write("/a", b"xyz").unwrap();

        assert_eq!(fs.contents("/a"), Some(&b"xyz"[..]));
        assert_eq!(fs.remove("/a"), Some(b"xyz".to_vec()));
        assert!(fs.contents("/a").is_none());
    }
}
