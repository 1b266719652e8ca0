//! File-backed key-value slots for tasklist.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

const SLOT_EXTENSION: &str = "json";
const TEMP_SUFFIX: &str = "tmp";

/// Failures raised by [`FileStore`].
#[derive(Debug, Error)]
pub enum FileStoreError {
    /// The key cannot be mapped to a file name.
    #[error("invalid slot key: {0:?}")]
    InvalidKey(String),
    /// The value is larger than the configured quota.
    #[error("value of {needed} bytes exceeds quota of {quota} bytes")]
    QuotaExceeded {
        /// Size of the rejected value.
        needed: usize,
        /// Configured quota.
        quota: usize,
    },
    /// Filesystem access failed.
    #[error("I/O error on {}", path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

/// Result alias for file store operations.
pub type Result<T> = std::result::Result<T, FileStoreError>;

/// Storage that keeps each key in `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    quota: Option<usize>,
}

impl FileStore {
    /// Open (and create if needed) the slot directory.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|source| FileStoreError::Io {
            path: dir.clone(),
            source,
        })?;
        debug!(dir = %dir.display(), "Opened file store");
        Ok(Self { dir, quota: None })
    }

    /// Reject values larger than `bytes`.
    #[must_use]
    pub const fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    /// Directory holding the slots.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    ///
    /// # Errors
    /// Returns [`FileStoreError::InvalidKey`] unless the key is a non-empty run
    /// of ASCII alphanumerics, `-` or `_`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(FileStoreError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{key}.{SLOT_EXTENSION}")))
    }

    /// Read the value stored under `key`, or `None` if the slot was never written.
    ///
    /// # Errors
    /// Returns an error for invalid keys or unreadable files.
    pub fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(FileStoreError::Io { path, source }),
        }
    }

    /// Replace the value stored under `key`.
    ///
    /// The value goes to a sibling temporary file that is then renamed over the
    /// slot, so readers see either the old or the new contents.
    ///
    /// # Errors
    /// Returns an error for invalid keys, values over quota, or filesystem failures.
    pub fn write(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        if let Some(quota) = self.quota
            && value.len() > quota
        {
            return Err(FileStoreError::QuotaExceeded {
                needed: value.len(),
                quota,
            });
        }

        let tmp = path.with_extension(format!("{SLOT_EXTENSION}.{TEMP_SUFFIX}"));
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source: io::Error| FileStoreError::Io { path, source }
        };

        let mut file = fs::File::create(&tmp).map_err(io_err(&tmp))?;
        file.write_all(value.as_bytes()).map_err(io_err(&tmp))?;
        file.sync_all().map_err(io_err(&tmp))?;
        drop(file);

        if let Err(source) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(FileStoreError::Io { path, source });
        }

        debug!(path = %path.display(), bytes = value.len(), "Wrote slot");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn ok<T>(result: Result<T>, context: &str) -> T {
        result.unwrap_or_else(|err| panic!("{context}: {err}"))
    }

    #[test]
    fn open_creates_nested_directory() -> io::Result<()> {
        let base = tempdir()?;
        let dir = base.path().join("a").join("b");
        let store = ok(FileStore::open(&dir), "open store");
        assert!(dir.is_dir());
        assert_eq!(store.dir(), dir.as_path());
        Ok(())
    }

    #[test]
    fn write_and_read_roundtrip() -> io::Result<()> {
        let base = tempdir()?;
        let store = ok(FileStore::open(base.path()), "open store");

        assert!(ok(store.read("tasks"), "read empty slot").is_none());

        ok(store.write("tasks", "[1,2,3]"), "first write");
        ok(store.write("tasks", "[]"), "second write");
        assert_eq!(ok(store.read("tasks"), "read slot").as_deref(), Some("[]"));
        assert_eq!(fs::read_to_string(base.path().join("tasks.json"))?, "[]");
        assert!(!base.path().join("tasks.json.tmp").exists());
        Ok(())
    }

    #[test]
    fn rejects_keys_that_escape_the_directory() -> io::Result<()> {
        let base = tempdir()?;
        let store = ok(FileStore::open(base.path()), "open store");
        for key in ["", "../tasks", "a/b", "tasks.json"] {
            assert!(matches!(
                store.write(key, "[]"),
                Err(FileStoreError::InvalidKey(_))
            ));
        }
        Ok(())
    }

    #[test]
    fn quota_rejection_keeps_previous_value() -> io::Result<()> {
        let base = tempdir()?;
        let store = ok(FileStore::open(base.path()), "open store").with_quota(4);
        ok(store.write("tasks", "[]"), "small write");

        let Err(err) = store.write("tasks", "[1,2,3]") else {
            panic!("oversize write should fail");
        };
        assert!(matches!(
            err,
            FileStoreError::QuotaExceeded { needed: 7, quota: 4 }
        ));
        assert_eq!(ok(store.read("tasks"), "read slot").as_deref(), Some("[]"));
        Ok(())
    }

    #[test]
    fn read_reports_io_errors_other_than_missing() -> io::Result<()> {
        let base = tempdir()?;
        let store = ok(FileStore::open(base.path()), "open store");
        fs::create_dir(base.path().join("tasks.json"))?;
        assert!(matches!(store.read("tasks"), Err(FileStoreError::Io { .. })));
        Ok(())
    }
}
