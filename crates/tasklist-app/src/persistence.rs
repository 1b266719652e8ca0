//! Durable key-value slot holding the serialized task collection.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashSet};
use std::io;

use tasklist_core::Task;
use tasklist_core::id::TaskId;
use tasklist_store_fs::{FileStore, FileStoreError};
use thiserror::Error;
use tracing::{debug, warn};

/// Key under which the task collection is stored.
pub const STORAGE_KEY: &str = "tasks";

/// Persistence failures.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The slot cannot be reached at all.
    #[error("storage is unavailable: {reason}")]
    Unavailable {
        /// Why the slot could not be used.
        reason: String,
    },
    /// The value does not fit.
    #[error("storage quota exceeded ({needed} bytes requested, {quota} allowed)")]
    QuotaExceeded {
        /// Size of the rejected value.
        needed: usize,
        /// Capacity of the slot.
        quota: usize,
    },
    /// Underlying I/O failed.
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// A durable key-value slot.
pub trait Storage {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    /// Returns an error when the slot cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`. Writes either fully succeed or fully fail.
    ///
    /// # Errors
    /// Returns an error when the slot is unavailable or over capacity.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: Storage + ?Sized> Storage for &T {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }
}

impl<T: Storage + ?Sized> Storage for Box<T> {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }
}

impl Storage for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::read(self, key).map_err(StorageError::from)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::write(self, key, value).map_err(StorageError::from)
    }
}

impl From<FileStoreError> for StorageError {
    fn from(err: FileStoreError) -> Self {
        match err {
            FileStoreError::QuotaExceeded { needed, quota } => Self::QuotaExceeded { needed, quota },
            FileStoreError::Io { source, .. } => Self::Io(source),
            other @ FileStoreError::InvalidKey(_) => Self::Unavailable {
                reason: other.to_string(),
            },
        }
    }
}

/// In-process slot, used by tests and when no data directory is available.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: RefCell<BTreeMap<String, String>>,
    quota: Option<usize>,
    unavailable: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryStorage {
    /// Empty storage without a quota.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-filled with `value` under `key`.
    #[must_use]
    pub fn with_value(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage.slots.borrow_mut().insert(key.to_owned(), value.to_owned());
        storage
    }

    /// Reject values larger than `bytes`.
    #[must_use]
    pub const fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    /// Simulate the slot becoming unreachable (or reachable again).
    pub fn set_available(&self, available: bool) {
        self.unavailable.set(!available);
    }

    /// Current raw value under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.slots.borrow().get(key).cloned()
    }

    /// Number of successful writes so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    fn ensure_available(&self) -> Result<(), StorageError> {
        if self.unavailable.get() {
            return Err(StorageError::Unavailable {
                reason: "memory slot disabled".into(),
            });
        }
        Ok(())
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.ensure_available()?;
        Ok(self.get(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.ensure_available()?;
        if let Some(quota) = self.quota
            && value.len() > quota
        {
            return Err(StorageError::QuotaExceeded {
                needed: value.len(),
                quota,
            });
        }
        self.slots.borrow_mut().insert(key.to_owned(), value.to_owned());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

/// Reasons a stored payload is discarded.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Not JSON, not an array, or an entry lacks `id` / string `text`.
    #[error("payload is not a valid task array: {0}")]
    Json(#[from] serde_json::Error),
    /// An entry's text is blank.
    #[error("task {0} has empty text")]
    EmptyText(TaskId),
    /// The same id occurs twice.
    #[error("task id {0} occurs more than once")]
    DuplicateId(TaskId),
}

/// Serialize the full collection as a JSON array.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn encode(tasks: &[Task]) -> Result<String, serde_json::Error> {
    serde_json::to_string(tasks)
}

/// Parse a stored payload, rejecting it as a whole if any entry is invalid.
///
/// # Errors
/// Returns a [`DecodeError`] describing the first problem found.
pub fn decode(payload: &str) -> Result<Vec<Task>, DecodeError> {
    let tasks: Vec<Task> = serde_json::from_str(payload)?;
    let mut seen = HashSet::with_capacity(tasks.len());
    for task in &tasks {
        if task.text.trim().is_empty() {
            return Err(DecodeError::EmptyText(task.id));
        }
        if !seen.insert(task.id) {
            return Err(DecodeError::DuplicateId(task.id));
        }
    }
    Ok(tasks)
}

/// Write `tasks` to the slot. Returns `false` instead of failing.
pub fn save<S: Storage + ?Sized>(storage: &S, tasks: &[Task]) -> bool {
    let payload = match encode(tasks) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(error = %err, "Failed to encode tasks");
            return false;
        }
    };
    match storage.write(STORAGE_KEY, &payload) {
        Ok(()) => {
            debug!(count = tasks.len(), "Saved tasks");
            true
        }
        Err(err) => {
            warn!(error = %err, "Failed to save tasks; continuing in memory");
            false
        }
    }
}

/// Read the collection from the slot, or an empty one if anything is wrong.
pub fn load<S: Storage + ?Sized>(storage: &S) -> Vec<Task> {
    let payload = match storage.read(STORAGE_KEY) {
        Ok(Some(payload)) => payload,
        Ok(None) => return Vec::new(),
        Err(err) => {
            warn!(error = %err, "Failed to read tasks; starting empty");
            return Vec::new();
        }
    };
    match decode(&payload) {
        Ok(tasks) => {
            debug!(count = tasks.len(), "Loaded tasks");
            tasks
        }
        Err(err) => {
            warn!(error = %err, "Discarding invalid task data");
            Vec::new()
        }
    }
}
