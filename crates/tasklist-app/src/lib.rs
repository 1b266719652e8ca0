//! Application layer for tasklist.
//!
//! This crate owns the task store, the persistence contract, the view
//! projection and configuration shared by the CLI and the terminal UI.

pub mod config;
pub mod intent;
pub mod persistence;
pub mod store;
pub mod view;

// Re-exports for convenience
pub use config::{AppConfig, StorageConfig, UiConfig};
pub use intent::{Intent, Outcome};
pub use persistence::{MemoryStorage, STORAGE_KEY, Storage, StorageError};
pub use store::{TaskError, TaskStore};
pub use view::{RowView, StoreSnapshot, ViewModel, render};
