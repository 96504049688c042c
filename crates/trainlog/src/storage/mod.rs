//! Keyed Store backends.
//!
//! This module provides the concrete [`KeyedStore`] the server runs on. The
//! backend is selected at compile time via feature flags.
//!
//! # Feature Flags
//!
//! - `sqlite` (default): one SQLite file per database, using `rusqlite` and `tokio-rusqlite`
//! - `inmemory`: the process-local `MemoryStore` from `trainlog_core`; data is
//!   lost on exit
//!
//! These features are mutually exclusive - only one storage backend can be
//! enabled at a time.
//!
//! # Examples
//!
//! Build with SQLite (default):
//! ```bash
//! cargo build -p trainlog
//! ```
//!
//! Build with the in-memory store:
//! ```bash
//! cargo build -p trainlog --no-default-features --features inmemory
//! ```

// Compile-time checks for mutual exclusivity
#[cfg(all(feature = "sqlite", feature = "inmemory"))]
compile_error!(
    "Features 'sqlite' and 'inmemory' are mutually exclusive. \
    Enable only one storage backend at a time."
);

#[cfg(not(any(feature = "sqlite", feature = "inmemory")))]
compile_error!(
    "No storage backend selected. Enable 'sqlite' or 'inmemory' feature. \
    Example: cargo build -p trainlog --features sqlite"
);

#[cfg(feature = "sqlite")]
pub mod sqlite;

use std::sync::Arc;

use trainlog_core::storage::KeyedStore;

use crate::config::Config;

/// Builds the store selected at compile time.
#[cfg(feature = "sqlite")]
pub fn create_store(config: &Config) -> Arc<dyn KeyedStore> {
    Arc::new(sqlite::SqliteStore::new(&config.data_dir))
}

/// Builds the store selected at compile time.
#[cfg(feature = "inmemory")]
pub fn create_store(_config: &Config) -> Arc<dyn KeyedStore> {
    Arc::new(trainlog_core::storage::MemoryStore::new())
}
