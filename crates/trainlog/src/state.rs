//! Application state shared by the request handlers.

use std::sync::Arc;

use trainlog_core::api::LocalApi;
use trainlog_core::storage::{Database, MemoryStore};

use crate::config::Config;
use crate::storage::create_store;

/// Shared application state.
///
/// Cloned for each request; every clone talks to the same database.
#[derive(Clone, Debug)]
pub struct AppState {
    pub api: LocalApi,
}

impl AppState {
    pub fn new(api: LocalApi) -> Self {
        Self { api }
    }

    /// Builds the state on the store selected at compile time.
    pub fn from_config(config: &Config) -> Self {
        let db = Database::new(create_store(config), config.database.clone());
        Self::new(LocalApi::new(db).with_locale(config.locale))
    }

    /// State backed by a process-local store; nothing is persisted.
    pub fn in_memory() -> Self {
        let db = Database::new(Arc::new(MemoryStore::new()), "trainlog");
        Self::new(LocalApi::new(db))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::in_memory()
    }
}
