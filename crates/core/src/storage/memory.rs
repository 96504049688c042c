//! In-process keyed store.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{KeyedStore, RepositoryError, Result};

type Tables = HashMap<String, BTreeMap<String, String>>;

/// In-memory keyed store.
///
/// Uses HashMaps wrapped in `Arc<RwLock<_>>` for thread-safe access.
/// Data is not persisted and will be lost when the store is dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    databases: Arc<RwLock<HashMap<String, Tables>>>,
}

impl MemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn unknown_table(database: &str, table: &str) -> RepositoryError {
    RepositoryError::UnknownTable {
        database: database.to_string(),
        table: table.to_string(),
    }
}

#[async_trait]
impl KeyedStore for MemoryStore {
    async fn open(&self, database: &str, tables: &[&str]) -> Result<()> {
        let mut databases = self.databases.write().await;
        let db = databases.entry(database.to_string()).or_default();
        for table in tables {
            db.entry(table.to_string()).or_default();
        }
        Ok(())
    }

    async fn get(&self, database: &str, table: &str, key: &str) -> Result<Option<String>> {
        let databases = self.databases.read().await;
        let rows = databases
            .get(database)
            .and_then(|db| db.get(table))
            .ok_or_else(|| unknown_table(database, table))?;
        Ok(rows.get(key).cloned())
    }

    async fn set(&self, database: &str, table: &str, key: &str, value: &str) -> Result<()> {
        let mut databases = self.databases.write().await;
        let rows = databases
            .get_mut(database)
            .and_then(|db| db.get_mut(table))
            .ok_or_else(|| unknown_table(database, table))?;
        rows.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, database: &str, table: &str, key: &str) -> Result<()> {
        let mut databases = self.databases.write().await;
        let rows = databases
            .get_mut(database)
            .and_then(|db| db.get_mut(table))
            .ok_or_else(|| unknown_table(database, table))?;
        rows.remove(key);
        Ok(())
    }

    async fn get_all_keys(&self, database: &str, table: &str) -> Result<Vec<String>> {
        let databases = self.databases.read().await;
        let rows = databases
            .get(database)
            .and_then(|db| db.get(table))
            .ok_or_else(|| unknown_table(database, table))?;
        Ok(rows.keys().cloned().collect())
    }

    async fn get_all_values(&self, database: &str, table: &str) -> Result<Vec<String>> {
        let databases = self.databases.read().await;
        let rows = databases
            .get(database)
            .and_then(|db| db.get(table))
            .ok_or_else(|| unknown_table(database, table))?;
        Ok(rows.values().cloned().collect())
    }

    async fn drop_database(&self, database: &str) -> Result<()> {
        self.databases.write().await.remove(database);
        Ok(())
    }
}
