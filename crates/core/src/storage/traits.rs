use async_trait::async_trait;

use super::Result;

/// Asynchronous string key/value store organised as named tables inside a
/// named database.
///
/// Every operation is self-contained: implementations connect, perform a single
/// operation and release the connection before returning, so no handle outlives
/// a call. Values are opaque strings; callers serialize them.
#[async_trait]
pub trait KeyedStore: Send + Sync {
    /// Opens the database, creating any missing tables. Idempotent.
    async fn open(&self, database: &str, tables: &[&str]) -> Result<()>;

    /// Gets a value by key.
    async fn get(&self, database: &str, table: &str, key: &str) -> Result<Option<String>>;

    /// Inserts or replaces a value.
    async fn set(&self, database: &str, table: &str, key: &str, value: &str) -> Result<()>;

    /// Removes a value. Removing a missing key is not an error.
    async fn remove(&self, database: &str, table: &str, key: &str) -> Result<()>;

    /// Lists every key in a table.
    async fn get_all_keys(&self, database: &str, table: &str) -> Result<Vec<String>>;

    /// Lists every value in a table.
    async fn get_all_values(&self, database: &str, table: &str) -> Result<Vec<String>>;

    /// Deletes the whole database.
    async fn drop_database(&self, database: &str) -> Result<()>;
}
