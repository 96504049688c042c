//! Named database handle and per-table views over a [`KeyedStore`].

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use super::{KeyedStore, RepositoryError, Result};

const STATE_FRESH: u8 = 0;
const STATE_OPEN: u8 = 1;
const STATE_DISCONNECTED: u8 = 2;

/// The tables of the trainlog database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableName {
    Exercises,
    Workouts,
    Activities,
}

impl TableName {
    pub const ALL: [TableName; 3] = [
        TableName::Exercises,
        TableName::Workouts,
        TableName::Activities,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TableName::Exercises => "exercises",
            TableName::Workouts => "workouts",
            TableName::Activities => "activities",
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An explicitly constructed handle to one named database.
///
/// The tables are created lazily by the first operation, or eagerly by
/// [`Database::init`]. After [`Database::disconnect`] every operation fails with
/// `ConnectionFailed` until `init` is called again.
#[derive(Clone)]
pub struct Database {
    store: Arc<dyn KeyedStore>,
    name: Arc<str>,
    state: Arc<AtomicU8>,
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("name", &self.name)
            .field("state", &self.state.load(Ordering::SeqCst))
            .finish()
    }
}

impl Database {
    pub fn new(store: Arc<dyn KeyedStore>, name: impl Into<String>) -> Self {
        Self {
            store,
            name: Arc::from(name.into()),
            state: Arc::new(AtomicU8::new(STATE_FRESH)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Opens the database and creates any missing table.
    pub async fn init(&self) -> Result<()> {
        let tables: Vec<&str> = TableName::ALL.iter().map(TableName::as_str).collect();
        self.store.open(&self.name, &tables).await?;
        self.state.store(STATE_OPEN, Ordering::SeqCst);
        tracing::debug!(database = %self.name, "Database opened");
        Ok(())
    }

    pub fn disconnect(&self) {
        self.state.store(STATE_DISCONNECTED, Ordering::SeqCst);
        tracing::debug!(database = %self.name, "Database disconnected");
    }

    /// Deletes every table and row. The handle can be re-initialised afterwards.
    pub async fn drop_database(&self) -> Result<()> {
        self.store.drop_database(&self.name).await?;
        self.state.store(STATE_FRESH, Ordering::SeqCst);
        tracing::info!(database = %self.name, "Database dropped");
        Ok(())
    }

    pub fn table(&self, name: TableName) -> Table {
        Table {
            db: self.clone(),
            name,
        }
    }

    async fn ready(&self) -> Result<()> {
        match self.state.load(Ordering::SeqCst) {
            STATE_OPEN => Ok(()),
            STATE_DISCONNECTED => Err(RepositoryError::ConnectionFailed(format!(
                "database {} is disconnected",
                self.name
            ))),
            _ => self.init().await,
        }
    }
}

/// A view over one table of a [`Database`].
#[derive(Debug, Clone)]
pub struct Table {
    db: Database,
    name: TableName,
}

impl Table {
    pub fn name(&self) -> TableName {
        self.name
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        self.db.ready().await?;
        self.db
            .store
            .get(&self.db.name, self.name.as_str(), key)
            .await
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.db.ready().await?;
        tracing::trace!(table = %self.name, key, "set");
        self.db
            .store
            .set(&self.db.name, self.name.as_str(), key, value)
            .await
    }

    pub async fn remove(&self, key: &str) -> Result<()> {
        self.db.ready().await?;
        tracing::trace!(table = %self.name, key, "remove");
        self.db
            .store
            .remove(&self.db.name, self.name.as_str(), key)
            .await
    }

    pub async fn get_all_keys(&self) -> Result<Vec<String>> {
        self.db.ready().await?;
        self.db
            .store
            .get_all_keys(&self.db.name, self.name.as_str())
            .await
    }

    pub async fn get_all_values(&self) -> Result<Vec<String>> {
        self.db.ready().await?;
        self.db
            .store
            .get_all_values(&self.db.name, self.name.as_str())
            .await
    }
}
