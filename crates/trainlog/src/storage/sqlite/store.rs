//! SQLite Keyed Store implementation.
//!
//! Implements `trainlog_core::storage::KeyedStore` on top of SQLite files.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio_rusqlite::Connection;

use trainlog_core::storage::{KeyedStore, RepositoryError, Result};

use super::error::map_tokio_rusqlite_error;
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Keyed Store backed by one SQLite file per database under `data_dir`.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    data_dir: PathBuf,
}

impl SqliteStore {
    /// Creates a store rooted at `data_dir`. Nothing is touched on disk until
    /// the first operation.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the file that holds `database`.
    pub fn database_path(&self, database: &str) -> PathBuf {
        self.data_dir.join(format!("{database}.sqlite3"))
    }

    /// Opens a fresh connection, creating the data directory if needed.
    async fn connect(&self, database: &str) -> Result<Connection> {
        if !is_valid_database_name(database) {
            return Err(RepositoryError::InvalidData(format!(
                "invalid database name: {database:?}"
            )));
        }
        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Connection::open(self.database_path(database))
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, database))
    }

    /// Runs `op` against `table` on a connection of its own.
    ///
    /// The table is created first if it does not exist yet, and the
    /// connection is closed before returning.
    async fn with_table<T, F>(&self, database: &str, table: &str, op: F) -> Result<T>
    where
        F: FnOnce(&rusqlite::Connection, &str) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        if !schema::is_valid_table_name(table) {
            return Err(RepositoryError::UnknownTable {
                database: database.to_string(),
                table: table.to_string(),
            });
        }

        let conn = self.connect(database).await?;
        let table_name = table.to_string();
        let result = conn
            .call(move |conn| {
                conn.execute_batch(&schema::create_table(&table_name))
                    .map_err(wrap_err)?;
                op(conn, &table_name).map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, database));
        let closed = conn
            .close()
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, database));

        let value = result?;
        closed?;
        tracing::debug!(database, table, "SQLite operation completed");
        Ok(value)
    }
}

fn is_valid_database_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[async_trait]
impl KeyedStore for SqliteStore {
    async fn open(&self, database: &str, tables: &[&str]) -> Result<()> {
        if let Some(table) = tables.iter().find(|t| !schema::is_valid_table_name(t)) {
            return Err(RepositoryError::UnknownTable {
                database: database.to_string(),
                table: table.to_string(),
            });
        }

        let conn = self.connect(database).await?;
        let ddl: Vec<String> = tables.iter().map(|t| schema::create_table(t)).collect();
        let result = conn
            .call(move |conn| {
                for statement in &ddl {
                    conn.execute_batch(statement).map_err(wrap_err)?;
                }
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, database));
        let closed = conn
            .close()
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, database));

        result?;
        closed?;
        tracing::debug!(
            database,
            path = %self.database_path(database).display(),
            tables = tables.len(),
            "Opened SQLite database"
        );
        Ok(())
    }

    async fn get(&self, database: &str, table: &str, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.with_table(database, table, move |conn, table| {
            let mut stmt = conn.prepare(&schema::select_value(table))?;
            match stmt.query_row([&key], |row| row.get(0)) {
                Ok(value) => Ok(Some(value)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
    }

    async fn set(&self, database: &str, table: &str, key: &str, value: &str) -> Result<()> {
        let key = key.to_string();
        let value = value.to_string();
        self.with_table(database, table, move |conn, table| {
            conn.execute(&schema::upsert_value(table), [&key, &value])?;
            Ok(())
        })
        .await
    }

    async fn remove(&self, database: &str, table: &str, key: &str) -> Result<()> {
        let key = key.to_string();
        self.with_table(database, table, move |conn, table| {
            conn.execute(&schema::delete_value(table), [&key])?;
            Ok(())
        })
        .await
    }

    async fn get_all_keys(&self, database: &str, table: &str) -> Result<Vec<String>> {
        self.with_table(database, table, |conn, table| {
            let mut stmt = conn.prepare(&schema::select_keys(table))?;
            let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
            let collected = rows.collect::<rusqlite::Result<Vec<String>>>();
            collected
        })
        .await
    }

    async fn get_all_values(&self, database: &str, table: &str) -> Result<Vec<String>> {
        self.with_table(database, table, |conn, table| {
            let mut stmt = conn.prepare(&schema::select_values(table))?;
            let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
            let collected = rows.collect::<rusqlite::Result<Vec<String>>>();
            collected
        })
        .await
    }

    async fn drop_database(&self, database: &str) -> Result<()> {
        if !is_valid_database_name(database) {
            return Err(RepositoryError::InvalidData(format!(
                "invalid database name: {database:?}"
            )));
        }
        match tokio::fs::remove_file(self.database_path(database)).await {
            Ok(()) => {
                tracing::info!(database, "Removed SQLite database file");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(RepositoryError::QueryFailed(e.to_string())),
        }
    }
}
