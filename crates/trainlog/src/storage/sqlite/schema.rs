//! SQL statements for the key/value tables.
//!
//! Table names are interpolated, so they are checked with
//! [`is_valid_table_name`] before any statement is built.

/// Whether `name` is safe to use as an unquoted SQL identifier.
pub fn is_valid_table_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 64
        && name.starts_with(|c: char| c.is_ascii_lowercase())
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

pub fn create_table(table: &str) -> String {
    format!("CREATE TABLE IF NOT EXISTS {table} (key TEXT PRIMARY KEY, value TEXT NOT NULL)")
}

pub fn select_value(table: &str) -> String {
    format!("SELECT value FROM {table} WHERE key = ?1")
}

pub fn upsert_value(table: &str) -> String {
    format!(
        "INSERT INTO {table} (key, value) VALUES (?1, ?2) \
         ON CONFLICT(key) DO UPDATE SET value = excluded.value"
    )
}

pub fn delete_value(table: &str) -> String {
    format!("DELETE FROM {table} WHERE key = ?1")
}

pub fn select_keys(table: &str) -> String {
    format!("SELECT key FROM {table} ORDER BY key")
}

pub fn select_values(table: &str) -> String {
    format!("SELECT value FROM {table} ORDER BY key")
}
