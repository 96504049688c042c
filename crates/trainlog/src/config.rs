use std::{env, path::PathBuf};

use trainlog_core::api::Locale;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Name of the local database (default: "trainlog")
    pub database: String,
    /// Directory holding the database files (default: ".")
    pub data_dir: PathBuf,
    /// Language of the title suffixes added by the listings (default: "en")
    pub locale: Locale,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TRAINLOG_DATABASE` - Database name (default: "trainlog")
    /// - `TRAINLOG_DATA_DIR` - Directory for database files (default: ".")
    /// - `TRAINLOG_LOCALE` - `en` or `ru` (default: "en")
    pub fn from_env() -> Self {
        Self {
            database: env::var("TRAINLOG_DATABASE").unwrap_or_else(|_| "trainlog".to_string()),
            data_dir: env::var("TRAINLOG_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            locale: env::var("TRAINLOG_LOCALE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
