//! SQLite Keyed Store.
//!
//! Each database is one SQLite file and each store table one SQL table of
//! `(key, value)` rows. Every operation opens its own connection and closes it
//! before returning, so no connection outlives a call.

mod error;
mod schema;
mod store;

pub use store::SqliteStore;
