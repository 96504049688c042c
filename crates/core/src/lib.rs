//! Offline relational data layer for trainlog.
//!
//! Exercises, workouts and activities are stored as JSON strings in a keyed
//! store, one table per entity type. Referential integrity (back-references,
//! archiving instead of deleting rows that are still referenced) lives in the
//! domain models; listing, pagination and history aggregation live in the
//! [`api`] request handlers.

pub mod api;
pub mod serde;
pub mod storage;
pub mod training;
