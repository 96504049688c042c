mod database;
mod entity;
mod error;
mod http_mapping;
mod memory;
mod traits;

pub use database::{Database, Table, TableName};
pub use entity::{get_all, get_many, get_one, new_id, Entity, EntityMeta};
pub use error::{RepositoryError, Result};
pub use http_mapping::repository_error_to_status_code;
pub use memory::MemoryStore;
pub use traits::KeyedStore;
