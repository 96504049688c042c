//! Identity, timestamps and persistence shared by every stored entity.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use super::{Database, RepositoryError, Result, TableName};

/// Generates a new time-ordered identifier.
pub fn new_id() -> Uuid {
    Uuid::now_v7()
}

/// Identity and lifecycle timestamps, flattened into every stored row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMeta {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for EntityMeta {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityMeta {
    pub fn new() -> Self {
        Self::with_id(new_id())
    }

    pub fn with_id(id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Advances `updated_at`. Never moves backwards, even if the clock does.
    pub fn touch(&mut self) {
        let now = Utc::now();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::microseconds(1)
        };
    }
}

/// A domain model persisted as one JSON string per id in its own table.
#[async_trait]
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + Sized {
    const TABLE: TableName;
    const ENTITY_TYPE: &'static str;

    fn meta(&self) -> &EntityMeta;

    fn meta_mut(&mut self) -> &mut EntityMeta;

    fn id(&self) -> Uuid {
        self.meta().id
    }

    fn touch(&mut self) {
        self.meta_mut().touch();
    }

    fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| RepositoryError::Serialization(e.to_string()))
    }

    fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            RepositoryError::Serialization(format!("invalid {} row: {e}", Self::ENTITY_TYPE))
        })
    }

    /// Writes the row under its id, replacing any previous version.
    async fn save(&self, db: &Database) -> Result<()> {
        let json = self.to_json()?;
        db.table(Self::TABLE)
            .set(&self.id().to_string(), &json)
            .await
    }

    /// Physically removes the row.
    async fn remove(&self, db: &Database) -> Result<()> {
        db.table(Self::TABLE).remove(&self.id().to_string()).await?;
        tracing::info!(entity = Self::ENTITY_TYPE, id = %self.id(), "Removed row");
        Ok(())
    }
}

/// Gets a single entity. A missing id is `Ok(None)`, not an error.
pub async fn get_one<E: Entity>(db: &Database, id: Uuid) -> Result<Option<E>> {
    db.table(E::TABLE)
        .get(&id.to_string())
        .await?
        .map(|json| E::from_json(&json))
        .transpose()
}

/// Gets the entities whose id is in `ids`, in table order. Unknown ids are skipped.
pub async fn get_many<E: Entity>(db: &Database, ids: &[Uuid]) -> Result<Vec<E>> {
    let wanted: HashSet<&Uuid> = ids.iter().collect();
    Ok(get_all::<E>(db)
        .await?
        .into_iter()
        .filter(|entity| wanted.contains(&entity.id()))
        .collect())
}

/// Gets every entity of a table.
pub async fn get_all<E: Entity>(db: &Database) -> Result<Vec<E>> {
    db.table(E::TABLE)
        .get_all_values()
        .await?
        .iter()
        .map(|json| E::from_json(json))
        .collect()
}
