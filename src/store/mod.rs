//! Post persistence.
//!
//! Handlers only ever see [`PostStore`]; which backend sits behind it is
//! decided once at startup by [`open`] from the configured database URL.

pub mod memory;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::DatabaseUrl;
use crate::db;
use crate::db::models::{Post, PostFields};

pub use memory::MemoryPostStore;
pub use sqlite::SqlitePostStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No post with id {0}")]
    NotFound(String),

    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("SQL error: {0}")]
    Sql(#[from] rusqlite::Error),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// The five-operation post contract every backend implements.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Persist a new post with a fresh id and creation time.
    async fn create(&self, fields: PostFields) -> Result<Post, StoreError>;

    /// Every stored post, in insertion order.
    async fn list_all(&self) -> Result<Vec<Post>, StoreError>;

    async fn get_by_id(&self, id: &str) -> Result<Post, StoreError>;

    /// Replace title, image and body. `id` and `created` never change.
    async fn update_by_id(&self, id: &str, fields: PostFields) -> Result<Post, StoreError>;

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError>;
}

/// Ids are UUIDs. A string that does not parse cannot name a post, so it
/// is reported as not found without touching the backend.
pub(crate) fn parse_id(id: &str) -> Result<uuid::Uuid, StoreError> {
    uuid::Uuid::parse_str(id).map_err(|_| StoreError::NotFound(id.to_string()))
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

/// Open the backend named by `url`, running migrations where needed.
pub fn open(url: &DatabaseUrl) -> anyhow::Result<Arc<dyn PostStore>> {
    let store: Arc<dyn PostStore> = match url {
        DatabaseUrl::Memory => {
            tracing::info!("Using in-process memory store");
            Arc::new(MemoryPostStore::new())
        }
        DatabaseUrl::SqliteMemory => {
            tracing::info!("Using in-memory SQLite store");
            let pool = db::create_memory_pool()?;
            db::run_migrations(&pool)?;
            Arc::new(SqlitePostStore::new(pool))
        }
        DatabaseUrl::Sqlite(path) => {
            tracing::info!("Using SQLite store at {}", path.display());
            let pool = db::create_pool(path)?;
            db::run_migrations(&pool)?;
            Arc::new(SqlitePostStore::new(pool))
        }
    };
    Ok(store)
}
