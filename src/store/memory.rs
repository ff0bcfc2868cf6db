use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{new_id, parse_id, PostStore, StoreError};
use crate::db::models::{Post, PostFields};

/// Process-local backend. Posts live in a vector so listing keeps
/// insertion order.
#[derive(Default)]
pub struct MemoryPostStore {
    posts: RwLock<Vec<Post>>,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn create(&self, fields: PostFields) -> Result<Post, StoreError> {
        let post = Post::from_fields(new_id(), fields);
        self.posts.write().await.push(post.clone());
        Ok(post)
    }

    async fn list_all(&self) -> Result<Vec<Post>, StoreError> {
        Ok(self.posts.read().await.clone())
    }

    async fn get_by_id(&self, id: &str) -> Result<Post, StoreError> {
        parse_id(id)?;
        self.posts
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn update_by_id(&self, id: &str, fields: PostFields) -> Result<Post, StoreError> {
        parse_id(id)?;
        let mut posts = self.posts.write().await;
        let post = posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        post.apply(fields);
        Ok(post.clone())
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        parse_id(id)?;
        let mut posts = self.posts.write().await;
        let idx = posts
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        posts.remove(idx);
        Ok(())
    }
}
