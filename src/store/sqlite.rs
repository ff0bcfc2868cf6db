use async_trait::async_trait;
use rusqlite::{params, OptionalExtension, Row};

use super::{new_id, parse_id, PostStore, StoreError};
use crate::db::models::{Post, PostFields};
use crate::db::DbPool;

const SELECT_POST: &str = "SELECT id, title, image, body, created FROM posts";

/// SQLite backend. Each post is one row; `seq` keeps insertion order.
pub struct SqlitePostStore {
    pool: DbPool,
}

impl SqlitePostStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_post(row: &Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post {
        id: row.get(0)?,
        title: row.get(1)?,
        image: row.get(2)?,
        body: row.get(3)?,
        created: row.get(4)?,
    })
}

fn fetch(conn: &rusqlite::Connection, id: &str) -> Result<Post, StoreError> {
    conn.query_row(
        &format!("{SELECT_POST} WHERE id = ?1"),
        params![id],
        row_to_post,
    )
    .optional()?
    .ok_or_else(|| StoreError::NotFound(id.to_string()))
}

#[async_trait]
impl PostStore for SqlitePostStore {
    async fn create(&self, fields: PostFields) -> Result<Post, StoreError> {
        let post = Post::from_fields(new_id(), fields);
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO posts (id, title, image, body, created) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![post.id, post.title, post.image, post.body, post.created],
        )?;
        Ok(post)
    }

    async fn list_all(&self) -> Result<Vec<Post>, StoreError> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!("{SELECT_POST} ORDER BY seq ASC"))?;
        let posts = stmt
            .query_map([], row_to_post)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(posts)
    }

    async fn get_by_id(&self, id: &str) -> Result<Post, StoreError> {
        parse_id(id)?;
        let conn = self.pool.get()?;
        fetch(&conn, id)
    }

    async fn update_by_id(&self, id: &str, fields: PostFields) -> Result<Post, StoreError> {
        parse_id(id)?;
        let conn = self.pool.get()?;
        let rows = conn.execute(
            "UPDATE posts SET title = ?2, image = ?3, body = ?4 WHERE id = ?1",
            params![id, fields.title, fields.image, fields.body],
        )?;
        if rows == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        fetch(&conn, id)
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        parse_id(id)?;
        let conn = self.pool.get()?;
        let rows = conn.execute("DELETE FROM posts WHERE id = ?1", params![id])?;
        if rows == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
