//! The same contract checks against every backend.

use chrono::Utc;
use restblog::config::DatabaseUrl;
use restblog::db::models::PostFields;
use restblog::store::{self, PostStore, StoreError};
use tempfile::TempDir;

fn fields(title: &str, body: &str) -> PostFields {
    PostFields {
        title: Some(title.to_string()),
        image: Some("http://x/i.jpg".to_string()),
        body: Some(body.to_string()),
        created: None,
    }
}

async fn create_then_get(store: &dyn PostStore) {
    let before = Utc::now();
    let post = store.create(fields("Hi", "Hello")).await.unwrap();

    let fetched = store.get_by_id(&post.id).await.unwrap();
    assert_eq!(fetched.title(), "Hi");
    assert_eq!(fetched.image(), "http://x/i.jpg");
    assert_eq!(fetched.body(), "Hello");
    assert!(fetched.created >= before);
    assert_eq!(fetched.created, post.created);
}

async fn list_reflects_writes(store: &dyn PostStore) {
    let a = store.create(fields("a", "1")).await.unwrap();
    let b = store.create(fields("b", "2")).await.unwrap();
    let c = store.create(fields("c", "3")).await.unwrap();

    store.update_by_id(&b.id, fields("b2", "22")).await.unwrap();
    store.delete_by_id(&c.id).await.unwrap();

    let listed: Vec<(String, String)> = store
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .map(|p| (p.id, p.title.unwrap_or_default()))
        .collect();
    assert_eq!(
        listed,
        vec![(a.id, "a".to_string()), (b.id, "b2".to_string())]
    );
}

async fn update_preserves_identity(store: &dyn PostStore) {
    let post = store.create(fields("Old", "old body")).await.unwrap();

    let mut replacement = fields("New", "new body");
    replacement.created = Some(Utc::now() + chrono::Duration::days(1));
    let updated = store.update_by_id(&post.id, replacement).await.unwrap();

    assert_eq!(updated.id, post.id);
    assert_eq!(updated.created, post.created);
    assert_eq!(updated.title(), "New");
    assert_eq!(updated.body(), "new body");

    let fetched = store.get_by_id(&post.id).await.unwrap();
    assert_eq!(fetched, updated);
}

async fn delete_then_get_is_not_found(store: &dyn PostStore) {
    let post = store.create(fields("Doomed", "bye")).await.unwrap();
    store.delete_by_id(&post.id).await.unwrap();

    let err = store.get_by_id(&post.id).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(ref id) if *id == post.id));
    assert!(store.delete_by_id(&post.id).await.unwrap_err().is_not_found());
}

async fn nonexistent_id_returns_nothing(store: &dyn PostStore) {
    let err = store.get_by_id("nonexistent").await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(ref id) if id == "nonexistent"));
}

async fn run_contract(store: &dyn PostStore) {
    create_then_get(store).await;
    list_reflects_writes_fresh(store).await;
    update_preserves_identity(store).await;
    delete_then_get_is_not_found(store).await;
    nonexistent_id_returns_nothing(store).await;
}

/// `list_reflects_writes` compares the whole listing, so clear what earlier
/// checks left behind first.
async fn list_reflects_writes_fresh(store: &dyn PostStore) {
    for post in store.list_all().await.unwrap() {
        store.delete_by_id(&post.id).await.unwrap();
    }
    list_reflects_writes(store).await;
}

#[tokio::test]
async fn memory_store_honours_contract() {
    let store = store::open(&DatabaseUrl::Memory).unwrap();
    run_contract(store.as_ref()).await;
}

#[tokio::test]
async fn sqlite_memory_store_honours_contract() {
    let store = store::open(&DatabaseUrl::SqliteMemory).unwrap();
    run_contract(store.as_ref()).await;
}

#[tokio::test]
async fn sqlite_file_store_honours_contract() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("blog.db");
    let store = store::open(&DatabaseUrl::Sqlite(db_path)).unwrap();
    run_contract(store.as_ref()).await;
}

#[tokio::test]
async fn sqlite_file_store_persists_across_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("blog.db");

    let id = {
        let store = store::open(&DatabaseUrl::Sqlite(db_path.clone())).unwrap();
        store.create(fields("Durable", "still here")).await.unwrap().id
    };

    let store = store::open(&DatabaseUrl::Sqlite(db_path)).unwrap();
    let post = store.get_by_id(&id).await.unwrap();
    assert_eq!(post.title(), "Durable");
}
