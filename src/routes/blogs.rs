use askama::Template;
use axum::extract::{Path, State};
use axum::response::Redirect;
use axum::routing::get;
use axum::{Form, Router};
use serde::Deserialize;

use crate::db::models::{Post, PostFields};
use crate::error::AppResult;
use crate::routes::Html;
use crate::sanitize::Sanitizer;
use crate::state::AppState;

pub const LISTING_PATH: &str = "/blogs";

// --- Templates ---

#[derive(Template)]
#[template(path = "pages/index.html")]
pub struct IndexTemplate {
    pub posts: Vec<Post>,
}

#[derive(Template)]
#[template(path = "pages/new.html")]
pub struct NewTemplate;

#[derive(Template)]
#[template(path = "pages/show.html")]
pub struct ShowTemplate {
    pub post: Post,
}

#[derive(Template)]
#[template(path = "pages/edit.html")]
pub struct EditTemplate {
    pub post: Post,
}

// --- Forms ---

/// Fields arrive nested under `blog`, e.g. `blog[title]=Hi`.
#[derive(Deserialize, Debug, Default)]
pub struct BlogForm {
    #[serde(rename = "blog[title]")]
    pub title: Option<String>,
    #[serde(rename = "blog[image]")]
    pub image: Option<String>,
    #[serde(rename = "blog[body]")]
    pub body: Option<String>,
}

impl BlogForm {
    /// Only the body is sanitized; title and image are escaped on render.
    pub fn into_fields(self, sanitizer: &Sanitizer) -> PostFields {
        PostFields {
            title: self.title,
            image: self.image,
            body: self.body.map(|body| sanitizer.clean(&body)),
            created: None,
        }
    }
}

// --- Router ---

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/blogs", get(index).post(create))
        .route("/blogs/new", get(new_form))
        .route("/blogs/{id}", get(show).put(update).delete(destroy))
        .route("/blogs/{id}/edit", get(edit_form))
}

pub fn post_path(id: &str) -> String {
    format!("{}/{}", LISTING_PATH, id)
}

// --- Handlers ---

async fn root() -> Redirect {
    Redirect::to(LISTING_PATH)
}

async fn index(State(state): State<AppState>) -> AppResult<Html<IndexTemplate>> {
    let posts = state
        .failure_policy
        .check("list posts", state.posts.list_all().await)
        .await?;
    Ok(Html(IndexTemplate { posts }))
}

async fn new_form() -> Html<NewTemplate> {
    Html(NewTemplate)
}

async fn create(
    State(state): State<AppState>,
    Form(form): Form<BlogForm>,
) -> AppResult<Redirect> {
    let fields = form.into_fields(&state.sanitizer);
    let post = state
        .failure_policy
        .check("create a post", state.posts.create(fields).await)
        .await?;
    tracing::info!("Created post {}", post.id);
    Ok(Redirect::to(LISTING_PATH))
}

async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Html<ShowTemplate>> {
    let post = state
        .failure_policy
        .check("find a post", state.posts.get_by_id(&id).await)
        .await?;
    Ok(Html(ShowTemplate { post }))
}

async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Html<EditTemplate>> {
    let post = state
        .failure_policy
        .check("find a post", state.posts.get_by_id(&id).await)
        .await?;
    Ok(Html(EditTemplate { post }))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<BlogForm>,
) -> AppResult<Redirect> {
    let fields = form.into_fields(&state.sanitizer);
    state
        .failure_policy
        .check("update a post", state.posts.update_by_id(&id, fields).await)
        .await?;
    tracing::info!("Updated post {}", id);
    Ok(Redirect::to(&post_path(&id)))
}

async fn destroy(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Redirect> {
    state
        .failure_policy
        .check("delete a post", state.posts.delete_by_id(&id).await)
        .await?;
    tracing::info!("Deleted post {}", id);
    Ok(Redirect::to(LISTING_PATH))
}
