pub mod assets;
pub mod blogs;
pub mod method_override;

use askama::Template;
use axum::extract::Request;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower::util::{MapRequest, MapRequestLayer};
use tower::Layer;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::state::AppState;

/// The full service: method override in front of the router.
pub type App = MapRequest<Router, fn(Request) -> Request>;

/// Wrapper to render askama templates as axum responses
pub struct Html<T: Template>(pub T);

impl<T: Template> IntoResponse for Html<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                body,
            )
                .into_response(),
            Err(e) => AppError::Internal(format!("Template render error: {}", e)).into_response(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/assets/{*path}", get(assets::serve))
        .merge(blogs::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Method override has to run before routing, so it wraps the router
/// instead of being added with `Router::layer`.
pub fn app(state: AppState) -> App {
    let rewrite: fn(Request) -> Request = method_override::rewrite;
    MapRequestLayer::new(rewrite).layer(router(state))
}
