use std::sync::Arc;

use crate::failure::FailurePolicy;
use crate::sanitize::Sanitizer;
use crate::store::PostStore;

#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostStore>,
    pub sanitizer: Arc<Sanitizer>,
    pub failure_policy: FailurePolicy,
}

impl AppState {
    pub fn new(posts: Arc<dyn PostStore>, failure_policy: FailurePolicy) -> Self {
        Self {
            posts,
            sanitizer: Arc::new(Sanitizer::new()),
            failure_policy,
        }
    }
}
