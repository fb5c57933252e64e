use std::{sync::Arc, time::Duration};

use crate::application::posts::PostService;

#[derive(Clone)]
pub struct ApiState {
    pub posts: Arc<PostService>,
    /// Deployment label reported by the health check.
    pub environment: String,
    pub request_timeout: Duration,
}
