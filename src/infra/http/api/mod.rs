pub mod error;
pub mod handlers;
pub mod models;
pub mod state;

pub use state::ApiState;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

use super::middleware::{enforce_deadline, log_responses, set_request_context};

pub fn build_api_router(state: ApiState) -> Router {
    let deadline_state = state.clone();

    Router::new()
        .route("/v1/healthcheck", get(handlers::healthcheck))
        .route("/v1/posts", post(handlers::create_post))
        .route("/v1/posts/search-by-tag", get(handlers::search_by_tag))
        .route("/v1/posts/search", get(handlers::search_posts))
        .route(
            "/v1/posts/{id}",
            get(handlers::get_post)
                .put(handlers::update_post)
                .patch(handlers::update_post),
        )
        .with_state(state)
        .layer(axum_middleware::from_fn_with_state(
            deadline_state,
            enforce_deadline,
        ))
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
}
