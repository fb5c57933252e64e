use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderName, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{Instrument, error, info_span, warn};
use uuid::Uuid;

use crate::application::error::ErrorReport;

use super::api::ApiState;
use super::api::error::ApiError;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

#[derive(Clone, Debug)]
pub struct RequestContext {
    pub request_id: String,
}

/// Tag the request with an id, run it inside a span carrying that id, and
/// echo the id back in `x-request-id`.
pub async fn set_request_context(mut request: Request<Body>, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    );
    request.extensions_mut().insert(RequestContext {
        request_id: request_id.clone(),
    });

    let mut response = next.run(request).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// Abort the handler once the request deadline passes. Dropping the handler
/// future cancels any in-flight database or cache call it was awaiting.
pub async fn enforce_deadline(
    State(state): State<ApiState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    match tokio::time::timeout(state.request_timeout, next.run(request)).await {
        Ok(response) => response,
        Err(_) => ApiError::deadline_exceeded(state.request_timeout).into_response(),
    }
}

/// Log failed requests with the diagnostic chain their handler attached.
/// Successful requests are not logged here.
pub async fn log_responses(request: Request<Body>, next: Next) -> Response {
    let query = request.uri().query().map(str::to_owned);
    let started = Instant::now();

    let mut response = next.run(request).await;
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let elapsed_ms = started.elapsed().as_millis() as u64;
    let (source, chain) = match response.extensions_mut().remove::<ErrorReport>() {
        Some(report) => (report.source, report.messages),
        None => ("axum", Vec::new()),
    };
    let query = query.as_deref().unwrap_or("");

    if status.is_server_error() {
        error!(
            target = "quill::http::response",
            status = status.as_u16(),
            query,
            elapsed_ms,
            source,
            chain = ?chain,
            "request failed"
        );
    } else {
        warn!(
            target = "quill::http::response",
            status = status.as_u16(),
            query,
            elapsed_ms,
            source,
            chain = ?chain,
            "request rejected"
        );
    }

    response
}
