//! Response middleware.

use crate::state::AppState;
use axum::http::{header, HeaderValue};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Advertise the content-type allow-set on every response via the
/// `Accept` header, success and failure alike.
pub async fn accept_header_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&state.config.accept_header()) {
        response.headers_mut().insert(header::ACCEPT, value);
    }

    response
}
