//! Middleware for logging requests and responses.

use axum::{
    body::Body,
    extract::Request,
    http::{StatusCode, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::time::Instant;

/// The maximum number of bytes of a form body to log at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log each request with its response status and how long it took.
///
/// Submitted form bodies are logged too. Bodies longer than
/// [LOG_BODY_LENGTH_LIMIT] bytes are truncated at the `info` level and logged
/// in full at the `debug` level.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let request = if is_form_submission(&request) {
        let (parts, body) = request.into_parts();
        let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
            Ok(bytes) => bytes,
            Err(error) => {
                tracing::warn!("could not read body of {method} {uri}: {error}");
                return StatusCode::BAD_REQUEST.into_response();
            }
        };

        log_form_body(&method, &uri, &String::from_utf8_lossy(&body_bytes));
        Request::from_parts(parts, Body::from(body_bytes))
    } else {
        request
    };

    let start = Instant::now();
    let response = next.run(request).await;
    let latency = start.elapsed();

    let status = response.status();
    if status.is_server_error() {
        tracing::error!("{method} {uri} -> {status} in {latency:?}");
    } else {
        tracing::info!("{method} {uri} -> {status} in {latency:?}");
    }

    response
}

fn is_form_submission(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|content_type| content_type.starts_with("application/x-www-form-urlencoded"))
}

fn log_form_body(method: &axum::http::Method, uri: &axum::http::Uri, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        let cut = floor_char_boundary(body, LOG_BODY_LENGTH_LIMIT);
        tracing::info!("{method} {uri} form: {}...", &body[..cut]);
        tracing::debug!("{method} {uri} full form: {body:?}");
    } else {
        tracing::info!("{method} {uri} form: {body}");
    }
}

/// The largest index no greater than `index` that lies on a char boundary.
fn floor_char_boundary(text: &str, index: usize) -> usize {
    (0..=index.min(text.len()))
        .rev()
        .find(|&i| text.is_char_boundary(i))
        .unwrap_or(0)
}
