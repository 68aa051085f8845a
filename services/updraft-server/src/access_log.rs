//! One log event per request

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Logs method, path, status, size and latency. Requests without an
/// `x-request-id` get a fresh one, echoed back on the response.
pub async fn access_log(mut request: Request, next: Next) -> Response {
    let started = Instant::now();
    let request_id = match request.headers().get(REQUEST_ID_HEADER) {
        Some(id) => id.clone(),
        None => {
            let id = HeaderValue::from_str(&Uuid::new_v4().to_string())
                .unwrap_or_else(|_| HeaderValue::from_static("-"));
            request.headers_mut().insert(REQUEST_ID_HEADER, id.clone());
            id
        }
    };
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let mut response = next.run(request).await;

    let size = response
        .headers()
        .get(axum::http::header::CONTENT_LENGTH)
        .and_then(|len| len.to_str().ok())
        .unwrap_or("-")
        .to_string();
    info!(
        request_id = %request_id.to_str().unwrap_or("-"),
        %method,
        %path,
        status = response.status().as_u16(),
        size = %size,
        latency_us = started.elapsed().as_micros() as u64,
        "request"
    );
    response.headers_mut().insert(REQUEST_ID_HEADER, request_id);
    response
}
