use axum::{
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Correlation id of the current HTTP request, stored in request extensions.
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

/// Logs one line per request and echoes an `x-request-id`, generating one
/// when the caller did not send it.
pub async fn logger<B>(mut req: Request<B>, next: Next<B>) -> Response {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    req.extensions_mut().insert(RequestId(request_id.clone()));

    let method = req.method().clone();
    let uri = req.uri().clone();
    let start = Instant::now();

    let mut response = next.run(req).await;
    let status = response.status().as_u16();
    let elapsed = start.elapsed().as_millis();

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    if response.status().is_server_error() {
        warn!(request_id = %request_id, method = %method, uri = %uri, status, elapsed_ms = elapsed, "Request failed");
    } else {
        info!(request_id = %request_id, method = %method, uri = %uri, status, elapsed_ms = elapsed, "Request log");
    }
    response
}
