//! Request ID middleware.
//!
//! Every request runs inside a `request` span tagged with its ID so service
//! logs can be correlated with the access log line.

use axum::{
    body::Body,
    http::{header::HeaderName, Extensions, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Longest client-supplied ID we propagate; longer values are replaced.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Request ID stored in request extensions.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

fn incoming_request_id(req: &Request<Body>) -> Option<String> {
    req.headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty() && s.len() <= MAX_REQUEST_ID_LEN)
        .map(str::to_string)
}

/// Reuses the caller's `X-Request-ID` or generates a UUID, records it in
/// request extensions and echoes it on the response.
pub async fn trace_id(mut req: Request<Body>, next: Next) -> Response {
    let request_id = incoming_request_id(&req).unwrap_or_else(|| Uuid::new_v4().to_string());

    req.extensions_mut().insert(RequestId(request_id.clone()));

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    let start = std::time::Instant::now();
    let mut response = next.run(req).instrument(span.clone()).await;

    span.in_scope(|| {
        tracing::info!(
            status = response.status().as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Request completed"
        );
    });

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static("x-request-id"), value);
    }

    response
}

/// Request ID from extensions, or `"unknown"` outside the middleware.
pub fn get_request_id(extensions: &Extensions) -> String {
    extensions
        .get::<RequestId>()
        .map(|r| r.0.clone())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_request_id() {
        let mut extensions = Extensions::new();
        assert_eq!(get_request_id(&extensions), "unknown");

        extensions.insert(RequestId("req-42".to_string()));
        assert_eq!(get_request_id(&extensions), "req-42");
    }

    #[test]
    fn test_incoming_request_id_is_trimmed() {
        let req = Request::builder()
            .header(REQUEST_ID_HEADER, "  abc-123 ")
            .body(Body::empty())
            .unwrap();
        assert_eq!(incoming_request_id(&req).as_deref(), Some("abc-123"));
    }

    #[test]
    fn test_incoming_request_id_rejects_oversized() {
        let req = Request::builder()
            .header(REQUEST_ID_HEADER, "x".repeat(MAX_REQUEST_ID_LEN + 1))
            .body(Body::empty())
            .unwrap();
        assert!(incoming_request_id(&req).is_none());
    }
}
