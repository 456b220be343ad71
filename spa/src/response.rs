//! HTTP response builders, decoupled from any server framework.

use http::{Response, StatusCode, header};

/// 200 with cache validation headers.
pub fn ok(
    body: Vec<u8>,
    content_type: &str,
    etag: &str,
    cache_control: &str,
) -> Response<Vec<u8>> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, body.len())
        .header(header::ETAG, etag)
        .header(header::CACHE_CONTROL, cache_control)
        .body(body)
        .unwrap_or_else(|e| fallback("200", &e))
}

/// 304 Not Modified.
pub fn not_modified(etag: &str, cache_control: &str) -> Response<Vec<u8>> {
    Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header(header::ETAG, etag)
        .header(header::CACHE_CONTROL, cache_control)
        .body(Vec::new())
        .unwrap_or_else(|e| fallback("304", &e))
}

/// 404 Not Found.
pub fn not_found() -> Response<Vec<u8>> {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header(header::CONTENT_TYPE, "text/plain")
        .body(b"404 Not Found".to_vec())
        .unwrap_or_else(|e| fallback("404", &e))
}

/// 301 permanent redirect.
pub fn redirect_permanent(location: &str) -> Response<Vec<u8>> {
    Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header(header::LOCATION, location)
        .body(Vec::new())
        .unwrap_or_else(|e| fallback("301", &e))
}

fn fallback(status: &str, error: &http::Error) -> Response<Vec<u8>> {
    tracing::error!(status, error = %error, "failed to build response");
    let mut response = Response::new(Vec::new());
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response
}
