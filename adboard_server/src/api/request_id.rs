//! Request correlation middleware.
//!
//! Every response carries an `x-request-id` header so a client-side report
//! can be matched against the server logs. Callers may supply their own id
//! in the request; otherwise one is generated.

use axum::{
    extract::Request,
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Header carrying the correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

fn correlation_id(headers: &axum::http::HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Tag the request with a correlation id, log entry and exit under that id,
/// and echo it back on the response.
pub async fn request_id_middleware(request: Request, next: Next) -> Result<Response, StatusCode> {
    let request_id = correlation_id(request.headers());

    tracing::info!(
        request_id = %request_id,
        method = %request.method(),
        uri = %request.uri(),
        "Request started"
    );

    let response = next.run(request).await;

    let (mut parts, body) = response.into_parts();
    if let Ok(header_value) = HeaderValue::from_str(&request_id) {
        parts.headers.insert(REQUEST_ID_HEADER, header_value);
    }

    tracing::info!(
        request_id = %request_id,
        status = %parts.status,
        "Request completed"
    );

    Ok(Response::from_parts(parts, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::HeaderMap;

    #[test]
    fn caller_supplied_id_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("abc-42"));
        assert_eq!(correlation_id(&headers), "abc-42");
    }

    #[test]
    fn missing_id_gets_a_fresh_uuid() {
        let generated = correlation_id(&HeaderMap::new());
        assert!(Uuid::parse_str(&generated).is_ok());
    }
}
