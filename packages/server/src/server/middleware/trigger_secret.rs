use axum::{
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::warn;

/// Header the event source presents on every trigger delivery
pub const TRIGGER_SECRET_HEADER: &str = "x-trigger-secret";

/// Trigger authentication middleware
///
/// Trigger routes are only reachable by the event source. Requests without
/// the shared secret are answered with 401 before any handler runs.
pub async fn trigger_secret_middleware(
    secret: Arc<str>,
    request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    if !has_secret(&request, &secret) {
        warn!(path = %request.uri().path(), "Rejected trigger without valid secret");
        return StatusCode::UNAUTHORIZED.into_response();
    }

    next.run(request).await
}

fn has_secret(request: &axum::http::Request<axum::body::Body>, secret: &str) -> bool {
    request
        .headers()
        .get(TRIGGER_SECRET_HEADER)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| !secret.is_empty() && value == secret)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(secret: Option<&str>) -> axum::http::Request<axum::body::Body> {
        let mut builder = axum::http::Request::builder();
        if let Some(secret) = secret {
            builder = builder.header(TRIGGER_SECRET_HEADER, secret);
        }
        builder.body(axum::body::Body::empty()).unwrap()
    }

    #[test]
    fn test_matching_secret() {
        assert!(has_secret(&request(Some("s3cret")), "s3cret"));
    }

    #[test]
    fn test_missing_or_wrong_secret() {
        assert!(!has_secret(&request(None), "s3cret"));
        assert!(!has_secret(&request(Some("nope")), "s3cret"));
    }

    #[test]
    fn test_empty_configured_secret_never_matches() {
        assert!(!has_secret(&request(Some("")), ""));
    }
}
