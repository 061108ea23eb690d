use crate::common::CallerContext;
use crate::domains::auth::JwtService;
use axum::{middleware::Next, response::Response};
use std::sync::Arc;
use tracing::debug;

/// JWT authentication middleware
///
/// Extracts the caller token from the Authorization header, verifies it, and
/// adds the CallerContext to request extensions.
/// If no token or invalid token, request continues without a caller; handlers
/// decide whether that is acceptable.
pub async fn jwt_auth_middleware(
    jwt_service: Arc<JwtService>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let caller = extract_caller(&request, &jwt_service);

    if let Some(caller) = caller {
        debug!("Authenticated caller: {} (admin: {})", caller.uid, caller.is_admin);
        request.extensions_mut().insert(caller);
    } else {
        debug!("No valid authentication token");
    }

    next.run(request).await
}

/// Extract and verify the caller token from a request
fn extract_caller(
    request: &axum::http::Request<axum::body::Body>,
    jwt_service: &JwtService,
) -> Option<CallerContext> {
    let auth_header = request.headers().get("authorization")?;
    let auth_str = auth_header.to_str().ok()?;

    // Handle both "Bearer <token>" and raw token
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str);

    let claims = jwt_service.verify_token(token).ok()?;
    if claims.sub.trim().is_empty() {
        return None;
    }

    Some(claims.caller())
}
