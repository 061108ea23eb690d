//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::domains::auth::JwtService;
use crate::kernel::ServerDeps;
use crate::server::middleware::{jwt_auth_middleware, trigger_secret_middleware};
use crate::server::routes::{
    cleanup_user_data_handler, daily_stats_handler, health_handler, identity_created_handler,
    order_created_handler, process_payment_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: ServerDeps,
}

/// CORS origins: `*` allows any origin, otherwise only the listed ones
fn allowed_origins(origins: &[String]) -> AllowOrigin {
    if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
        return AllowOrigin::from(Any);
    }

    let values: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    AllowOrigin::list(values)
}

/// Build the Axum application router
///
/// - `/callable/*` carries an optional caller resolved from the bearer token
/// - `/triggers/*` requires the shared trigger secret
pub fn build_app(
    deps: ServerDeps,
    jwt_service: Arc<JwtService>,
    trigger_secret: String,
    origins: &[String],
) -> Router {
    let app_state = AppState { deps };

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    let trigger_secret: Arc<str> = Arc::from(trigger_secret);

    let callables = Router::new()
        .route("/processPayment", post(process_payment_handler))
        .route("/cleanupUserData", post(cleanup_user_data_handler))
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service.clone(), req, next)
        }));

    let triggers = Router::new()
        .route("/identity-created", post(identity_created_handler))
        .route("/order-created/:order_id", post(order_created_handler))
        .route("/daily-stats", post(daily_stats_handler))
        .layer(middleware::from_fn(move |req, next| {
            trigger_secret_middleware(trigger_secret.clone(), req, next)
        }));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/callable", callables)
        .nest("/triggers", triggers)
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
