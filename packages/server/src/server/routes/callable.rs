//! Callable endpoints
//!
//! Wire protocol: the client posts `{"data": ...}` and receives either
//! `{"result": ...}` or `{"error": {"status": ..., "message": ...}}`.

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, warn};

use crate::common::{CallerContext, HandlerError};
use crate::domains::orders::process_payment;
use crate::domains::users::cleanup_user_data;
use crate::server::app::AppState;

#[derive(Debug, Deserialize)]
pub struct CallableRequest {
    #[serde(default)]
    pub data: Value,
}

/// Wire status and HTTP status of a handler failure
pub fn error_status(error: &HandlerError) -> (&'static str, StatusCode) {
    match error {
        HandlerError::Unauthenticated(_) => ("UNAUTHENTICATED", StatusCode::UNAUTHORIZED),
        HandlerError::PermissionDenied(_) => ("PERMISSION_DENIED", StatusCode::FORBIDDEN),
        HandlerError::Internal(_) => ("INTERNAL", StatusCode::INTERNAL_SERVER_ERROR),
    }
}

fn error_response(status: StatusCode, wire_status: &str, message: &str) -> Response {
    (
        status,
        Json(json!({ "error": { "status": wire_status, "message": message } })),
    )
        .into_response()
}

/// Encode a handler outcome with the callable protocol
pub fn callable_response<T: Serialize>(outcome: Result<T, HandlerError>) -> Response {
    let error = match outcome.map(serde_json::to_value) {
        Ok(Ok(result)) => return (StatusCode::OK, Json(json!({ "result": result }))).into_response(),
        Ok(Err(e)) => {
            error!(error = %e, "Failed to encode callable result");
            HandlerError::internal("Failed to encode result")
        }
        Err(error) => error,
    };

    warn!(code = error.code(), message = error.message(), "Callable failed");
    let (wire_status, status) = error_status(&error);
    error_response(status, wire_status, error.message())
}

/// Unwrap the request envelope, answering malformed bodies in protocol form
fn envelope(body: Result<Json<CallableRequest>, JsonRejection>) -> Result<Value, Response> {
    body.map(|Json(request)| request.data).map_err(|rejection| {
        error_response(
            StatusCode::BAD_REQUEST,
            "INVALID_ARGUMENT",
            &rejection.body_text(),
        )
    })
}

pub async fn process_payment_handler(
    Extension(state): Extension<AppState>,
    caller: Option<Extension<CallerContext>>,
    body: Result<Json<CallableRequest>, JsonRejection>,
) -> Response {
    let data = match envelope(body) {
        Ok(data) => data,
        Err(response) => return response,
    };
    let caller = caller.map(|Extension(caller)| caller);

    callable_response(process_payment(data, caller.as_ref(), &state.deps).await)
}

pub async fn cleanup_user_data_handler(
    Extension(state): Extension<AppState>,
    caller: Option<Extension<CallerContext>>,
    body: Result<Json<CallableRequest>, JsonRejection>,
) -> Response {
    let data = match envelope(body) {
        Ok(data) => data,
        Err(response) => return response,
    };
    let caller = caller.map(|Extension(caller)| caller);

    callable_response(cleanup_user_data(data, caller.as_ref(), &state.deps).await)
}
