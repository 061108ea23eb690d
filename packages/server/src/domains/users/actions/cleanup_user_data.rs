//! Admin utility - removes a user's record and identity

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use crate::common::{validate_input, Actor, CallerContext, Capability, HandlerError, UserId};
use crate::domains::users::models::user_record::USERS_COLLECTION;
use crate::kernel::ServerDeps;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CleanupRequest {
    user_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupResult {
    pub success: bool,
}

/// Delete the target user's record and revoke their identity.
///
/// Restricted to callers whose token carries the admin claim; anyone else
/// (including anonymous callers) gets `permission-denied` with nothing
/// deleted. Both deletions run concurrently and neither cancels the other.
/// A target that is already gone counts as deleted, so retries succeed.
/// If either deletion fails the caller gets `internal`; whatever the other
/// deletion did stays done.
#[instrument(skip(data, caller, deps), fields(caller = ?caller.map(|c| c.uid.as_str())))]
pub async fn cleanup_user_data(
    data: Value,
    caller: Option<&CallerContext>,
    deps: &ServerDeps,
) -> Result<CleanupResult, HandlerError> {
    let admin = Actor::new(caller)
        .can(Capability::CleanupUserData)
        .check()
        .map_err(|e| {
            warn!(error = %e, "Rejected cleanup request");
            HandlerError::from(e)
        })?;

    validate_input(&data, &["userId"]).map_err(|e| HandlerError::internal(e.to_string()))?;
    let request: CleanupRequest = serde_json::from_value(data)
        .map_err(|e| HandlerError::internal(format!("Invalid cleanup request: {}", e)))?;
    let target = request.user_id;

    let (record, identity) = tokio::join!(
        deps.documents.delete(USERS_COLLECTION, target.as_str()),
        deps.identities.delete_identity(&target),
    );

    let mut failed = false;
    if let Err(e) = &record {
        error!(target = %target, error = %e, "Failed to delete user record");
        failed = true;
    }
    if let Err(e) = &identity {
        error!(target = %target, error = %e, "Failed to delete identity");
        failed = true;
    }
    if failed {
        return Err(HandlerError::internal("User data cleanup failed"));
    }

    info!(
        target = %target,
        admin = %admin.uid,
        record_existed = ?record.ok(),
        identity_existed = ?identity.ok(),
        "User data cleaned up"
    );

    Ok(CleanupResult { success: true })
}
