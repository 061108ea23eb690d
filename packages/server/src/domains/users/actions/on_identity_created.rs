//! Identity-created trigger - provisions the user record

use tracing::{error, info, instrument};

use crate::common::HandlerError;
use crate::domains::notifications::NotificationRequest;
use crate::domains::users::models::user_record::{UserRecord, USERS_COLLECTION};
use crate::kernel::{Identity, ServerDeps};

const WELCOME_TITLE: &str = "Welcome to Our App!";
const WELCOME_BODY: &str = "Thanks for joining our community.";

/// Provision the user record for a newly created identity.
///
/// This action:
/// 1. Builds a `customer` record with server-assigned timestamps
/// 2. Writes it at `users/{uid}` (a redelivered event overwrites it)
/// 3. Sends the welcome notification
///
/// Any failure is re-signalled as `internal` so the platform redelivers the
/// event. A record written before a failed notification stays written.
#[instrument(skip(identity, deps), fields(uid = %identity.uid))]
pub async fn on_identity_created(identity: Identity, deps: &ServerDeps) -> Result<(), HandlerError> {
    if identity.uid.is_blank() {
        error!("Identity event without uid");
        return Err(HandlerError::internal("User creation failed"));
    }

    let record = UserRecord::from_identity(&identity);

    let write = record.to_write().map_err(|e| {
        error!(error = %e, "Failed to build user record");
        HandlerError::internal("User creation failed")
    })?;

    deps.documents
        .set(USERS_COLLECTION, identity.uid.as_str(), write)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to write user record");
            HandlerError::internal("User creation failed")
        })?;

    let welcome = NotificationRequest::builder()
        .user_id(identity.uid.clone())
        .title(WELCOME_TITLE)
        .body(WELCOME_BODY)
        .build();

    deps.notifications.send(&welcome).await.map_err(|e| {
        error!(error = %e, "Failed to send welcome notification");
        HandlerError::internal("User creation failed")
    })?;

    info!("New user created: {}", identity.uid);
    Ok(())
}
