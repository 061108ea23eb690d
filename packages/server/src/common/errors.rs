//! Failure signal returned by handlers to the trigger source or callable client.

use thiserror::Error;

use super::auth::AuthError;

/// Typed handler failure
///
/// Callables surface one of three codes to the client; triggers that
/// re-signal use `Internal` so the platform may redeliver the event.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    PermissionDenied(String),

    #[error("{0}")]
    Internal(String),
}

impl HandlerError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Wire code of the failure (`unauthenticated`, `permission-denied`, `internal`)
    pub fn code(&self) -> &'static str {
        match self {
            HandlerError::Unauthenticated(_) => "unauthenticated",
            HandlerError::PermissionDenied(_) => "permission-denied",
            HandlerError::Internal(_) => "internal",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            HandlerError::Unauthenticated(message)
            | HandlerError::PermissionDenied(message)
            | HandlerError::Internal(message) => message,
        }
    }
}

impl From<AuthError> for HandlerError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::AuthenticationRequired => {
                HandlerError::Unauthenticated(error.to_string())
            }
            AuthError::AdminRequired | AuthError::PermissionDenied(_) => {
                HandlerError::PermissionDenied(error.to_string())
            }
        }
    }
}
