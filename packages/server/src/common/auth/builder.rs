use super::{AuthError, CallerContext, Capability, Requirement};

/// Entry point for authorization checks
///
/// Usage:
/// ```
/// use functions_core::common::auth::{Actor, CallerContext, Capability};
///
/// let caller = CallerContext::new("admin-1", true);
/// let granted = Actor::new(Some(&caller))
///     .can(Capability::CleanupUserData)
///     .check();
/// assert!(granted.is_ok());
/// ```
pub struct Actor<'a> {
    caller: Option<&'a CallerContext>,
}

impl<'a> Actor<'a> {
    /// Create a new actor for authorization checks
    ///
    /// `caller` is `None` when the request carried no valid caller token.
    pub fn new(caller: Option<&'a CallerContext>) -> Self {
        Self { caller }
    }

    /// Specify what capability the actor needs
    pub fn can(self, capability: Capability) -> CapabilityBuilder<'a> {
        CapabilityBuilder {
            caller: self.caller,
            capability,
        }
    }
}

/// Builder after specifying capability
pub struct CapabilityBuilder<'a> {
    caller: Option<&'a CallerContext>,
    capability: Capability,
}

impl<'a> CapabilityBuilder<'a> {
    /// Perform the authorization check, returning the verified caller
    ///
    /// Admin capabilities report a missing caller as `AdminRequired` rather
    /// than `AuthenticationRequired`: an anonymous request to an admin
    /// endpoint is a permission failure.
    pub fn check(self) -> Result<&'a CallerContext, AuthError> {
        match self.capability.requirement() {
            Requirement::Authenticated => self.caller.ok_or(AuthError::AuthenticationRequired),
            Requirement::Admin => self
                .caller
                .filter(|caller| caller.is_admin)
                .ok_or(AuthError::AdminRequired),
        }
    }
}
