/// Operations a caller may ask to perform through a callable endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Pay for one of the caller's own orders
    ProcessPayment,

    /// Delete another user's record and identity
    CleanupUserData,
}

/// What a caller must present to be granted a capability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Any verified caller
    Authenticated,

    /// A verified caller whose token carries the admin claim
    Admin,
}

impl Capability {
    pub fn requirement(&self) -> Requirement {
        match self {
            Capability::ProcessPayment => Requirement::Authenticated,
            Capability::CleanupUserData => Requirement::Admin,
        }
    }
}
