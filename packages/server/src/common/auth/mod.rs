/// Authorization for callable endpoints
///
/// Provides a fluent API for authorization checks in handler code:
///
/// ```rust
/// use functions_core::common::auth::{Actor, CallerContext, Capability};
///
/// let caller = CallerContext::new("u1", false);
/// let caller = Actor::new(Some(&caller))
///     .can(Capability::ProcessPayment)
///     .check()
///     .unwrap();
/// assert_eq!(caller.uid.as_str(), "u1");
/// ```

mod builder;
mod caller;
mod capability;
mod errors;

pub use builder::{Actor, CapabilityBuilder};
pub use caller::CallerContext;
pub use capability::{Capability, Requirement};
pub use errors::AuthError;
