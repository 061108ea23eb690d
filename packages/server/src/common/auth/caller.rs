use crate::common::UserId;

/// Verified caller of a callable endpoint
///
/// Built from a verified caller token; handlers only ever read the identity
/// from here, never from the request payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallerContext {
    pub uid: UserId,
    pub is_admin: bool,
}

impl CallerContext {
    pub fn new(uid: impl Into<UserId>, is_admin: bool) -> Self {
        Self {
            uid: uid.into(),
            is_admin,
        }
    }
}
