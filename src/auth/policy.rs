use uuid::Uuid;

use crate::middleware::AuthUser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

/// A resource addressed by a request, identified by the account that owns it.
#[derive(Debug, Clone, Copy)]
pub struct OwnedResource {
    pub owner_id: Uuid,
    /// Used in denial messages, e.g. "education entries".
    pub kind: &'static str,
}

/// Decides whether `caller` may act on `resource`.
pub trait AccessPolicy: Send + Sync {
    fn decide(&self, caller: &AuthUser, resource: &OwnedResource) -> Decision;
}

/// Callers may only touch resources they own. No role bypass.
#[derive(Debug, Default, Clone, Copy)]
pub struct OwnerOnly;

impl AccessPolicy for OwnerOnly {
    fn decide(&self, caller: &AuthUser, resource: &OwnedResource) -> Decision {
        if caller.user_id == resource.owner_id {
            Decision::Allow
        } else {
            Decision::Deny
        }
    }
}
