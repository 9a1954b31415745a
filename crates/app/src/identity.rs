//! Identity
//!
//! The authentication provider only vouches for who is signed in; contact
//! details come from the matching application user row.

use async_trait::async_trait;
use mockall::automock;

/// The signed-in principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Verified email address.
    pub email: String,
}

#[automock]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The signed-in user, or `None` for guests.
    async fn current_user(&self) -> Option<Identity>;
}

/// An identity provider with a fixed answer, used by the CLI and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityProvider {
    identity: Option<Identity>,
}

impl StaticIdentityProvider {
    /// A provider that always reports a guest.
    #[must_use]
    pub fn guest() -> Self {
        Self::default()
    }

    /// A provider that always reports `email` as signed in.
    #[must_use]
    pub fn signed_in(email: impl Into<String>) -> Self {
        Self {
            identity: Some(Identity {
                email: email.into(),
            }),
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn current_user(&self) -> Option<Identity> {
        self.identity.clone()
    }
}
