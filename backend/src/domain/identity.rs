//! Session-derived caller identity and the access guard predicates.
//!
//! Inbound adapters resolve a [`Caller`] once per request and pass it into
//! every domain call. Services never look at ambient session state; they ask
//! [`require_authenticated`] or [`require_admin`] before touching storage.

use serde::{Deserialize, Serialize};

use super::{Error, Role, UserId};

/// Identity persisted in the session cookie after a successful login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIdentity {
    /// Authenticated account.
    pub user_id: UserId,
    /// Role captured at login or the last role refresh.
    pub role: Role,
}

impl SessionIdentity {
    /// Whether the identity carries the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// The party on whose behalf a domain operation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Caller {
    /// No session identity is present.
    #[default]
    Anonymous,
    /// A signed-in account.
    Authenticated(SessionIdentity),
}

impl Caller {
    /// Build a caller for a signed-in account.
    #[must_use]
    pub fn authenticated(user_id: UserId, role: Role) -> Self {
        Self::Authenticated(SessionIdentity { user_id, role })
    }

    /// Session identity, if signed in.
    #[must_use]
    pub fn identity(&self) -> Option<&SessionIdentity> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(identity) => Some(identity),
        }
    }

    /// Whether the caller is a signed-in admin.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.identity().is_some_and(SessionIdentity::is_admin)
    }
}

impl From<Option<SessionIdentity>> for Caller {
    fn from(value: Option<SessionIdentity>) -> Self {
        value.map_or(Self::Anonymous, Self::Authenticated)
    }
}

/// Require a signed-in caller.
///
/// # Examples
/// ```
/// use storefront::domain::{Caller, ErrorCode, require_authenticated};
///
/// let err = require_authenticated(&Caller::Anonymous).unwrap_err();
/// assert_eq!(err.code(), ErrorCode::Unauthorized);
/// ```
pub fn require_authenticated(caller: &Caller) -> Result<&SessionIdentity, Error> {
    caller
        .identity()
        .ok_or_else(|| Error::unauthorized("Login required"))
}

/// Require a signed-in admin; anyone else is refused with `Forbidden`.
pub fn require_admin(caller: &Caller) -> Result<&SessionIdentity, Error> {
    match caller.identity() {
        Some(identity) if identity.is_admin() => Ok(identity),
        _ => Err(Error::forbidden("Admin required")),
    }
}
