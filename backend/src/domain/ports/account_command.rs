//! Driving ports for account management.

use async_trait::async_trait;

use crate::domain::{Caller, DisplayName, EmailAddress, Error, LoginCredentials, Registration, Role, User};

/// Account mutations and sign-in.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create a `user`-role account; `Conflict` when the email is taken.
    async fn register(&self, registration: Registration) -> Result<User, Error>;

    /// Check credentials and return the account to bind to the session.
    ///
    /// Unknown emails and wrong passwords are indistinguishable
    /// (`Unauthorized`); disabled accounts fail with `Forbidden`.
    async fn authenticate(&self, credentials: LoginCredentials) -> Result<User, Error>;

    /// Rename the signed-in account.
    async fn update_profile(&self, caller: Caller, name: DisplayName) -> Result<User, Error>;

    /// Grant or revoke the admin role (admin only).
    async fn change_role(
        &self,
        caller: Caller,
        email: EmailAddress,
        role: Role,
    ) -> Result<User, Error>;
}

/// Read access to the signed-in account.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountQuery: Send + Sync {
    /// Current account; `Unauthorized` for anonymous callers or when the
    /// session refers to an account that no longer exists.
    async fn current_user(&self, caller: Caller) -> Result<User, Error>;
}
