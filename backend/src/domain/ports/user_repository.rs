//! Driven port for account persistence.

use async_trait::async_trait;

use crate::domain::{DisplayName, EmailAddress, PasswordHash, Role, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The email is already registered.
        DuplicateEmail { email: String } => "email {email} already registered",
        /// No account matched.
        NotFound { key: String } => "user {key} not found",
    }
}

/// Account row awaiting insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Display name.
    pub name: DisplayName,
    /// Normalised email.
    pub email: EmailAddress,
    /// Encoded password hash.
    pub password_hash: PasswordHash,
    /// Initial role.
    pub role: Role,
}

/// Account together with its stored credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    /// Public account view.
    pub user: User,
    /// Encoded password hash.
    pub password_hash: PasswordHash,
}

/// Persistence contract for accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account; `DuplicateEmail` when the email is taken.
    async fn create(&self, user: NewUser) -> Result<User, UserRepositoryError>;

    /// Account and hash for a login attempt.
    async fn find_credentials(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError>;

    /// Account by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Replace the display name.
    async fn update_name(
        &self,
        id: UserId,
        name: &DisplayName,
    ) -> Result<User, UserRepositoryError>;

    /// Change the role of the account registered under `email`.
    async fn set_role(&self, email: &EmailAddress, role: Role) -> Result<User, UserRepositoryError>;
}
