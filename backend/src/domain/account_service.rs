//! Account registration, sign-in and role management.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{error, info};

use crate::domain::ports::{
    AccountCommand, AccountQuery, NewUser, PasswordHasher, PasswordHasherError, UserRepository,
    UserRepositoryError,
};
use crate::domain::{
    Caller, DisplayName, EmailAddress, Error, LoginCredentials, Registration, Role, User,
    require_admin, require_authenticated,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Account service implementing [`AccountCommand`] and [`AccountQuery`].
#[derive(Clone)]
pub struct AccountService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
}

impl<U, H> AccountService<U, H> {
    /// Create a new service over the user store and password hasher.
    pub fn new(users: Arc<U>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            error!(%message, "user repository unavailable");
            Error::service_unavailable("account store is temporarily unavailable")
        }
        UserRepositoryError::Query { message } => {
            error!(%message, "user repository query failed");
            Error::internal("account store query failed")
        }
        UserRepositoryError::DuplicateEmail { .. } => Error::conflict("Email already registered")
            .with_details(json!({ "field": "email", "code": "duplicate" })),
        UserRepositoryError::NotFound { .. } => Error::not_found("User not found"),
    }
}

fn map_hasher_error(error: PasswordHasherError) -> Error {
    error!(error = %error, "password hashing failed");
    Error::internal("password hashing failed")
}

#[async_trait]
impl<U, H> AccountCommand for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        let password_hash = self
            .hasher
            .hash(registration.password())
            .await
            .map_err(map_hasher_error)?;
        let user = self
            .users
            .create(NewUser {
                name: registration.name().clone(),
                email: registration.email().clone(),
                password_hash,
                role: Role::User,
            })
            .await
            .map_err(map_user_error)?;
        info!(user = %user.id, "account registered");
        Ok(user)
    }

    async fn authenticate(&self, credentials: LoginCredentials) -> Result<User, Error> {
        let stored = self
            .users
            .find_credentials(credentials.email())
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized(INVALID_CREDENTIALS))?;
        let matches = self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .await
            .map_err(map_hasher_error)?;
        if !matches {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        if !stored.user.is_active {
            return Err(Error::forbidden("Account is disabled"));
        }
        Ok(stored.user)
    }

    async fn update_profile(&self, caller: Caller, name: DisplayName) -> Result<User, Error> {
        let identity = require_authenticated(&caller)?;
        self.users
            .update_name(identity.user_id, &name)
            .await
            .map_err(|err| match err {
                UserRepositoryError::NotFound { .. } => Error::unauthorized("Login required"),
                other => map_user_error(other),
            })
    }

    async fn change_role(
        &self,
        caller: Caller,
        email: EmailAddress,
        role: Role,
    ) -> Result<User, Error> {
        let admin = require_admin(&caller)?;
        let user = self
            .users
            .set_role(&email, role)
            .await
            .map_err(map_user_error)?;
        info!(admin = %admin.user_id, user = %user.id, %role, "account role changed");
        Ok(user)
    }
}

#[async_trait]
impl<U, H> AccountQuery for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn current_user(&self, caller: Caller) -> Result<User, Error> {
        let identity = require_authenticated(&caller)?;
        self.users
            .find_by_id(identity.user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized("Login required"))
    }
}
