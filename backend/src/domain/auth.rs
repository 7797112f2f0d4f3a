//! Authentication primitives: login credentials and registration requests.
//!
//! Inbound adapters hand raw strings to these constructors, so every rule
//! about passwords and emails is enforced before a port is called.

use zeroize::Zeroizing;

use super::{DisplayName, EmailAddress, UserValidationError};

/// Minimum accepted password length in characters.
pub const PASSWORD_MIN_LEN: usize = 6;

/// Validation failures for login and registration payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    /// A field failed user-level validation.
    #[error(transparent)]
    User(#[from] UserValidationError),
    /// Password was empty.
    #[error("password must not be empty")]
    EmptyPassword,
    /// Password shorter than [`PASSWORD_MIN_LEN`].
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    /// Password and confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,
}

impl CredentialsValidationError {
    /// Request field the failure refers to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::User(UserValidationError::EmptyName | UserValidationError::NameTooLong { .. }) => {
                "name"
            }
            Self::User(_) => "email",
            Self::EmptyPassword | Self::PasswordTooShort { .. } => "password",
            Self::PasswordMismatch => "passwordConfirm",
        }
    }
}

/// Encoded password hash as produced by a [`PasswordHasher`] adapter.
///
/// [`PasswordHasher`]: crate::domain::ports::PasswordHasher
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash string.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is normalised by [`EmailAddress::parse`].
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use storefront::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Ada@Example.com", "hunter22").unwrap();
/// assert_eq!(creds.email().as_ref(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let email = EmailAddress::parse(email)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email used for the account lookup.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated sign-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    name: DisplayName,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate raw sign-up fields.
    ///
    /// # Examples
    /// ```
    /// use storefront::domain::{CredentialsValidationError, Registration};
    ///
    /// let err = Registration::try_from_parts("Ada", "ada@example.com", "secret1", "secret2")
    ///     .unwrap_err();
    /// assert_eq!(err, CredentialsValidationError::PasswordMismatch);
    /// ```
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
        password_confirm: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let name = DisplayName::parse(name)?;
        let email = EmailAddress::parse(email)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        if password.chars().count() < PASSWORD_MIN_LEN {
            return Err(CredentialsValidationError::PasswordTooShort {
                min: PASSWORD_MIN_LEN,
            });
        }
        if password != password_confirm {
            return Err(CredentialsValidationError::PasswordMismatch);
        }
        Ok(Self {
            name,
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Display name for the new account.
    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    /// Normalised email for the new account.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plain-text password awaiting hashing.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
