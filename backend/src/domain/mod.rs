//! Storefront domain: types, rules, ports and services.
//!
//! Purpose: keep every business rule (access guard, recovery lifecycle,
//! payment verification, ownership derivation) independent of HTTP and SQL.
//! Inbound adapters call the driving ports in [`ports`]; outbound adapters
//! implement the driven ports.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`]: transport-agnostic failures.
//! - [`Caller`], [`require_authenticated`], [`require_admin`]: access guard.
//! - Catalogue, recovery, order and payment types.
//! - Services implementing the driving ports.

pub mod account_service;
pub mod auth;
pub mod catalogue;
pub mod catalogue_service;
pub mod checkout_service;
pub mod error;
pub mod identity;
pub mod order;
pub mod payment;
pub mod ports;
pub mod recovery;
pub mod recovery_service;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{
    CredentialsValidationError, LoginCredentials, PASSWORD_MIN_LEN, PasswordHash, Registration,
};
pub use self::catalogue::{
    BookingCode, CatalogueItem, CatalogueItemId, CatalogueValidationError, DEFAULT_LEAGUE,
    NewCatalogueItem, StorefrontItem,
};
pub use self::catalogue_service::CatalogueService;
pub use self::checkout_service::CheckoutService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identity::{Caller, SessionIdentity, require_admin, require_authenticated};
pub use self::order::{
    Cart, CartLine, NewOrder, OrderId, OrderRequest, OrderSummary, OrderValidationError,
    PlacedOrder,
};
pub use self::payment::{
    PaymentExpectation, PaymentMismatch, PaymentReference, PaymentValidationError,
    ProviderTransaction, SUCCESS_STATUS, VerifiedPayment, to_minor_units,
};
pub use self::recovery::{
    NewRecoveryItem, RecoveryAction, RecoveryItem, RecoveryItemId, RecoveryListing,
    RecoveryOutcome, RecoveryPreview, RecoveryStatus,
};
pub use self::recovery_service::RecoveryService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    DISPLAY_NAME_MAX, DisplayName, EmailAddress, Role, User, UserId, UserValidationError,
};
