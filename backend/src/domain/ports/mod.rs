//! Domain ports for the hexagonal boundary.
//!
//! Driving ports (`*Command`, `*Query`) are called by inbound adapters and
//! implemented by domain services. Driven ports (repositories, the payment
//! gateway, the password hasher) are implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod catalogue_command;
mod catalogue_repository;
mod checkout_command;
mod order_repository;
mod password_hasher;
mod payment_gateway;
mod recovery_command;
mod recovery_repository;
mod user_repository;

pub use account_command::{AccountCommand, AccountQuery};
#[cfg(test)]
pub use account_command::{MockAccountCommand, MockAccountQuery};
pub use catalogue_command::{CatalogueAdminCommand, StorefrontQuery};
#[cfg(test)]
pub use catalogue_command::{MockCatalogueAdminCommand, MockStorefrontQuery};
#[cfg(test)]
pub use catalogue_repository::MockCatalogueRepository;
pub use catalogue_repository::{CatalogueRepository, CatalogueRepositoryError};
pub use checkout_command::CheckoutCommand;
#[cfg(test)]
pub use checkout_command::MockCheckoutCommand;
#[cfg(test)]
pub use order_repository::MockOrderRepository;
pub use order_repository::{OrderRepository, OrderRepositoryError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use payment_gateway::MockPaymentGateway;
pub use payment_gateway::{PaymentGateway, PaymentGatewayError};
#[cfg(test)]
pub use recovery_command::{MockRecoveryCommand, MockRecoveryQuery};
pub use recovery_command::{RecoveryCommand, RecoveryQuery};
#[cfg(test)]
pub use recovery_repository::MockRecoveryRepository;
pub use recovery_repository::{RecoveryRepository, RecoveryRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{NewUser, StoredCredentials, UserRepository, UserRepositoryError};
