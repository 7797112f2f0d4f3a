//! PostgreSQL persistence adapters built on Diesel.

mod diesel_catalogue_repository;
mod diesel_error_mapping;
mod diesel_order_repository;
mod diesel_recovery_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use self::diesel_catalogue_repository::DieselCatalogueRepository;
pub use self::diesel_order_repository::DieselOrderRepository;
pub use self::diesel_recovery_repository::DieselRecoveryRepository;
pub use self::diesel_user_repository::DieselUserRepository;
pub use self::migrations::{MigrationError, run_pending_migrations};
pub use self::pool::{DbPool, PoolConfig, PoolError};
