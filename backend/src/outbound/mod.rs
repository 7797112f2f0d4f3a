//! Outbound adapters implementing the domain's driven ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **paystack**: reqwest client for Paystack transaction verification
//! - **memory**: process-local store and fixture gateway
//!
//! Adapters translate between domain types and infrastructure
//! representations; they contain no business rules.

pub mod argon2_hasher;
pub mod memory;
pub mod paystack;
pub mod persistence;

pub use argon2_hasher::Argon2PasswordHasher;
