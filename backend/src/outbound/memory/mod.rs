//! In-memory adapters used when no database is configured and by the
//! HTTP integration tests.

mod payment_gateway;
mod store;

pub use payment_gateway::FixturePaymentGateway;
pub use store::{MemoryStore, OrderRecord};
