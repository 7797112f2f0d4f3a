//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use storefront::domain::ports::PaymentGateway;
use storefront::inbound::http::session_config::SessionSettings;
use storefront::outbound::paystack::UnconfiguredPaymentGateway;
use storefront::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) gateway: Arc<dyn PaymentGateway>,
}

impl ServerConfig {
    /// Construct a configuration with in-memory storage and no payment
    /// provider.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        Self {
            session,
            bind_addr,
            db_pool: None,
            gateway: Arc::new(UnconfiguredPaymentGateway),
        }
    }

    /// Attach a database connection pool for the persistence adapters.
    ///
    /// Without one the server keeps all state in process memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Use the given gateway for payment verification.
    #[must_use]
    pub fn with_gateway(mut self, gateway: Arc<dyn PaymentGateway>) -> Self {
        self.gateway = gateway;
        self
    }
}
