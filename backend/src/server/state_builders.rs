//! Builders wiring driven adapters into the HTTP state.

use std::sync::Arc;

use tracing::warn;

use storefront::inbound::http::state::{DrivenAdapters, HttpState};
use storefront::outbound::Argon2PasswordHasher;
use storefront::outbound::memory::MemoryStore;
use storefront::outbound::persistence::{
    DieselCatalogueRepository, DieselOrderRepository, DieselRecoveryRepository,
    DieselUserRepository,
};

use super::ServerConfig;

/// Build handler state over PostgreSQL when a pool is configured, otherwise
/// over a process-local store.
pub(super) fn build_http_state(config: &ServerConfig) -> HttpState {
    let gateway = Arc::clone(&config.gateway);
    let hasher = Arc::new(Argon2PasswordHasher::default());
    match &config.db_pool {
        Some(pool) => HttpState::from_adapters(DrivenAdapters {
            catalogue: Arc::new(DieselCatalogueRepository::new(pool.clone())),
            recovery: Arc::new(DieselRecoveryRepository::new(pool.clone())),
            orders: Arc::new(DieselOrderRepository::new(pool.clone())),
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            gateway,
            hasher,
        }),
        None => {
            warn!("no database configured; state will not survive a restart");
            let store = Arc::new(MemoryStore::new());
            HttpState::from_adapters(DrivenAdapters {
                catalogue: Arc::clone(&store),
                recovery: Arc::clone(&store),
                orders: Arc::clone(&store),
                users: store,
                gateway,
                hasher,
            })
        }
    }
}
