//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on driving
//! ports, so they stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, AccountQuery, CatalogueAdminCommand, CatalogueRepository, CheckoutCommand,
    OrderRepository, PasswordHasher, PaymentGateway, RecoveryCommand, RecoveryQuery,
    RecoveryRepository, StorefrontQuery, UserRepository,
};
use crate::domain::{AccountService, CatalogueService, CheckoutService, RecoveryService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub accounts_query: Arc<dyn AccountQuery>,
    pub storefront: Arc<dyn StorefrontQuery>,
    pub catalogue_admin: Arc<dyn CatalogueAdminCommand>,
    pub recovery: Arc<dyn RecoveryCommand>,
    pub recovery_query: Arc<dyn RecoveryQuery>,
    pub checkout: Arc<dyn CheckoutCommand>,
}

/// Driven adapters the domain services are built over.
pub struct DrivenAdapters<C, R, O, U, G: ?Sized, H> {
    pub catalogue: Arc<C>,
    pub recovery: Arc<R>,
    pub orders: Arc<O>,
    pub users: Arc<U>,
    pub gateway: Arc<G>,
    pub hasher: Arc<H>,
}

impl HttpState {
    /// Wire the domain services over a set of driven adapters.
    pub fn from_adapters<C, R, O, U, G, H>(adapters: DrivenAdapters<C, R, O, U, G, H>) -> Self
    where
        C: CatalogueRepository + 'static,
        R: RecoveryRepository + 'static,
        O: OrderRepository + 'static,
        U: UserRepository + 'static,
        G: PaymentGateway + ?Sized + 'static,
        H: PasswordHasher + 'static,
    {
        let DrivenAdapters {
            catalogue,
            recovery,
            orders,
            users,
            gateway,
            hasher,
        } = adapters;
        let accounts = Arc::new(AccountService::new(users, hasher));
        let storefront = Arc::new(CatalogueService::new(catalogue, Arc::clone(&orders)));
        let recovery = Arc::new(RecoveryService::new(recovery));
        let checkout = Arc::new(CheckoutService::new(gateway, orders));
        Self {
            accounts: accounts.clone(),
            accounts_query: accounts,
            storefront: storefront.clone(),
            catalogue_admin: storefront,
            recovery: recovery.clone(),
            recovery_query: recovery,
            checkout,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Mock-backed state for handler tests.

    use super::*;
    use crate::domain::ports::{
        MockAccountCommand, MockAccountQuery, MockCatalogueAdminCommand, MockCheckoutCommand,
        MockRecoveryCommand, MockRecoveryQuery, MockStorefrontQuery,
    };

    /// Mocks with no expectations; tests set only what the handler calls.
    #[derive(Default)]
    pub(crate) struct MockPorts {
        pub accounts: MockAccountCommand,
        pub accounts_query: MockAccountQuery,
        pub storefront: MockStorefrontQuery,
        pub catalogue_admin: MockCatalogueAdminCommand,
        pub recovery: MockRecoveryCommand,
        pub recovery_query: MockRecoveryQuery,
        pub checkout: MockCheckoutCommand,
    }

    impl From<MockPorts> for HttpState {
        fn from(ports: MockPorts) -> Self {
            Self {
                accounts: Arc::new(ports.accounts),
                accounts_query: Arc::new(ports.accounts_query),
                storefront: Arc::new(ports.storefront),
                catalogue_admin: Arc::new(ports.catalogue_admin),
                recovery: Arc::new(ports.recovery),
                recovery_query: Arc::new(ports.recovery_query),
                checkout: Arc::new(ports.checkout),
            }
        }
    }
}
