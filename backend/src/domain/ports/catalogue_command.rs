//! Driving ports for the storefront listing and catalogue administration.

use async_trait::async_trait;

use crate::domain::{Caller, CatalogueItem, CatalogueItemId, Error, NewCatalogueItem, StorefrontItem};

/// Identity-aware storefront listing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorefrontQuery: Send + Sync {
    /// Catalogue newest first, with ownership derived for `caller`.
    ///
    /// Degrades to an empty list when storage is unavailable.
    async fn list_items(&self, caller: Caller) -> Vec<StorefrontItem>;
}

/// Admin-only catalogue maintenance.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueAdminCommand: Send + Sync {
    /// Every item with booking codes; empty when storage is unavailable.
    async fn list(&self, caller: Caller) -> Result<Vec<CatalogueItem>, Error>;

    /// Insert a validated item.
    async fn add(&self, caller: Caller, item: NewCatalogueItem) -> Result<CatalogueItem, Error>;

    /// Remove an item; `NotFound` if absent.
    async fn delete(&self, caller: Caller, id: CatalogueItemId) -> Result<(), Error>;
}
