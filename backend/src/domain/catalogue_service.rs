//! Storefront listing and catalogue administration.
//!
//! Ownership is derived on every read from the order ledger; nothing about
//! purchases is stored on catalogue rows.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{error, info, warn};

use crate::domain::ports::{
    CatalogueAdminCommand, CatalogueRepository, CatalogueRepositoryError, OrderRepository,
    StorefrontQuery,
};
use crate::domain::{
    Caller, CatalogueItem, CatalogueItemId, Error, NewCatalogueItem, StorefrontItem,
    require_admin,
};

/// Catalogue service implementing [`StorefrontQuery`] and
/// [`CatalogueAdminCommand`].
#[derive(Clone)]
pub struct CatalogueService<C, O> {
    catalogue: Arc<C>,
    orders: Arc<O>,
}

impl<C, O> CatalogueService<C, O> {
    /// Create a new service over the catalogue store and order ledger.
    pub fn new(catalogue: Arc<C>, orders: Arc<O>) -> Self {
        Self { catalogue, orders }
    }
}

fn map_catalogue_error(error: CatalogueRepositoryError) -> Error {
    match error {
        CatalogueRepositoryError::Connection { message } => {
            error!(%message, "catalogue repository unavailable");
            Error::service_unavailable("catalogue store is temporarily unavailable")
        }
        CatalogueRepositoryError::Query { message } => {
            error!(%message, "catalogue repository query failed");
            Error::internal("catalogue store query failed")
        }
        CatalogueRepositoryError::NotFound { id } => {
            Error::not_found("Catalogue item not found").with_details(json!({ "id": id }))
        }
    }
}

impl<C, O> CatalogueService<C, O>
where
    C: CatalogueRepository,
    O: OrderRepository,
{
    async fn owned_by(&self, caller: &Caller) -> HashSet<CatalogueItemId> {
        let Some(identity) = caller.identity() else {
            return HashSet::new();
        };
        match self.orders.owned_item_ids(identity.user_id).await {
            Ok(ids) => ids.into_iter().collect(),
            Err(err) => {
                warn!(error = %err, user = %identity.user_id, "ownership lookup failed; treating nothing as owned");
                HashSet::new()
            }
        }
    }
}

#[async_trait]
impl<C, O> StorefrontQuery for CatalogueService<C, O>
where
    C: CatalogueRepository,
    O: OrderRepository,
{
    async fn list_items(&self, caller: Caller) -> Vec<StorefrontItem> {
        let items = match self.catalogue.list_newest_first().await {
            Ok(items) => items,
            Err(err) => {
                warn!(error = %err, "storefront listing degraded to empty");
                return Vec::new();
            }
        };

        if caller.is_admin() {
            return items
                .into_iter()
                .map(|item| StorefrontItem::project(item, true, true))
                .collect();
        }

        let owned = self.owned_by(&caller).await;
        items
            .into_iter()
            .map(|item| {
                let is_owned = owned.contains(&item.id);
                StorefrontItem::project(item, is_owned, is_owned)
            })
            .collect()
    }
}

#[async_trait]
impl<C, O> CatalogueAdminCommand for CatalogueService<C, O>
where
    C: CatalogueRepository,
    O: OrderRepository,
{
    async fn list(&self, caller: Caller) -> Result<Vec<CatalogueItem>, Error> {
        require_admin(&caller)?;
        match self.catalogue.list_newest_first().await {
            Ok(items) => Ok(items),
            Err(err) => {
                warn!(error = %err, "admin catalogue listing degraded to empty");
                Ok(Vec::new())
            }
        }
    }

    async fn add(&self, caller: Caller, item: NewCatalogueItem) -> Result<CatalogueItem, Error> {
        let admin = require_admin(&caller)?;
        let created = self
            .catalogue
            .create(item)
            .await
            .map_err(map_catalogue_error)?;
        info!(admin = %admin.user_id, item = %created.id, "catalogue item added");
        Ok(created)
    }

    async fn delete(&self, caller: Caller, id: CatalogueItemId) -> Result<(), Error> {
        let admin = require_admin(&caller)?;
        self.catalogue.delete(id).await.map_err(map_catalogue_error)?;
        info!(admin = %admin.user_id, item = %id, "catalogue item deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "catalogue_service_tests.rs"]
mod tests;
