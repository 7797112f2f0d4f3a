//! Driven port for the catalogue store.

use async_trait::async_trait;

use crate::domain::{CatalogueItem, CatalogueItemId, NewCatalogueItem};

use super::define_port_error;

define_port_error! {
    /// Errors raised by catalogue repository adapters.
    pub enum CatalogueRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "catalogue repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "catalogue repository query failed: {message}",
        /// No row matched the identifier.
        NotFound { id: i32 } => "catalogue item {id} not found",
    }
}

/// Persistence contract for catalogue items.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueRepository: Send + Sync {
    /// Every live catalogue item, newest first.
    async fn list_newest_first(&self) -> Result<Vec<CatalogueItem>, CatalogueRepositoryError>;

    /// Insert an item and return the stored row.
    async fn create(
        &self,
        item: NewCatalogueItem,
    ) -> Result<CatalogueItem, CatalogueRepositoryError>;

    /// Withdraw an item from sale; [`CatalogueRepositoryError::NotFound`]
    /// if absent or already withdrawn. Orders referencing it are untouched.
    async fn delete(&self, id: CatalogueItemId) -> Result<(), CatalogueRepositoryError>;
}
