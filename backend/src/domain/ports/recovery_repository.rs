//! Driven port for the recovery staging store.
//!
//! Adapters own the atomicity of [`RecoveryRepository::import`]: the
//! staging row is locked and re-read, the catalogue row inserted and the
//! staging row deleted inside one transaction.

use async_trait::async_trait;

use crate::domain::{
    CatalogueItem, NewRecoveryItem, RecoveryItem, RecoveryItemId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by recovery repository adapters.
    pub enum RecoveryRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "recovery repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "recovery repository query failed: {message}",
        /// No staging row matched the identifier.
        NotFound { id: i32 } => "recovery item {id} not found",
        /// The staging row is still pending.
        NotApproved { id: i32 } => "recovery item {id} is not approved",
    }
}

/// Persistence contract for staged recovery items.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecoveryRepository: Send + Sync {
    /// Every staged row, newest first.
    async fn list_all(&self) -> Result<Vec<RecoveryItem>, RecoveryRepositoryError>;

    /// Approved rows only, newest first.
    async fn list_approved(&self) -> Result<Vec<RecoveryItem>, RecoveryRepositoryError>;

    /// Insert a pending row.
    async fn create(&self, item: NewRecoveryItem) -> Result<RecoveryItem, RecoveryRepositoryError>;

    /// Set the approved flag and return the updated row.
    async fn approve(&self, id: RecoveryItemId) -> Result<RecoveryItem, RecoveryRepositoryError>;

    /// Remove a staged row without importing it.
    async fn delete(&self, id: RecoveryItemId) -> Result<(), RecoveryRepositoryError>;

    /// Move an approved row into the catalogue atomically.
    ///
    /// Fails with `NotFound` when the row is absent (including when a prior
    /// import already removed it) and `NotApproved` when it is pending; in
    /// both cases neither table changes.
    async fn import(&self, id: RecoveryItemId) -> Result<CatalogueItem, RecoveryRepositoryError>;
}
