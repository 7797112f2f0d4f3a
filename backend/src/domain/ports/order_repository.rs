//! Driven port for the order ledger.

use async_trait::async_trait;

use crate::domain::{CatalogueItemId, NewOrder, OrderId, OrderSummary, PaymentReference, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by order repository adapters.
    pub enum OrderRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "order repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "order repository query failed: {message}",
        /// A cart line referenced a catalogue item that is absent or withdrawn.
        UnknownItem { id: i32 } => "catalogue item {id} not found",
        /// An order already exists for the payment reference.
        DuplicateReference { reference: String } => "payment reference {reference} already used",
    }
}

/// Persistence contract for orders and their line items.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Insert the order and one item row per cart line in one transaction.
    ///
    /// Nothing is written when any line fails.
    async fn place(&self, order: NewOrder) -> Result<OrderId, OrderRepositoryError>;

    /// Order previously committed for a payment reference.
    async fn find_by_reference(
        &self,
        reference: &PaymentReference,
    ) -> Result<Option<OrderSummary>, OrderRepositoryError>;

    /// Distinct catalogue items appearing in any of the user's orders.
    async fn owned_item_ids(
        &self,
        user_id: UserId,
    ) -> Result<Vec<CatalogueItemId>, OrderRepositoryError>;
}
