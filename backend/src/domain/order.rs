//! Order ledger types and the cart snapshot submitted at checkout.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{CatalogueItemId, PaymentReference, UserId};

/// Validation errors for a submitted cart.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderValidationError {
    /// The cart had no lines.
    #[error("cart must contain at least one item")]
    EmptyCart,
    /// A line's quantity was below one.
    #[error("quantity for item {item_id} must be at least 1")]
    InvalidQuantity {
        /// Offending item.
        item_id: i32,
    },
    /// The submitted total was negative.
    #[error("order total must not be negative")]
    NegativeTotal,
}

/// Database-generated order identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct OrderId(i32);

impl OrderId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLine {
    /// Referenced catalogue item.
    pub item_id: CatalogueItemId,
    /// Quantity, at least one.
    pub quantity: i32,
}

/// Non-empty cart snapshot with positive quantities.
///
/// # Examples
/// ```
/// use storefront::domain::{Cart, CatalogueItemId};
///
/// let cart = Cart::try_from_pairs([(1, 2), (2, 1)]).unwrap();
/// assert_eq!(cart.lines().len(), 2);
/// assert_eq!(cart.lines()[0].item_id, CatalogueItemId::new(1));
/// assert!(Cart::try_from_pairs([(1, 0)]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart(Vec<CartLine>);

impl Cart {
    /// Validate `(item_id, quantity)` pairs.
    pub fn try_from_pairs(
        pairs: impl IntoIterator<Item = (i32, i32)>,
    ) -> Result<Self, OrderValidationError> {
        let lines = pairs
            .into_iter()
            .map(|(item_id, quantity)| {
                if quantity < 1 {
                    return Err(OrderValidationError::InvalidQuantity { item_id });
                }
                Ok(CartLine {
                    item_id: CatalogueItemId::new(item_id),
                    quantity,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if lines.is_empty() {
            return Err(OrderValidationError::EmptyCart);
        }
        Ok(Self(lines))
    }

    /// Lines in submission order.
    pub fn lines(&self) -> &[CartLine] {
        &self.0
    }

    /// Distinct item identifiers referenced by the cart.
    pub fn item_ids(&self) -> Vec<CatalogueItemId> {
        let mut ids: Vec<_> = self.0.iter().map(|line| line.item_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

/// Checkout request as submitted by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    /// Cart snapshot.
    pub cart: Cart,
    /// Client-computed total in major units.
    pub total: Decimal,
}

impl OrderRequest {
    /// Validate the client total alongside an already validated cart.
    pub fn try_new(cart: Cart, total: Decimal) -> Result<Self, OrderValidationError> {
        if total < Decimal::ZERO {
            return Err(OrderValidationError::NegativeTotal);
        }
        Ok(Self { cart, total })
    }
}

/// Order ready to be written to the ledger in one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    /// Owner.
    pub user_id: UserId,
    /// Client-submitted total, confirmed against the provider amount.
    pub total: Decimal,
    /// Provider reference; unique across orders.
    pub payment_reference: PaymentReference,
    /// Lines to insert as order items.
    pub cart: Cart,
}

/// Ledger entry found for a payment reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSummary {
    /// Order identifier.
    pub id: OrderId,
    /// Owner.
    pub user_id: UserId,
}

/// Result of committing an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOrder {
    /// Order identifier.
    #[schema(value_type = i32, example = 31)]
    pub order_id: OrderId,
    /// Whether the order already existed for this payment reference.
    pub replayed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn empty_cart_is_rejected() {
        assert_eq!(
            Cart::try_from_pairs(std::iter::empty()),
            Err(OrderValidationError::EmptyCart)
        );
    }

    #[rstest]
    #[case(0)]
    #[case(-3)]
    fn non_positive_quantities_are_rejected(#[case] quantity: i32) {
        assert_eq!(
            Cart::try_from_pairs([(1, 1), (9, quantity)]),
            Err(OrderValidationError::InvalidQuantity { item_id: 9 })
        );
    }

    #[rstest]
    fn item_ids_are_distinct_and_sorted() {
        let cart = Cart::try_from_pairs([(5, 1), (2, 3), (5, 2)]).expect("valid cart");
        assert_eq!(
            cart.item_ids(),
            vec![CatalogueItemId::new(2), CatalogueItemId::new(5)]
        );
        assert_eq!(cart.lines().len(), 3);
    }

    #[rstest]
    fn negative_total_is_rejected() {
        let cart = Cart::try_from_pairs([(1, 1)]).expect("valid cart");
        assert_eq!(
            OrderRequest::try_new(cart, Decimal::new(-1, 2)),
            Err(OrderValidationError::NegativeTotal)
        );
    }
}
