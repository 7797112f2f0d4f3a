//! PostgreSQL-backed `OrderRepository`.
//!
//! `place` checks every cart item exists and is not retired, then inserts the order and its
//! lines in one transaction. The unique index on `payment_reference` turns
//! a second commit for the same payment into `DuplicateReference`.

use std::collections::BTreeSet;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;

use crate::domain::ports::{OrderRepository, OrderRepositoryError};
use crate::domain::{CatalogueItemId, NewOrder, OrderId, OrderSummary, PaymentReference, UserId};

use super::diesel_error_mapping::{DieselFailure, classify, map_basic};
use super::models::{NewOrderItemRow, NewOrderRow, OrderRow};
use super::pool::{DbPool, PoolError};
use super::schema::{catalogue_items, order_items, orders};

/// Diesel implementation of the order ledger.
#[derive(Clone)]
pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> OrderRepositoryError {
    OrderRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> OrderRepositoryError {
    map_basic(
        classify(error),
        OrderRepositoryError::connection,
        OrderRepositoryError::query,
    )
}

#[derive(Debug)]
enum PlaceFailure {
    UnknownItem(i32),
    Diesel(diesel::result::Error),
}

impl From<diesel::result::Error> for PlaceFailure {
    fn from(value: diesel::result::Error) -> Self {
        Self::Diesel(value)
    }
}

/// First requested id absent from `found`.
fn first_missing(requested: &[CatalogueItemId], found: &BTreeSet<i32>) -> Option<i32> {
    requested
        .iter()
        .map(|id| id.get())
        .find(|id| !found.contains(id))
}

#[async_trait]
impl OrderRepository for DieselOrderRepository {
    async fn place(&self, order: NewOrder) -> Result<OrderId, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let reference = order.payment_reference.to_string();

        let outcome = conn
            .transaction::<i32, PlaceFailure, _>(|conn| {
                async move {
                    let requested = order.cart.item_ids();
                    let raw_ids: Vec<i32> = requested.iter().map(|id| id.get()).collect();
                    let found: BTreeSet<i32> = catalogue_items::table
                        .filter(catalogue_items::id.eq_any(raw_ids))
                        .filter(catalogue_items::retired_at.is_null())
                        .select(catalogue_items::id)
                        .load::<i32>(conn)
                        .await?
                        .into_iter()
                        .collect();
                    if let Some(missing) = first_missing(&requested, &found) {
                        return Err(PlaceFailure::UnknownItem(missing));
                    }

                    let order_id: i32 = diesel::insert_into(orders::table)
                        .values(NewOrderRow {
                            user_id: order.user_id.get(),
                            total: order.total,
                            payment_reference: order.payment_reference.as_ref(),
                        })
                        .returning(orders::id)
                        .get_result(conn)
                        .await?;

                    let lines: Vec<NewOrderItemRow> = order
                        .cart
                        .lines()
                        .iter()
                        .map(|line| NewOrderItemRow {
                            order_id,
                            catalogue_item_id: line.item_id.get(),
                            quantity: line.quantity,
                        })
                        .collect();
                    diesel::insert_into(order_items::table)
                        .values(&lines)
                        .execute(conn)
                        .await?;

                    Ok(order_id)
                }
                .scope_boxed()
            })
            .await;

        match outcome {
            Ok(id) => Ok(OrderId::new(id)),
            Err(PlaceFailure::UnknownItem(id)) => Err(OrderRepositoryError::unknown_item(id)),
            Err(PlaceFailure::Diesel(error)) => Err(match classify(error) {
                DieselFailure::UniqueViolation { .. } => {
                    OrderRepositoryError::duplicate_reference(reference)
                }
                other => map_basic(
                    other,
                    OrderRepositoryError::connection,
                    OrderRepositoryError::query,
                ),
            }),
        }
    }

    async fn find_by_reference(
        &self,
        reference: &PaymentReference,
    ) -> Result<Option<OrderSummary>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<OrderRow> = orders::table
            .filter(orders::payment_reference.eq(reference.as_ref()))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(|row| OrderSummary {
            id: OrderId::new(row.id),
            user_id: UserId::new(row.user_id),
        }))
    }

    async fn owned_item_ids(
        &self,
        user_id: UserId,
    ) -> Result<Vec<CatalogueItemId>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let ids: Vec<i32> = order_items::table
            .inner_join(orders::table)
            .filter(orders::user_id.eq(user_id.get()))
            .select(order_items::catalogue_item_id)
            .distinct()
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(ids.into_iter().map(CatalogueItemId::new).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[1, 2, 3], &[1, 2, 3], None)]
    #[case(&[1, 2, 3], &[1, 3], Some(2))]
    #[case(&[4], &[], Some(4))]
    fn first_missing_reports_the_lowest_gap(
        #[case] requested: &[i32],
        #[case] found: &[i32],
        #[case] expected: Option<i32>,
    ) {
        let requested: Vec<CatalogueItemId> =
            requested.iter().copied().map(CatalogueItemId::new).collect();
        let found: BTreeSet<i32> = found.iter().copied().collect();

        assert_eq!(first_missing(&requested, &found), expected);
    }
}
