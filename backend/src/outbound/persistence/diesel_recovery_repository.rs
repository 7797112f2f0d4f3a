//! PostgreSQL-backed `RecoveryRepository`.
//!
//! `import` runs in one transaction: the staging row is read with
//! `FOR UPDATE`, its approval re-checked, the catalogue row inserted and the
//! staging row deleted. Two concurrent imports of the same id serialise on
//! the row lock; the loser sees the row gone and reports `NotFound`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;

use crate::domain::ports::{RecoveryRepository, RecoveryRepositoryError};
use crate::domain::{CatalogueItem, NewRecoveryItem, RecoveryItem, RecoveryItemId};

use super::diesel_error_mapping::{DieselFailure, classify, map_basic};
use super::models::{CatalogueItemRow, NewRecoveryItemRow, RecoveryItemRow};
use super::pool::{DbPool, PoolError};
use super::schema::{catalogue_items, recovery_items};

/// Diesel implementation of the recovery staging store.
#[derive(Clone)]
pub struct DieselRecoveryRepository {
    pool: DbPool,
}

impl DieselRecoveryRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn load(
        &self,
        approved_only: bool,
    ) -> Result<Vec<RecoveryItem>, RecoveryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = recovery_items::table
            .select(RecoveryItemRow::as_select())
            .order_by((recovery_items::created_at.desc(), recovery_items::id.desc()))
            .into_boxed();
        if approved_only {
            query = query.filter(recovery_items::approved.eq(true));
        }

        let rows: Vec<RecoveryItemRow> =
            query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter().map(decode).collect()
    }
}

fn map_pool_error(error: PoolError) -> RecoveryRepositoryError {
    RecoveryRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> RecoveryRepositoryError {
    map_basic(
        classify(error),
        RecoveryRepositoryError::connection,
        RecoveryRepositoryError::query,
    )
}

fn decode(row: RecoveryItemRow) -> Result<RecoveryItem, RecoveryRepositoryError> {
    row.into_domain()
        .map_err(|err| RecoveryRepositoryError::query(err.to_string()))
}

/// Failure inside the import transaction.
///
/// Diesel needs an error type convertible from its own to roll back, so
/// domain outcomes travel through this enum and are mapped afterwards.
#[derive(Debug)]
enum ImportFailure {
    Missing,
    Unapproved,
    Diesel(diesel::result::Error),
}

impl From<diesel::result::Error> for ImportFailure {
    fn from(value: diesel::result::Error) -> Self {
        Self::Diesel(value)
    }
}

#[async_trait]
impl RecoveryRepository for DieselRecoveryRepository {
    async fn list_all(&self) -> Result<Vec<RecoveryItem>, RecoveryRepositoryError> {
        self.load(false).await
    }

    async fn list_approved(&self) -> Result<Vec<RecoveryItem>, RecoveryRepositoryError> {
        self.load(true).await
    }

    async fn create(&self, item: NewRecoveryItem) -> Result<RecoveryItem, RecoveryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewRecoveryItemRow {
            title: &item.title,
            booking_code: item.booking_code.as_ref(),
            price: item.price,
            league: &item.league,
            description: &item.description,
        };

        let stored: RecoveryItemRow = diesel::insert_into(recovery_items::table)
            .values(&row)
            .returning(RecoveryItemRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        decode(stored)
    }

    async fn approve(&self, id: RecoveryItemId) -> Result<RecoveryItem, RecoveryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated: Option<RecoveryItemRow> =
            diesel::update(recovery_items::table.find(id.get()))
                .set(recovery_items::approved.eq(true))
                .returning(RecoveryItemRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?;

        match updated {
            Some(row) => decode(row),
            None => Err(RecoveryRepositoryError::not_found(id.get())),
        }
    }

    async fn delete(&self, id: RecoveryItemId) -> Result<(), RecoveryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed = diesel::delete(recovery_items::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if removed == 0 {
            return Err(RecoveryRepositoryError::not_found(id.get()));
        }
        Ok(())
    }

    async fn import(&self, id: RecoveryItemId) -> Result<CatalogueItem, RecoveryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let raw_id = id.get();

        let outcome = conn
            .transaction::<CatalogueItemRow, ImportFailure, _>(|conn| {
                async move {
                    let staged: RecoveryItemRow = recovery_items::table
                        .find(raw_id)
                        .select(RecoveryItemRow::as_select())
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?
                        .ok_or(ImportFailure::Missing)?;

                    if !staged.approved {
                        return Err(ImportFailure::Unapproved);
                    }

                    let published: CatalogueItemRow =
                        diesel::insert_into(catalogue_items::table)
                            .values(staged.as_catalogue_insert())
                            .returning(CatalogueItemRow::as_returning())
                            .get_result(conn)
                            .await?;

                    diesel::delete(recovery_items::table.find(raw_id))
                        .execute(conn)
                        .await?;

                    Ok(published)
                }
                .scope_boxed()
            })
            .await;

        match outcome {
            Ok(row) => row
                .into_domain()
                .map_err(|err| RecoveryRepositoryError::query(err.to_string())),
            Err(ImportFailure::Missing) => Err(RecoveryRepositoryError::not_found(raw_id)),
            Err(ImportFailure::Unapproved) => Err(RecoveryRepositoryError::not_approved(raw_id)),
            Err(ImportFailure::Diesel(error)) => Err(match classify(error) {
                DieselFailure::NotFound => RecoveryRepositoryError::not_found(raw_id),
                other => map_basic(
                    other,
                    RecoveryRepositoryError::connection,
                    RecoveryRepositoryError::query,
                ),
            }),
        }
    }
}
