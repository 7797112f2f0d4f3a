//! PostgreSQL-backed `CatalogueRepository`.
//!
//! Deleting an item stamps `retired_at` instead of removing the row, so
//! order lines that reference it stay intact.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CatalogueRepository, CatalogueRepositoryError};
use crate::domain::{CatalogueItem, CatalogueItemId, NewCatalogueItem};

use super::diesel_error_mapping::{classify, map_basic};
use super::models::{CatalogueItemRow, NewCatalogueItemRow};
use super::pool::{DbPool, PoolError};
use super::schema::catalogue_items;

/// Diesel implementation of the catalogue store.
#[derive(Clone)]
pub struct DieselCatalogueRepository {
    pool: DbPool,
}

impl DieselCatalogueRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CatalogueRepositoryError {
    CatalogueRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> CatalogueRepositoryError {
    map_basic(
        classify(error),
        CatalogueRepositoryError::connection,
        CatalogueRepositoryError::query,
    )
}

fn decode(row: CatalogueItemRow) -> Result<CatalogueItem, CatalogueRepositoryError> {
    row.into_domain()
        .map_err(|err| CatalogueRepositoryError::query(err.to_string()))
}

#[async_trait]
impl CatalogueRepository for DieselCatalogueRepository {
    async fn list_newest_first(&self) -> Result<Vec<CatalogueItem>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<CatalogueItemRow> = catalogue_items::table
            .filter(catalogue_items::retired_at.is_null())
            .select(CatalogueItemRow::as_select())
            .order_by((catalogue_items::created_at.desc(), catalogue_items::id.desc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(decode).collect()
    }

    async fn create(
        &self,
        item: NewCatalogueItem,
    ) -> Result<CatalogueItem, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewCatalogueItemRow {
            title: &item.title,
            booking_code: item.booking_code.as_ref(),
            price: item.price,
            league: &item.league,
            description: &item.description,
            created_at: None,
        };

        let stored: CatalogueItemRow = diesel::insert_into(catalogue_items::table)
            .values(&row)
            .returning(CatalogueItemRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        decode(stored)
    }

    async fn delete(&self, id: CatalogueItemId) -> Result<(), CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed = diesel::update(
            catalogue_items::table
                .find(id.get())
                .filter(catalogue_items::retired_at.is_null()),
        )
        .set(catalogue_items::retired_at.eq(Some(Utc::now())))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        if removed == 0 {
            return Err(CatalogueRepositoryError::not_found(id.get()));
        }
        Ok(())
    }
}
