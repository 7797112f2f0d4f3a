//! Internal Diesel row structs.
//!
//! Rows never leave the persistence layer. Each read row decodes into its
//! domain type through `into_domain`, re-running the domain validation so
//! hand-edited rows surface as query errors instead of leaking through.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;

use crate::domain::{
    BookingCode, CatalogueItem, CatalogueItemId, DisplayName, EmailAddress, PasswordHash,
    RecoveryItem, RecoveryItemId, RecoveryStatus, Role, User, UserId,
};

use super::schema::{catalogue_items, order_items, orders, recovery_items, users};

/// Stored row failed domain validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{table} row {id} is invalid: {reason}")]
pub(crate) struct RowDecodeError {
    table: &'static str,
    id: i32,
    reason: String,
}

impl RowDecodeError {
    fn new(table: &'static str, id: i32, reason: impl ToString) -> Self {
        Self {
            table,
            id,
            reason: reason.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
}

impl UserRow {
    pub(crate) fn into_domain(self) -> Result<(User, PasswordHash), RowDecodeError> {
        let decode = |reason: crate::domain::UserValidationError| {
            RowDecodeError::new("users", self.id, reason)
        };
        let user = User {
            id: UserId::new(self.id),
            name: DisplayName::parse(&self.name).map_err(decode)?,
            email: EmailAddress::parse(&self.email).map_err(decode)?,
            role: self.role.parse::<Role>().map_err(decode)?,
            is_active: self.is_active,
        };
        Ok((user, PasswordHash::new(self.password_hash)))
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
}

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = catalogue_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CatalogueItemRow {
    pub id: i32,
    pub title: String,
    pub booking_code: String,
    pub price: Decimal,
    pub league: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl CatalogueItemRow {
    pub(crate) fn into_domain(self) -> Result<CatalogueItem, RowDecodeError> {
        let booking_code = BookingCode::parse(&self.booking_code)
            .map_err(|err| RowDecodeError::new("catalogue_items", self.id, err))?;
        Ok(CatalogueItem {
            id: CatalogueItemId::new(self.id),
            title: self.title,
            booking_code,
            price: self.price,
            league: self.league,
            description: self.description,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = catalogue_items)]
pub(crate) struct NewCatalogueItemRow<'a> {
    pub title: &'a str,
    pub booking_code: &'a str,
    pub price: Decimal,
    pub league: &'a str,
    pub description: &'a str,
    /// `None` takes the column default.
    pub created_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Recovery staging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = recovery_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecoveryItemRow {
    pub id: i32,
    pub title: String,
    pub booking_code: String,
    pub price: Decimal,
    pub league: String,
    pub description: String,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

impl RecoveryItemRow {
    pub(crate) fn into_domain(self) -> Result<RecoveryItem, RowDecodeError> {
        let booking_code = BookingCode::parse(&self.booking_code)
            .map_err(|err| RowDecodeError::new("recovery_items", self.id, err))?;
        Ok(RecoveryItem {
            id: RecoveryItemId::new(self.id),
            title: self.title,
            booking_code,
            price: self.price,
            league: self.league,
            description: self.description,
            status: RecoveryStatus::from_approved(self.approved),
            created_at: self.created_at,
        })
    }

    /// Catalogue insert carrying this row's content across on import.
    pub(crate) fn as_catalogue_insert(&self) -> NewCatalogueItemRow<'_> {
        NewCatalogueItemRow {
            title: &self.title,
            booking_code: &self.booking_code,
            price: self.price,
            league: &self.league,
            description: &self.description,
            created_at: Some(self.created_at),
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recovery_items)]
pub(crate) struct NewRecoveryItemRow<'a> {
    pub title: &'a str,
    pub booking_code: &'a str,
    pub price: Decimal,
    pub league: &'a str,
    pub description: &'a str,
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrderRow {
    pub id: i32,
    pub user_id: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = orders)]
pub(crate) struct NewOrderRow<'a> {
    pub user_id: i32,
    pub total: Decimal,
    pub payment_reference: &'a str,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = order_items)]
pub(crate) struct NewOrderItemRow {
    pub order_id: i32,
    pub catalogue_item_id: i32,
    pub quantity: i32,
}
