//! Recovery staging: candidate catalogue items awaiting admin curation.
//!
//! A staged item starts [`RecoveryStatus::Pending`], becomes
//! [`RecoveryStatus::Approved`] through an explicit admin action, and leaves
//! staging either by being imported into the catalogue or by being deleted.
//! Both exits remove the row, so the terminal states are represented by the
//! row's absence rather than by a status value.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{BookingCode, CatalogueItem, CatalogueItemId, DEFAULT_LEAGUE};

/// Database-generated staging identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct RecoveryItemId(i32);

impl RecoveryItemId {
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

impl fmt::Display for RecoveryItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Curation state of a staged item that is still present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryStatus {
    /// Awaiting admin review; never shown to non-admins.
    Pending,
    /// Vetted and visible; eligible for import.
    Approved,
}

impl RecoveryStatus {
    /// Map the stored `approved` flag onto the status tag.
    #[must_use]
    pub const fn from_approved(approved: bool) -> Self {
        if approved { Self::Approved } else { Self::Pending }
    }

    /// Stored flag for this status.
    #[must_use]
    pub const fn is_approved(self) -> bool {
        matches!(self, Self::Approved)
    }
}

/// Staged recovery row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryItem {
    /// Identifier.
    #[schema(value_type = i32, example = 4)]
    pub id: RecoveryItemId,
    /// Title carried into the catalogue on import.
    pub title: String,
    /// Staged booking code.
    #[schema(value_type = String, example = "X7K2P")]
    pub booking_code: BookingCode,
    /// Price carried into the catalogue on import.
    #[schema(value_type = f64, example = 0.0)]
    pub price: Decimal,
    /// League or grouping label.
    pub league: String,
    /// Free-form description.
    pub description: String,
    /// Curation state.
    pub status: RecoveryStatus,
    /// Staging timestamp, preserved on import.
    pub created_at: DateTime<Utc>,
}

/// Staging row awaiting insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecoveryItem {
    /// Title shown to admins and, once approved, to shoppers.
    pub title: String,
    /// Staged booking code.
    pub booking_code: BookingCode,
    /// Price carried into the catalogue on import.
    pub price: Decimal,
    /// League or grouping label.
    pub league: String,
    /// Free-form description.
    pub description: String,
}

impl NewRecoveryItem {
    /// Stage a bare booking code with the default title, league and a zero
    /// price.
    #[must_use]
    pub fn from_booking_code(booking_code: BookingCode) -> Self {
        Self {
            title: booking_code.default_title(),
            booking_code,
            price: Decimal::ZERO,
            league: DEFAULT_LEAGUE.to_owned(),
            description: String::new(),
        }
    }
}

/// Restricted view of an approved item for non-admin callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryPreview {
    /// Identifier.
    #[schema(value_type = i32, example = 4)]
    pub id: RecoveryItemId,
    /// Title.
    pub title: String,
}

impl From<RecoveryItem> for RecoveryPreview {
    fn from(value: RecoveryItem) -> Self {
        Self {
            id: value.id,
            title: value.title,
        }
    }
}

/// Recovery listing shaped by the caller's role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryListing {
    /// Every staged row with full detail (admins).
    Full(Vec<RecoveryItem>),
    /// Approved rows only, title-only (everyone else).
    Preview(Vec<RecoveryPreview>),
}

impl RecoveryListing {
    /// Number of rows in the listing.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Full(items) => items.len(),
            Self::Preview(items) => items.len(),
        }
    }

    /// Whether the listing is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Admin transition requested on the staging table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Stage a raw booking code as a new pending item.
    Add {
        /// Caller-supplied code, validated by the manager.
        booking_code: String,
    },
    /// Mark a pending item approved.
    Approve {
        /// Target row.
        id: RecoveryItemId,
    },
    /// Move an approved item into the catalogue.
    Import {
        /// Target row.
        id: RecoveryItemId,
    },
    /// Drop a staged item without importing it.
    Delete {
        /// Target row.
        id: RecoveryItemId,
    },
}

/// Result of a successful [`RecoveryAction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryOutcome {
    /// A pending row was created.
    Added(RecoveryItem),
    /// The row is now approved.
    Approved(RecoveryItem),
    /// The row moved into the catalogue.
    Imported {
        /// Staging identifier that no longer resolves.
        recovery_id: RecoveryItemId,
        /// Newly created catalogue row.
        item: CatalogueItem,
    },
    /// The row was removed.
    Deleted(RecoveryItemId),
}

impl RecoveryOutcome {
    /// Short label for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Added(_) => "added",
            Self::Approved(_) => "approved",
            Self::Imported { .. } => "imported",
            Self::Deleted(_) => "deleted",
        }
    }

    /// Identifier the caller should see in the response.
    #[must_use]
    pub fn subject_id(&self) -> i32 {
        match self {
            Self::Added(item) | Self::Approved(item) => item.id.get(),
            Self::Imported { recovery_id, .. } => recovery_id.get(),
            Self::Deleted(id) => id.get(),
        }
    }

    /// Catalogue identifier created by an import.
    #[must_use]
    pub fn catalogue_id(&self) -> Option<CatalogueItemId> {
        match self {
            Self::Imported { item, .. } => Some(item.id),
            _ => None,
        }
    }
}
