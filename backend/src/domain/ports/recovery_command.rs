//! Driving ports for the recovery lifecycle.

use async_trait::async_trait;

use crate::domain::{Caller, Error, RecoveryAction, RecoveryListing, RecoveryOutcome};

/// Admin transitions over staged recovery items.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecoveryCommand: Send + Sync {
    /// Apply one transition. Non-admin callers are refused with `Forbidden`
    /// before storage is touched.
    async fn apply(&self, caller: Caller, action: RecoveryAction) -> Result<RecoveryOutcome, Error>;
}

/// Role-shaped view of the staging table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecoveryQuery: Send + Sync {
    /// Full rows for admins; approved previews for everyone else. Empty when
    /// storage is unavailable.
    async fn list(&self, caller: Caller) -> RecoveryListing;
}
