//! Recovery lifecycle manager.
//!
//! Implements the driving ports over the staging repository. This service is
//! the only place that interprets [`RecoveryStatus`] transitions: admins add,
//! approve, import and delete; everyone else only reads approved previews.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{error, info, warn};

use crate::domain::ports::{
    RecoveryCommand, RecoveryQuery, RecoveryRepository, RecoveryRepositoryError,
};
use crate::domain::{
    BookingCode, Caller, Error, NewRecoveryItem, RecoveryAction, RecoveryListing,
    RecoveryOutcome, RecoveryPreview, RecoveryStatus, require_admin,
};

/// Recovery service implementing [`RecoveryCommand`] and [`RecoveryQuery`].
#[derive(Clone)]
pub struct RecoveryService<R> {
    repo: Arc<R>,
}

impl<R> RecoveryService<R> {
    /// Create a new service over the staging repository.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

fn map_recovery_error(error: RecoveryRepositoryError) -> Error {
    match error {
        RecoveryRepositoryError::Connection { message } => {
            error!(%message, "recovery repository unavailable");
            Error::service_unavailable("recovery store is temporarily unavailable")
        }
        RecoveryRepositoryError::Query { message } => {
            error!(%message, "recovery repository query failed");
            Error::internal("recovery store query failed")
        }
        RecoveryRepositoryError::NotFound { id } => {
            Error::not_found("Recovery item not found").with_details(json!({ "id": id }))
        }
        RecoveryRepositoryError::NotApproved { id } => {
            Error::not_approved("Recovery item not approved").with_details(json!({ "id": id }))
        }
    }
}

fn parse_booking_code(raw: &str) -> Result<BookingCode, Error> {
    BookingCode::parse(raw).map_err(|_| {
        Error::invalid_request("Booking code required").with_details(json!({
            "field": "bookingCode",
            "code": "required",
        }))
    })
}

impl<R> RecoveryService<R>
where
    R: RecoveryRepository,
{
    async fn list_for_admin(&self) -> RecoveryListing {
        match self.repo.list_all().await {
            Ok(items) => RecoveryListing::Full(items),
            Err(err) => {
                warn!(error = %err, "recovery listing degraded to empty");
                RecoveryListing::Full(Vec::new())
            }
        }
    }

    async fn list_previews(&self) -> RecoveryListing {
        match self.repo.list_approved().await {
            Ok(items) => RecoveryListing::Preview(
                items
                    .into_iter()
                    .filter(|item| item.status == RecoveryStatus::Approved)
                    .map(RecoveryPreview::from)
                    .collect(),
            ),
            Err(err) => {
                warn!(error = %err, "recovery listing degraded to empty");
                RecoveryListing::Preview(Vec::new())
            }
        }
    }
}

#[async_trait]
impl<R> RecoveryCommand for RecoveryService<R>
where
    R: RecoveryRepository,
{
    async fn apply(&self, caller: Caller, action: RecoveryAction) -> Result<RecoveryOutcome, Error> {
        let admin = require_admin(&caller)?;
        let outcome = match action {
            RecoveryAction::Add { booking_code } => {
                let code = parse_booking_code(&booking_code)?;
                let item = self
                    .repo
                    .create(NewRecoveryItem::from_booking_code(code))
                    .await
                    .map_err(map_recovery_error)?;
                RecoveryOutcome::Added(item)
            }
            RecoveryAction::Approve { id } => {
                let item = self.repo.approve(id).await.map_err(map_recovery_error)?;
                RecoveryOutcome::Approved(item)
            }
            RecoveryAction::Import { id } => {
                let item = self.repo.import(id).await.map_err(map_recovery_error)?;
                RecoveryOutcome::Imported {
                    recovery_id: id,
                    item,
                }
            }
            RecoveryAction::Delete { id } => {
                self.repo.delete(id).await.map_err(map_recovery_error)?;
                RecoveryOutcome::Deleted(id)
            }
        };
        info!(
            admin = %admin.user_id,
            subject = outcome.subject_id(),
            transition = outcome.kind(),
            "recovery transition applied"
        );
        Ok(outcome)
    }
}

#[async_trait]
impl<R> RecoveryQuery for RecoveryService<R>
where
    R: RecoveryRepository,
{
    async fn list(&self, caller: Caller) -> RecoveryListing {
        if caller.is_admin() {
            self.list_for_admin().await
        } else {
            self.list_previews().await
        }
    }
}

#[cfg(test)]
#[path = "recovery_service_tests.rs"]
mod tests;
