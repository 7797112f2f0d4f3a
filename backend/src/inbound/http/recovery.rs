//! Recovery staging endpoints.
//!
//! ```text
//! GET  /api/v1/recovery
//! POST /api/v1/recovery {"action":"add","bookingCode":"x7k2p"}
//! POST /api/v1/recovery {"action":"approve","id":4}
//! POST /api/v1/recovery {"action":"import","id":4}
//! POST /api/v1/recovery {"action":"delete","id":4}
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    RecoveryAction, RecoveryItem, RecoveryItemId, RecoveryListing, RecoveryOutcome,
    RecoveryPreview, require_admin,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require};

/// Staged rows; admins get full rows, everyone else approved previews.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum RecoveryEntries {
    Full(Vec<RecoveryItem>),
    Preview(Vec<RecoveryPreview>),
}

impl From<RecoveryListing> for RecoveryEntries {
    fn from(value: RecoveryListing) -> Self {
        match value {
            RecoveryListing::Full(items) => Self::Full(items),
            RecoveryListing::Preview(items) => Self::Preview(items),
        }
    }
}

/// Body for `GET /recovery`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecoveryListingResponse {
    pub success: bool,
    pub items: RecoveryEntries,
}

/// Lifecycle action selected by the `action` tag.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum RecoveryRequest {
    Add {
        #[serde(rename = "bookingCode", default)]
        booking_code: String,
    },
    Approve {
        #[serde(default)]
        id: Option<i32>,
    },
    Import {
        #[serde(default)]
        id: Option<i32>,
    },
    Delete {
        #[serde(default)]
        id: Option<i32>,
    },
}

fn staged_id(id: Option<i32>) -> Result<RecoveryItemId, crate::domain::Error> {
    require(id, FieldName::new("id")).map(RecoveryItemId::new)
}

impl RecoveryRequest {
    fn into_action(self) -> Result<RecoveryAction, crate::domain::Error> {
        Ok(match self {
            Self::Add { booking_code } => RecoveryAction::Add { booking_code },
            Self::Approve { id } => RecoveryAction::Approve { id: staged_id(id)? },
            Self::Import { id } => RecoveryAction::Import { id: staged_id(id)? },
            Self::Delete { id } => RecoveryAction::Delete { id: staged_id(id)? },
        })
    }
}

/// Body returned after a lifecycle transition.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryActionResponse {
    pub success: bool,
    /// Staged row the action applied to.
    pub id: i32,
    /// Catalogue row created by an import.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub catalogue_id: Option<i32>,
}

impl From<&RecoveryOutcome> for RecoveryActionResponse {
    fn from(outcome: &RecoveryOutcome) -> Self {
        let id = match outcome {
            RecoveryOutcome::Added(item) | RecoveryOutcome::Approved(item) => item.id,
            RecoveryOutcome::Imported { recovery_id, .. } => *recovery_id,
            RecoveryOutcome::Deleted(id) => *id,
        };
        Self {
            success: true,
            id: id.get(),
            catalogue_id: outcome.catalogue_id().map(|id| id.get()),
        }
    }
}

/// List staged rows for the caller.
#[utoipa::path(
    get,
    path = "/api/v1/recovery",
    responses((status = 200, description = "Staged rows", body = RecoveryListingResponse)),
    tags = ["recovery"],
    operation_id = "listRecovery",
    security([])
)]
#[get("/recovery")]
pub async fn list_recovery(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> web::Json<RecoveryListingResponse> {
    let listing = state.recovery_query.list(session.caller()).await;
    web::Json(RecoveryListingResponse {
        success: true,
        items: listing.into(),
    })
}

/// Apply a lifecycle action to staging.
#[utoipa::path(
    post,
    path = "/api/v1/recovery",
    request_body = RecoveryRequest,
    responses(
        (status = 200, description = "Transition applied", body = RecoveryActionResponse),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 403, description = "Admin required", body = ErrorEnvelope),
        (status = 404, description = "Recovery item not found", body = ErrorEnvelope),
        (status = 409, description = "Recovery item not approved", body = ErrorEnvelope)
    ),
    tags = ["recovery"],
    operation_id = "applyRecoveryAction"
)]
#[post("/recovery")]
pub async fn apply_recovery_action(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RecoveryRequest>,
) -> ApiResult<web::Json<RecoveryActionResponse>> {
    let caller = session.caller();
    require_admin(&caller)?;
    let action = payload.into_inner().into_action()?;
    let outcome = state.recovery.apply(caller, action).await?;
    Ok(web::Json(RecoveryActionResponse::from(&outcome)))
}

#[cfg(test)]
#[path = "recovery_tests.rs"]
mod tests;
