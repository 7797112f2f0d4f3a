//! Storefront listing and catalogue administration endpoints.
//!
//! ```text
//! GET  /api/v1/games
//! GET  /api/v1/admin/catalogue
//! POST /api/v1/admin/catalogue {"action":"add","bookingCode":"x7k2p","price":25.5}
//! POST /api/v1/admin/catalogue {"action":"delete","id":12}
//! ```

use actix_web::{HttpResponse, get, post, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{
    CatalogueItem, CatalogueItemId, NewCatalogueItem, StorefrontItem, require_admin,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::responses::Ack;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, catalogue_input_error, require};

/// Body for `GET /games`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StorefrontListing {
    pub success: bool,
    pub items: Vec<StorefrontItem>,
}

/// Body for `GET /admin/catalogue`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CatalogueListing {
    pub success: bool,
    pub items: Vec<CatalogueItem>,
}

/// Body returned after adding a catalogue item.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CatalogueItemResponse {
    pub success: bool,
    pub item: CatalogueItem,
}

/// Admin mutation selected by the `action` tag.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum CatalogueAdminRequest {
    /// Create an item; blank title and league fall back to defaults.
    Add {
        #[serde(rename = "bookingCode", default)]
        booking_code: String,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        #[schema(value_type = f64, example = 25.5)]
        price: Decimal,
        #[serde(default)]
        league: Option<String>,
        #[serde(default)]
        description: Option<String>,
    },
    /// Remove an item and its order lines.
    Delete {
        #[serde(default)]
        id: Option<i32>,
    },
}

/// List the catalogue as seen by the caller.
///
/// Ownership is derived from the order ledger; booking codes appear only on
/// owned items, or on every item for admins.
#[utoipa::path(
    get,
    path = "/api/v1/games",
    responses((status = 200, description = "Catalogue listing", body = StorefrontListing)),
    tags = ["storefront"],
    operation_id = "listGames",
    security([])
)]
#[get("/games")]
pub async fn list_games(state: web::Data<HttpState>, session: SessionContext) -> HttpResponse {
    let items = state.storefront.list_items(session.caller()).await;
    HttpResponse::Ok()
        .insert_header(("Cache-Control", "private, no-cache"))
        .json(StorefrontListing {
            success: true,
            items,
        })
}

/// List every catalogue item including booking codes.
#[utoipa::path(
    get,
    path = "/api/v1/admin/catalogue",
    responses(
        (status = 200, description = "Catalogue items", body = CatalogueListing),
        (status = 403, description = "Admin required", body = ErrorEnvelope)
    ),
    tags = ["catalogue"],
    operation_id = "listCatalogue"
)]
#[get("/admin/catalogue")]
pub async fn list_catalogue(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<CatalogueListing>> {
    let items = state.catalogue_admin.list(session.caller()).await?;
    Ok(web::Json(CatalogueListing {
        success: true,
        items,
    }))
}

/// Add or delete a catalogue item.
#[utoipa::path(
    post,
    path = "/api/v1/admin/catalogue",
    request_body = CatalogueAdminRequest,
    responses(
        (status = 200, description = "Item deleted", body = Ack),
        (status = 201, description = "Item created", body = CatalogueItemResponse),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 403, description = "Admin required", body = ErrorEnvelope),
        (status = 404, description = "Item not found", body = ErrorEnvelope)
    ),
    tags = ["catalogue"],
    operation_id = "mutateCatalogue"
)]
#[post("/admin/catalogue")]
pub async fn mutate_catalogue(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CatalogueAdminRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller();
    require_admin(&caller)?;
    match payload.into_inner() {
        CatalogueAdminRequest::Add {
            booking_code,
            title,
            price,
            league,
            description,
        } => {
            let new_item = NewCatalogueItem::from_admin_input(
                &booking_code,
                title.as_deref(),
                price,
                league.as_deref(),
                description.as_deref(),
            )
            .map_err(catalogue_input_error)?;
            let item = state.catalogue_admin.add(caller, new_item).await?;
            info!(item_id = %item.id, "catalogue item added");
            Ok(HttpResponse::Created().json(CatalogueItemResponse {
                success: true,
                item,
            }))
        }
        CatalogueAdminRequest::Delete { id } => {
            let id = CatalogueItemId::new(require(id, FieldName::new("id"))?);
            state.catalogue_admin.delete(caller, id).await?;
            info!(item_id = %id, "catalogue item deleted");
            Ok(HttpResponse::Ok().json(Ack::OK))
        }
    }
}

#[cfg(test)]
#[path = "catalogue_tests.rs"]
mod tests;
