//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP handler in the inbound layer, the request
//! and response bodies they exchange, and the session cookie security scheme.
//! Swagger UI serves it in debug builds and `openapi-dump` prints it.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    CatalogueItem, ErrorCode, RecoveryItem, RecoveryPreview, RecoveryStatus, Role,
    StorefrontItem, User,
};
use crate::inbound::http::accounts::{
    LoginRequest, ProfileRequest, RegisterRequest, RoleChangeRequest, UserResponse,
};
use crate::inbound::http::catalogue::{
    CatalogueAdminRequest, CatalogueItemResponse, CatalogueListing, StorefrontListing,
};
use crate::inbound::http::checkout::{
    OrderLineRequest, OrderResponse, PlaceOrderRequest, VerifyPaymentRequest,
};
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::recovery::{
    RecoveryActionResponse, RecoveryEntries, RecoveryListingResponse, RecoveryRequest,
};
use crate::inbound::http::responses::{Ack, MessageAck};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Storefront API",
        description = "Booking-code storefront: accounts, catalogue, recovery staging and checkout."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::accounts::current_user,
        crate::inbound::http::accounts::update_profile,
        crate::inbound::http::accounts::make_admin,
        crate::inbound::http::accounts::make_user,
        crate::inbound::http::catalogue::list_games,
        crate::inbound::http::catalogue::list_catalogue,
        crate::inbound::http::catalogue::mutate_catalogue,
        crate::inbound::http::recovery::list_recovery,
        crate::inbound::http::recovery::apply_recovery_action,
        crate::inbound::http::checkout::verify_payment,
        crate::inbound::http::checkout::place_order,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorEnvelope, ErrorCode, Ack, MessageAck,
        User, Role, UserResponse, RegisterRequest, LoginRequest, ProfileRequest, RoleChangeRequest,
        CatalogueItem, StorefrontItem, StorefrontListing, CatalogueListing, CatalogueItemResponse,
        CatalogueAdminRequest,
        RecoveryItem, RecoveryPreview, RecoveryStatus, RecoveryEntries, RecoveryListingResponse,
        RecoveryRequest, RecoveryActionResponse,
        VerifyPaymentRequest, OrderLineRequest, PlaceOrderRequest, OrderResponse,
    )),
    tags(
        (name = "accounts", description = "Registration, login and role management"),
        (name = "storefront", description = "Catalogue listing with derived ownership"),
        (name = "catalogue", description = "Catalogue administration"),
        (name = "recovery", description = "Recovery staging lifecycle"),
        (name = "checkout", description = "Payment verification and order commit"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
