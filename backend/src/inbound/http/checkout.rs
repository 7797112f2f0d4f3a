//! Checkout endpoints: payment verification and order commit.
//!
//! ```text
//! POST /api/v1/paystack_verify {"reference":"T123","expectedAmount":5000,"currency":"NGN"}
//! POST /api/v1/orders {"items":[{"id":1,"qty":2}],"total":50.0}
//! ```
//!
//! A successful verification is remembered in the session; the next order
//! consumes it.

use actix_web::{post, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{Cart, OrderRequest, PaymentExpectation, require_authenticated};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::responses::MessageAck;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{order_input_error, payment_input_error};

/// Message returned once the provider confirms the charge.
pub const PAYMENT_VERIFIED_MESSAGE: &str = "Payment verified";

/// Body for `POST /paystack_verify`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct VerifyPaymentRequest {
    pub reference: String,
    /// Expected charge in minor units.
    #[serde(alias = "expected_amount")]
    #[schema(example = 5000)]
    pub expected_amount: i64,
    #[schema(example = "NGN")]
    pub currency: String,
}

/// One cart line.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct OrderLineRequest {
    pub id: i32,
    #[serde(alias = "quantity")]
    pub qty: i32,
}

/// Body for `POST /orders`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PlaceOrderRequest {
    #[serde(default)]
    pub items: Vec<OrderLineRequest>,
    /// Client-computed total in major units.
    #[schema(value_type = f64, example = 50.0)]
    pub total: Decimal,
}

impl PlaceOrderRequest {
    fn into_domain(self) -> Result<OrderRequest, crate::domain::Error> {
        let cart = Cart::try_from_pairs(self.items.into_iter().map(|line| (line.id, line.qty)))
            .map_err(order_input_error)?;
        OrderRequest::try_new(cart, self.total).map_err(order_input_error)
    }
}

/// Body returned after an order is committed.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub success: bool,
    pub order_id: i32,
    /// `true` when the payment reference had already produced this order.
    pub replayed: bool,
}

/// Confirm a charge with the payment provider.
#[utoipa::path(
    post,
    path = "/api/v1/paystack_verify",
    request_body = VerifyPaymentRequest,
    responses(
        (status = 200, description = "Payment verified", body = MessageAck),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 402, description = "Verification failed", body = ErrorEnvelope),
        (status = 502, description = "Provider unavailable", body = ErrorEnvelope)
    ),
    tags = ["checkout"],
    operation_id = "verifyPayment",
    security([])
)]
#[post("/paystack_verify")]
pub async fn verify_payment(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<VerifyPaymentRequest>,
) -> ApiResult<web::Json<MessageAck>> {
    let body = payload.into_inner();
    let expectation =
        PaymentExpectation::try_new(&body.reference, body.expected_amount, &body.currency)
            .map_err(payment_input_error)?;
    let verified = state.checkout.verify_payment(expectation).await?;
    session.store_verified_payment(&verified)?;
    Ok(web::Json(MessageAck::new(PAYMENT_VERIFIED_MESSAGE)))
}

/// Commit the cart against the verified payment in the session.
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    request_body = PlaceOrderRequest,
    responses(
        (status = 200, description = "Order committed", body = OrderResponse),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 401, description = "Login required", body = ErrorEnvelope),
        (status = 402, description = "Payment not verified", body = ErrorEnvelope),
        (status = 404, description = "Catalogue item not found", body = ErrorEnvelope),
        (status = 409, description = "Payment reference already used", body = ErrorEnvelope)
    ),
    tags = ["checkout"],
    operation_id = "placeOrder"
)]
#[post("/orders")]
pub async fn place_order(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PlaceOrderRequest>,
) -> ApiResult<web::Json<OrderResponse>> {
    let caller = session.caller();
    require_authenticated(&caller)?;
    let request = payload.into_inner().into_domain()?;
    let placed = state
        .checkout
        .place_order(caller, request, session.verified_payment())
        .await?;
    session.clear_verified_payment();
    info!(order_id = %placed.order_id, replayed = placed.replayed, "order committed");
    Ok(web::Json(OrderResponse {
        success: true,
        order_id: placed.order_id.get(),
        replayed: placed.replayed,
    }))
}

#[cfg(test)]
#[path = "checkout_tests.rs"]
mod tests;
