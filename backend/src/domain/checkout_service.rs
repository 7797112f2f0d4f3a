//! Checkout orchestrator: payment verification followed by order commit.
//!
//! Verification has no side effects and may be retried freely. The commit
//! only runs for a signed-in caller holding a verified payment whose amount
//! equals the submitted total in minor units; the ledger write itself is a
//! single transaction owned by the [`OrderRepository`] adapter.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{error, info, warn};

use crate::domain::ports::{
    CheckoutCommand, OrderRepository, OrderRepositoryError, PaymentGateway, PaymentGatewayError,
};
use crate::domain::{
    Caller, Error, NewOrder, OrderRequest, PaymentExpectation, PaymentMismatch, PlacedOrder,
    SessionIdentity, VerifiedPayment, require_authenticated, to_minor_units,
};

/// Checkout service implementing [`CheckoutCommand`].
///
/// The gateway may be a trait object so the provider can be chosen at
/// startup.
#[derive(Clone)]
pub struct CheckoutService<G: ?Sized, O> {
    gateway: Arc<G>,
    orders: Arc<O>,
}

impl<G: ?Sized, O> CheckoutService<G, O> {
    /// Create a new service over the payment gateway and order ledger.
    pub fn new(gateway: Arc<G>, orders: Arc<O>) -> Self {
        Self { gateway, orders }
    }
}

fn map_gateway_error(error: PaymentGatewayError) -> Error {
    match error {
        PaymentGatewayError::Timeout { message } => {
            warn!(%message, "payment provider timed out");
            Error::gateway_unavailable("Payment provider timed out; please retry")
        }
        PaymentGatewayError::Transport { message } => {
            warn!(%message, "payment provider unreachable");
            Error::gateway_unavailable("Payment provider unreachable; please retry")
        }
        PaymentGatewayError::Rejected { status, message } if (400..500).contains(&status) => {
            info!(status, %message, "payment provider rejected lookup");
            Error::verification_failed("Payment verification failed")
                .with_details(json!({ "providerStatus": status }))
        }
        PaymentGatewayError::Rejected { status, message } => {
            warn!(status, %message, "payment provider failed");
            Error::gateway_unavailable("Payment provider unavailable; please retry")
        }
        PaymentGatewayError::Decode { message } => {
            warn!(%message, "payment provider response invalid");
            Error::verification_failed("Invalid payment provider response")
        }
        PaymentGatewayError::NotConfigured { message } => {
            error!(%message, "payment provider not configured");
            Error::gateway_unavailable("Payment provider not configured")
        }
    }
}

fn mismatch_error(mismatch: &PaymentMismatch) -> Error {
    let (message, reason) = match mismatch {
        PaymentMismatch::Status { .. } => ("Payment not successful", "status"),
        PaymentMismatch::Amount { .. } => ("Amount mismatch", "amount"),
        PaymentMismatch::Currency { .. } | PaymentMismatch::MissingCurrency => {
            ("Currency mismatch", "currency")
        }
    };
    Error::verification_failed(message).with_details(json!({ "reason": reason }))
}

fn map_order_error(error: OrderRepositoryError) -> Error {
    match error {
        OrderRepositoryError::Connection { message } => {
            error!(%message, "order repository unavailable");
            Error::service_unavailable("order ledger is temporarily unavailable")
        }
        OrderRepositoryError::Query { message } => {
            error!(%message, "order repository query failed");
            Error::internal("order ledger query failed")
        }
        OrderRepositoryError::UnknownItem { id } => {
            Error::not_found("Catalogue item not found").with_details(json!({ "id": id }))
        }
        OrderRepositoryError::DuplicateReference { reference } => {
            Error::conflict("Payment reference already used")
                .with_details(json!({ "reference": reference }))
        }
    }
}

impl<G, O> CheckoutService<G, O>
where
    G: PaymentGateway + ?Sized,
    O: OrderRepository,
{
    /// Replay an order already committed for this payment, if the caller
    /// owns it.
    async fn existing_order(
        &self,
        identity: &SessionIdentity,
        payment: &VerifiedPayment,
    ) -> Result<Option<PlacedOrder>, Error> {
        let Some(existing) = self
            .orders
            .find_by_reference(&payment.reference)
            .await
            .map_err(map_order_error)?
        else {
            return Ok(None);
        };
        if existing.user_id != identity.user_id {
            return Err(Error::conflict("Payment reference already used"));
        }
        info!(order = %existing.id, reference = %payment.reference, "order replayed");
        Ok(Some(PlacedOrder {
            order_id: existing.id,
            replayed: true,
        }))
    }
}

#[async_trait]
impl<G, O> CheckoutCommand for CheckoutService<G, O>
where
    G: PaymentGateway + ?Sized,
    O: OrderRepository,
{
    async fn verify_payment(
        &self,
        expectation: PaymentExpectation,
    ) -> Result<VerifiedPayment, Error> {
        let report = self
            .gateway
            .fetch_transaction(expectation.reference())
            .await
            .map_err(map_gateway_error)?;
        expectation.check(&report).map_err(|mismatch| {
            info!(reference = %expectation.reference(), %mismatch, "payment verification failed");
            mismatch_error(&mismatch)
        })
    }

    async fn place_order(
        &self,
        caller: Caller,
        request: OrderRequest,
        payment: Option<VerifiedPayment>,
    ) -> Result<PlacedOrder, Error> {
        let identity = require_authenticated(&caller)?;
        let payment =
            payment.ok_or_else(|| Error::verification_failed("Payment not verified"))?;

        let expected = to_minor_units(request.total)
            .ok_or_else(|| Error::invalid_request("Order total out of range"))?;
        if expected != payment.amount {
            return Err(
                Error::verification_failed("Order total does not match verified payment")
                    .with_details(json!({ "expected": expected, "verified": payment.amount })),
            );
        }

        if let Some(replayed) = self.existing_order(identity, &payment).await? {
            return Ok(replayed);
        }

        let order = NewOrder {
            user_id: identity.user_id,
            total: request.total,
            payment_reference: payment.reference.clone(),
            cart: request.cart,
        };
        match self.orders.place(order).await {
            Ok(order_id) => {
                info!(order = %order_id, user = %identity.user_id, "order placed");
                Ok(PlacedOrder {
                    order_id,
                    replayed: false,
                })
            }
            Err(OrderRepositoryError::DuplicateReference { reference }) => {
                // Lost a race with a concurrent submission of the same payment.
                self.existing_order(identity, &payment)
                    .await?
                    .ok_or_else(|| map_order_error(OrderRepositoryError::DuplicateReference { reference }))
            }
            Err(err) => Err(map_order_error(err)),
        }
    }
}

#[cfg(test)]
#[path = "checkout_service_tests.rs"]
mod tests;
