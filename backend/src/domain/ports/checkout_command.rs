//! Driving port for payment verification and order commit.

use async_trait::async_trait;

use crate::domain::{Caller, Error, OrderRequest, PaymentExpectation, PlacedOrder, VerifiedPayment};

/// Two-phase checkout: verify with the provider, then commit the order.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CheckoutCommand: Send + Sync {
    /// Confirm a provider transaction matches the expectation.
    ///
    /// Mismatches and provider 4xx answers fail with `VerificationFailed`;
    /// timeouts and transport failures with `GatewayUnavailable`.
    async fn verify_payment(&self, expectation: PaymentExpectation)
    -> Result<VerifiedPayment, Error>;

    /// Commit an order paid by `payment`.
    ///
    /// Requires a signed-in caller and a verified payment whose amount equals
    /// the request total in minor units.
    async fn place_order(
        &self,
        caller: Caller,
        request: OrderRequest,
        payment: Option<VerifiedPayment>,
    ) -> Result<PlacedOrder, Error>;
}
