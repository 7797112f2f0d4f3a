//! Driven port for the external payment provider.

use async_trait::async_trait;

use crate::domain::{PaymentReference, ProviderTransaction};

use super::define_port_error;

define_port_error! {
    /// Errors raised while querying the payment provider.
    pub enum PaymentGatewayError {
        /// The provider did not answer within the configured timeout.
        Timeout { message: String } => "payment provider timed out: {message}",
        /// The request could not be delivered.
        Transport { message: String } => "payment provider unreachable: {message}",
        /// The provider answered with a non-success HTTP status.
        Rejected { status: u16, message: String } => "payment provider rejected lookup ({status}): {message}",
        /// The provider answered with a payload that could not be decoded.
        Decode { message: String } => "payment provider response invalid: {message}",
        /// No provider credentials are configured.
        NotConfigured { message: String } => "payment provider not configured: {message}",
    }
}

/// Lookup of a client-initiated transaction at the provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Fetch the provider's report for `reference`.
    async fn fetch_transaction(
        &self,
        reference: &PaymentReference,
    ) -> Result<ProviderTransaction, PaymentGatewayError>;
}
