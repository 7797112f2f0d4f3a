//! Payment gateway answering from a fixed table of transactions.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{PaymentGateway, PaymentGatewayError};
use crate::domain::{PaymentReference, ProviderTransaction};

/// Gateway returning pre-registered provider reports.
///
/// Unknown references answer the way Paystack does, with a 404 rejection.
#[derive(Debug, Default)]
pub struct FixturePaymentGateway {
    transactions: Mutex<HashMap<String, ProviderTransaction>>,
}

impl FixturePaymentGateway {
    /// Empty gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the report returned for `reference`.
    pub fn record(&self, reference: &str, transaction: ProviderTransaction) {
        if let Ok(mut transactions) = self.transactions.lock() {
            transactions.insert(reference.to_owned(), transaction);
        }
    }

    /// Register a successful charge.
    pub fn record_success(&self, reference: &str, amount: i64, currency: &str) {
        self.record(
            reference,
            ProviderTransaction {
                status: crate::domain::SUCCESS_STATUS.to_owned(),
                amount,
                currency: Some(currency.to_owned()),
            },
        );
    }
}

#[async_trait]
impl PaymentGateway for FixturePaymentGateway {
    async fn fetch_transaction(
        &self,
        reference: &PaymentReference,
    ) -> Result<ProviderTransaction, PaymentGatewayError> {
        let transactions = self
            .transactions
            .lock()
            .map_err(|_| PaymentGatewayError::transport("fixture gateway lock poisoned"))?;
        transactions
            .get(reference.as_ref())
            .cloned()
            .ok_or_else(|| PaymentGatewayError::rejected(404_u16, "Transaction reference not found"))
    }
}
