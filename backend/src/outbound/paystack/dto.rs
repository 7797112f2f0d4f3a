//! DTOs for decoding Paystack `transaction/verify` responses.

use serde::Deserialize;

use crate::domain::ProviderTransaction;

#[derive(Debug, Deserialize)]
pub(super) struct VerifyResponseDto {
    #[serde(default)]
    pub(super) status: bool,
    #[serde(default)]
    pub(super) message: Option<String>,
    pub(super) data: Option<TransactionDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TransactionDto {
    #[serde(default)]
    pub(super) status: String,
    #[serde(default)]
    pub(super) amount: i64,
    pub(super) currency: Option<String>,
}

impl VerifyResponseDto {
    /// Domain view of the transaction, or why the envelope is unusable.
    pub(super) fn into_transaction(self) -> Result<ProviderTransaction, String> {
        if !self.status {
            return Err(self
                .message
                .unwrap_or_else(|| "status flag was false".to_owned()));
        }
        let data = self
            .data
            .ok_or_else(|| "response carried no transaction data".to_owned())?;
        Ok(ProviderTransaction {
            status: data.status,
            amount: data.amount,
            currency: data.currency,
        })
    }
}
