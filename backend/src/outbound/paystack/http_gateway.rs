//! Reqwest-backed Paystack payment gateway.
//!
//! Transport only: builds the verify request, maps HTTP failures and decodes
//! the provider envelope. Comparing the report against what the client
//! expected happens in the domain.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;
use zeroize::Zeroizing;

use super::dto::VerifyResponseDto;
use crate::domain::ports::{PaymentGateway, PaymentGatewayError};
use crate::domain::{PaymentReference, ProviderTransaction};

/// Production Paystack API root.
pub const DEFAULT_PAYSTACK_BASE_URL: &str = "https://api.paystack.co";
const USER_AGENT: &str = "storefront-backend/0.1";

/// Gateway calling `GET {base}/transaction/verify/{reference}`.
pub struct PaystackHttpGateway {
    client: Client,
    base_url: Url,
    secret_key: Zeroizing<String>,
}

impl PaystackHttpGateway {
    /// Build a gateway with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        secret_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url,
            secret_key: Zeroizing::new(secret_key.into()),
        })
    }

    fn verify_url(&self, reference: &PaymentReference) -> Result<Url, PaymentGatewayError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                PaymentGatewayError::not_configured("Paystack base URL cannot carry a path")
            })?
            .pop_if_empty()
            .extend(["transaction", "verify", reference.as_ref()]);
        Ok(url)
    }
}

#[async_trait]
impl PaymentGateway for PaystackHttpGateway {
    async fn fetch_transaction(
        &self,
        reference: &PaymentReference,
    ) -> Result<ProviderTransaction, PaymentGatewayError> {
        let url = self.verify_url(reference)?;
        let response = self
            .client
            .get(url)
            .bearer_auth(self.secret_key.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        parse_transaction(body.as_ref())
    }
}

/// Gateway used when no secret key is configured.
///
/// Every lookup fails without touching the network.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredPaymentGateway;

#[async_trait]
impl PaymentGateway for UnconfiguredPaymentGateway {
    async fn fetch_transaction(
        &self,
        _reference: &PaymentReference,
    ) -> Result<ProviderTransaction, PaymentGatewayError> {
        Err(PaymentGatewayError::not_configured(
            "Paystack secret key not set",
        ))
    }
}

fn parse_transaction(body: &[u8]) -> Result<ProviderTransaction, PaymentGatewayError> {
    let decoded: VerifyResponseDto = serde_json::from_slice(body).map_err(|error| {
        PaymentGatewayError::decode(format!("invalid Paystack JSON payload: {error}"))
    })?;
    decoded
        .into_transaction()
        .map_err(PaymentGatewayError::decode)
}

fn map_transport_error(error: reqwest::Error) -> PaymentGatewayError {
    if error.is_timeout() {
        PaymentGatewayError::timeout(error.to_string())
    } else if error.is_decode() {
        PaymentGatewayError::decode(error.to_string())
    } else {
        PaymentGatewayError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> PaymentGatewayError {
    let message = format!("Paystack returned {status}: {}", body_preview(body));
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            PaymentGatewayError::timeout(message)
        }
        _ => PaymentGatewayError::rejected(status.as_u16(), message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
