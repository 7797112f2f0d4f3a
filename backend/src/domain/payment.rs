//! Payment verification rules applied to provider transaction reports.
//!
//! The provider's report is the only trusted source for what was charged.
//! [`PaymentExpectation::check`] fails closed: any status other than
//! `success`, any amount difference, or any currency difference (compared
//! case-insensitively) rejects the payment.

use std::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Provider status string reported for a captured charge.
pub const SUCCESS_STATUS: &str = "success";

/// Validation errors for payment verification input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaymentValidationError {
    /// Reference was missing or blank once trimmed.
    #[error("payment reference must not be empty")]
    EmptyReference,
    /// Currency was missing or blank once trimmed.
    #[error("currency must not be empty")]
    EmptyCurrency,
    /// Expected amount was zero or negative.
    #[error("expected amount must be positive")]
    NonPositiveAmount,
}

/// Provider transaction reference, trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PaymentReference(String);

impl PaymentReference {
    /// Trim and validate raw input.
    pub fn parse(raw: &str) -> Result<Self, PaymentValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PaymentValidationError::EmptyReference);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PaymentReference {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PaymentReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<PaymentReference> for String {
    fn from(value: PaymentReference) -> Self {
        value.0
    }
}

impl TryFrom<String> for PaymentReference {
    type Error = PaymentValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// What the client claims it paid, checked against the provider's report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentExpectation {
    reference: PaymentReference,
    amount: i64,
    currency: String,
}

impl PaymentExpectation {
    /// Validate raw verification input. `amount` is in minor units.
    pub fn try_new(
        reference: &str,
        amount: i64,
        currency: &str,
    ) -> Result<Self, PaymentValidationError> {
        let reference = PaymentReference::parse(reference)?;
        let currency = currency.trim();
        if currency.is_empty() {
            return Err(PaymentValidationError::EmptyCurrency);
        }
        if amount <= 0 {
            return Err(PaymentValidationError::NonPositiveAmount);
        }
        Ok(Self {
            reference,
            amount,
            currency: currency.to_uppercase(),
        })
    }

    /// Provider reference to look up.
    pub fn reference(&self) -> &PaymentReference {
        &self.reference
    }

    /// Expected charge in minor units.
    pub fn amount(&self) -> i64 {
        self.amount
    }

    /// Expected currency, uppercased.
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Compare the provider's report against this expectation.
    ///
    /// # Examples
    /// ```
    /// use storefront::domain::{PaymentExpectation, PaymentMismatch, ProviderTransaction};
    ///
    /// let expected = PaymentExpectation::try_new("ref-1", 5000, "ngn").unwrap();
    /// let report = ProviderTransaction {
    ///     status: "success".into(),
    ///     amount: 4999,
    ///     currency: Some("NGN".into()),
    /// };
    /// assert!(matches!(
    ///     expected.check(&report),
    ///     Err(PaymentMismatch::Amount { expected: 5000, reported: 4999 })
    /// ));
    /// ```
    pub fn check(&self, report: &ProviderTransaction) -> Result<VerifiedPayment, PaymentMismatch> {
        if report.status != SUCCESS_STATUS {
            return Err(PaymentMismatch::Status {
                reported: report.status.clone(),
            });
        }
        if report.amount != self.amount {
            return Err(PaymentMismatch::Amount {
                expected: self.amount,
                reported: report.amount,
            });
        }
        let Some(reported) = report.currency.as_deref() else {
            return Err(PaymentMismatch::MissingCurrency);
        };
        if !reported.trim().eq_ignore_ascii_case(&self.currency) {
            return Err(PaymentMismatch::Currency {
                expected: self.currency.clone(),
                reported: reported.to_owned(),
            });
        }
        Ok(VerifiedPayment {
            reference: self.reference.clone(),
            amount: self.amount,
            currency: self.currency.clone(),
        })
    }
}

/// Transaction as reported by the payment provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderTransaction {
    /// Provider status, e.g. `success`, `failed`, `abandoned`.
    pub status: String,
    /// Captured amount in minor units.
    pub amount: i64,
    /// Currency code, when reported.
    pub currency: Option<String>,
}

/// Reasons a provider report does not confirm the expected payment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaymentMismatch {
    /// The charge did not succeed.
    #[error("payment status is {reported}")]
    Status {
        /// Status reported by the provider.
        reported: String,
    },
    /// The captured amount differs from the expectation.
    #[error("amount mismatch: expected {expected}, provider reported {reported}")]
    Amount {
        /// Expected minor units.
        expected: i64,
        /// Reported minor units.
        reported: i64,
    },
    /// The currency differs from the expectation.
    #[error("currency mismatch: expected {expected}, provider reported {reported}")]
    Currency {
        /// Expected currency.
        expected: String,
        /// Reported currency.
        reported: String,
    },
    /// The provider omitted the currency.
    #[error("provider did not report a currency")]
    MissingCurrency,
}

/// Payment confirmed by the provider and bound to the caller's session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedPayment {
    /// Provider reference.
    pub reference: PaymentReference,
    /// Confirmed amount in minor units.
    pub amount: i64,
    /// Confirmed currency, uppercased.
    pub currency: String,
}

/// Convert a major-unit total to minor units (× 100), rounding half away
/// from zero. Returns `None` if the result does not fit in an `i64`.
///
/// # Examples
/// ```
/// use rust_decimal::Decimal;
/// use storefront::domain::to_minor_units;
///
/// assert_eq!(to_minor_units(Decimal::new(5000, 2)), Some(5000));
/// assert_eq!(to_minor_units(Decimal::new(10005, 3)), Some(1001));
/// ```
#[must_use]
pub fn to_minor_units(total: Decimal) -> Option<i64> {
    total
        .checked_mul(Decimal::ONE_HUNDRED)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}
