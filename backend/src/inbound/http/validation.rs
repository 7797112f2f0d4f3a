//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper yields `invalid_request` with `details: {field, code}` so
//! clients can highlight the offending input.

use serde_json::json;

use crate::domain::{
    CatalogueValidationError, CredentialsValidationError, Error, OrderValidationError,
    PaymentValidationError, UserValidationError,
};

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) const fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(message: impl Into<String>, field: &str, code: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code,
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    field_error(format!("missing required field: {field}"), field, "required")
}

/// Require an optional payload field.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn credentials_error(err: CredentialsValidationError) -> Error {
    let code = match &err {
        CredentialsValidationError::User(
            UserValidationError::EmptyEmail | UserValidationError::EmptyName,
        )
        | CredentialsValidationError::EmptyPassword => "required",
        CredentialsValidationError::User(UserValidationError::NameTooLong { .. }) => "too_long",
        CredentialsValidationError::PasswordTooShort { .. } => "too_short",
        CredentialsValidationError::PasswordMismatch => "mismatch",
        CredentialsValidationError::User(_) => "invalid",
    };
    field_error(err.to_string(), err.field(), code)
}

pub(crate) fn user_field_error(err: UserValidationError) -> Error {
    credentials_error(CredentialsValidationError::User(err))
}

pub(crate) fn catalogue_input_error(err: CatalogueValidationError) -> Error {
    match err {
        CatalogueValidationError::EmptyBookingCode => {
            field_error("Booking code required", "bookingCode", "required")
        }
        CatalogueValidationError::NegativePrice => {
            field_error(err.to_string(), "price", "negative")
        }
    }
}

pub(crate) fn payment_input_error(err: PaymentValidationError) -> Error {
    match err {
        PaymentValidationError::EmptyReference => {
            field_error("Missing reference", "reference", "required")
        }
        PaymentValidationError::EmptyCurrency => field_error(err.to_string(), "currency", "required"),
        PaymentValidationError::NonPositiveAmount => {
            field_error(err.to_string(), "expectedAmount", "not_positive")
        }
    }
}

pub(crate) fn order_input_error(err: OrderValidationError) -> Error {
    match err {
        OrderValidationError::EmptyCart => field_error(err.to_string(), "items", "empty"),
        OrderValidationError::InvalidQuantity { item_id } => {
            Error::invalid_request(err.to_string()).with_details(json!({
                "field": "items",
                "code": "invalid_quantity",
                "itemId": item_id,
            }))
        }
        OrderValidationError::NegativeTotal => field_error(err.to_string(), "total", "negative"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;
    use serde_json::Value;

    fn detail<'a>(error: &'a Error, key: &str) -> Option<&'a str> {
        error.details().and_then(|d| d.get(key)).and_then(Value::as_str)
    }

    #[rstest]
    #[case(CredentialsValidationError::PasswordMismatch, "passwordConfirm", "mismatch")]
    #[case(CredentialsValidationError::PasswordTooShort { min: 6 }, "password", "too_short")]
    #[case(UserValidationError::MalformedEmail.into(), "email", "invalid")]
    #[case(UserValidationError::EmptyName.into(), "name", "required")]
    fn credentials_errors_name_the_field(
        #[case] err: CredentialsValidationError,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let error = credentials_error(err);

        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(detail(&error, "field"), Some(field));
        assert_eq!(detail(&error, "code"), Some(code));
    }

    #[test]
    fn blank_booking_code_uses_the_storefront_message() {
        let error = catalogue_input_error(CatalogueValidationError::EmptyBookingCode);
        assert_eq!(error.message(), "Booking code required");
        assert_eq!(detail(&error, "field"), Some("bookingCode"));
    }

    #[test]
    fn missing_reference_uses_the_storefront_message() {
        let error = payment_input_error(PaymentValidationError::EmptyReference);
        assert_eq!(error.message(), "Missing reference");
    }

    #[test]
    fn invalid_quantity_reports_the_item() {
        let error = order_input_error(OrderValidationError::InvalidQuantity { item_id: 4 });
        assert_eq!(
            error.details().and_then(|d| d.get("itemId")).and_then(Value::as_i64),
            Some(4)
        );
    }

    #[test]
    fn require_reports_missing_fields() {
        let error = require::<i32>(None, FieldName::new("id")).expect_err("missing");
        assert_eq!(error.message(), "missing required field: id");
        assert_eq!(require(Some(3), FieldName::new("id")), Ok(3));
    }
}
