//! Catalogue items: the purchasable booking codes shown in the storefront.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// League recorded when an admin leaves it blank.
pub const DEFAULT_LEAGUE: &str = "Booking Codes";

/// Validation errors for catalogue input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogueValidationError {
    /// Booking code was missing or blank once trimmed.
    #[error("booking code must not be empty")]
    EmptyBookingCode,
    /// Price was below zero.
    #[error("price must not be negative")]
    NegativePrice,
}

/// Database-generated catalogue identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct CatalogueItemId(i32);

impl CatalogueItemId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for CatalogueItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Booking code normalised to trimmed uppercase.
///
/// # Examples
/// ```
/// use storefront::domain::BookingCode;
///
/// let code = BookingCode::parse("  x7k2p ").unwrap();
/// assert_eq!(code.as_ref(), "X7K2P");
/// assert!(BookingCode::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BookingCode(String);

impl BookingCode {
    /// Normalise and validate raw input.
    pub fn parse(raw: &str) -> Result<Self, CatalogueValidationError> {
        let normalised = raw.trim().to_uppercase();
        if normalised.is_empty() {
            return Err(CatalogueValidationError::EmptyBookingCode);
        }
        Ok(Self(normalised))
    }

    /// Title used when none is supplied: `Booking Code: <CODE>`.
    #[must_use]
    pub fn default_title(&self) -> String {
        format!("Booking Code: {}", self.0)
    }
}

impl AsRef<str> for BookingCode {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for BookingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<BookingCode> for String {
    fn from(value: BookingCode) -> Self {
        value.0
    }
}

impl TryFrom<String> for BookingCode {
    type Error = CatalogueValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// Stored catalogue row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueItem {
    /// Identifier.
    #[schema(value_type = i32, example = 12)]
    pub id: CatalogueItemId,
    /// Title shown to shoppers.
    pub title: String,
    /// Code revealed after purchase.
    #[schema(value_type = String, example = "X7K2P")]
    pub booking_code: BookingCode,
    /// Price in major currency units.
    #[schema(value_type = f64, example = 25.5)]
    pub price: Decimal,
    /// League or grouping label.
    pub league: String,
    /// Free-form description.
    pub description: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Catalogue row awaiting insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCatalogueItem {
    /// Title shown to shoppers.
    pub title: String,
    /// Code revealed after purchase.
    pub booking_code: BookingCode,
    /// Non-negative price.
    pub price: Decimal,
    /// League or grouping label.
    pub league: String,
    /// Free-form description.
    pub description: String,
}

impl NewCatalogueItem {
    /// Build an admin-submitted item, filling defaults for blank fields.
    ///
    /// # Examples
    /// ```
    /// use rust_decimal::Decimal;
    /// use storefront::domain::{DEFAULT_LEAGUE, NewCatalogueItem};
    ///
    /// let item = NewCatalogueItem::from_admin_input("abc12", None, Decimal::new(500, 2), None, None)
    ///     .unwrap();
    /// assert_eq!(item.title, "Booking Code: ABC12");
    /// assert_eq!(item.league, DEFAULT_LEAGUE);
    /// ```
    pub fn from_admin_input(
        booking_code: &str,
        title: Option<&str>,
        price: Decimal,
        league: Option<&str>,
        description: Option<&str>,
    ) -> Result<Self, CatalogueValidationError> {
        let booking_code = BookingCode::parse(booking_code)?;
        if price < Decimal::ZERO {
            return Err(CatalogueValidationError::NegativePrice);
        }
        let title = non_blank(title).map_or_else(|| booking_code.default_title(), str::to_owned);
        let league = non_blank(league).unwrap_or(DEFAULT_LEAGUE).to_owned();
        let description = description.map(str::trim).unwrap_or_default().to_owned();
        Ok(Self {
            title,
            booking_code,
            price,
            league,
            description,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Catalogue entry as seen by a particular caller.
///
/// `booking_code` is only populated when the caller owns the item or is an
/// admin; `owned` is derived from the order ledger at query time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontItem {
    /// Identifier.
    #[schema(value_type = i32, example = 12)]
    pub id: CatalogueItemId,
    /// Title shown to shoppers.
    pub title: String,
    /// Price in major currency units.
    #[schema(value_type = f64, example = 25.5)]
    pub price: Decimal,
    /// League or grouping label.
    pub league: String,
    /// Free-form description.
    pub description: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Whether the caller has bought this item.
    pub owned: bool,
    /// Revealed booking code.
    #[schema(value_type = Option<String>)]
    pub booking_code: Option<BookingCode>,
}

impl StorefrontItem {
    /// Project a catalogue row for a caller, revealing the code if `reveal`.
    #[must_use]
    pub fn project(item: CatalogueItem, owned: bool, reveal: bool) -> Self {
        let CatalogueItem {
            id,
            title,
            booking_code,
            price,
            league,
            description,
            created_at,
        } = item;
        Self {
            id,
            title,
            price,
            league,
            description,
            created_at,
            owned,
            booking_code: reveal.then_some(booking_code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_booking_codes_are_rejected(#[case] raw: &str) {
        assert_eq!(
            BookingCode::parse(raw),
            Err(CatalogueValidationError::EmptyBookingCode)
        );
    }

    #[rstest]
    fn admin_input_keeps_supplied_fields() {
        let item = NewCatalogueItem::from_admin_input(
            "zz9",
            Some("  Weekend accumulator "),
            Decimal::new(1999, 2),
            Some("Premier League"),
            Some(" five picks "),
        )
        .expect("valid input");
        assert_eq!(item.title, "Weekend accumulator");
        assert_eq!(item.booking_code.as_ref(), "ZZ9");
        assert_eq!(item.league, "Premier League");
        assert_eq!(item.description, "five picks");
    }

    #[rstest]
    #[case(Some("   "))]
    #[case(None)]
    fn blank_title_defaults_to_code(#[case] title: Option<&str>) {
        let item = NewCatalogueItem::from_admin_input("ab", title, Decimal::ZERO, None, None)
            .expect("valid input");
        assert_eq!(item.title, "Booking Code: AB");
    }

    #[rstest]
    fn negative_price_is_rejected() {
        let err = NewCatalogueItem::from_admin_input("ab", None, Decimal::new(-1, 0), None, None)
            .expect_err("negative price");
        assert_eq!(err, CatalogueValidationError::NegativePrice);
    }

    #[rstest]
    #[case(true, true)]
    #[case(false, false)]
    fn projection_hides_code_unless_revealed(#[case] reveal: bool, #[case] visible: bool) {
        let item = CatalogueItem {
            id: CatalogueItemId::new(3),
            title: "Booking Code: AB".to_owned(),
            booking_code: BookingCode::parse("ab").expect("code"),
            price: Decimal::ZERO,
            league: DEFAULT_LEAGUE.to_owned(),
            description: String::new(),
            created_at: Utc::now(),
        };
        let projected = StorefrontItem::project(item, reveal, reveal);
        assert_eq!(projected.booking_code.is_some(), visible);
        assert_eq!(projected.owned, reveal);
    }
}
