//! Input validation helpers
//!
//! Length limits are counted in characters, not bytes.

use rust_decimal::{Decimal, RoundingStrategy};
use shared::error::{AppError, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Customer names
pub const CUSTOMER_NAME_LEN: (usize, usize) = (2, 100);

/// Restaurant and product names
pub const NAME_LEN: (usize, usize) = (2, 100);

/// Restaurant and product categories
pub const CATEGORY_LEN: (usize, usize) = (3, 50);

/// Restaurant addresses
pub const RESTAURANT_ADDRESS_LEN: (usize, usize) = (5, 150);

/// Product descriptions
pub const DESCRIPTION_LEN: (usize, usize) = (5, 255);

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Phone numbers
pub const MAX_PHONE_LEN: usize = 30;

/// Customer addresses
pub const MAX_ADDRESS_LEN: usize = 255;

// ── Validation helpers ──────────────────────────────────────────────

/// Trim a required text field and check its length bounds
pub fn required_text(value: &str, field: &str, (min, max): (usize, usize)) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::required(field));
    }
    let len = value.chars().count();
    if len < min || len > max {
        return Err(AppError::validation(format!(
            "{field} must have between {min} and {max} characters"
        ))
        .with_detail("field", field));
    }
    Ok(value.to_string())
}

/// Trim an optional text field; blank becomes `None`
pub fn optional_text(
    value: Option<&str>,
    field: &str,
    max_len: usize,
) -> Result<Option<String>, AppError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) if v.chars().count() > max_len => Err(AppError::validation(format!(
            "{field} is too long (max {max_len})"
        ))
        .with_detail("field", field)),
        Some(v) => Ok(Some(v.to_string())),
    }
}

/// Trim an email and check its basic shape
pub fn email(value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::required("email"));
    }
    let valid_shape = value
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty() && !domain.contains('@'));
    if !valid_shape || value.len() > MAX_EMAIL_LEN || value.contains(char::is_whitespace) {
        return Err(AppError::with_message(ErrorCode::InvalidFormat, "email is not valid")
            .with_detail("field", "email"));
    }
    Ok(value.to_string())
}

// ── Money ───────────────────────────────────────────────────────────

/// Largest amount a `NUMERIC(10, 2)` column holds, in cents
const MAX_AMOUNT_CENTS: i64 = 9_999_999_999;

pub fn max_amount() -> Decimal {
    Decimal::new(MAX_AMOUNT_CENTS, 2)
}

/// Round to cents, half away from zero, the scale money is stored with
fn to_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Product prices must be strictly positive once rounded to cents
pub fn positive_price(price: Decimal) -> Result<Decimal, AppError> {
    let price = to_cents(price);
    if price <= Decimal::ZERO {
        return Err(AppError::new(ErrorCode::ProductInvalidPrice).with_detail("field", "price"));
    }
    if price > max_amount() {
        return Err(AppError::with_message(
            ErrorCode::ProductInvalidPrice,
            format!("price must not exceed {}", max_amount()),
        )
        .with_detail("field", "price"));
    }
    Ok(price)
}

/// Delivery fees may be zero but not negative
pub fn non_negative_fee(fee: Decimal) -> Result<Decimal, AppError> {
    let fee = to_cents(fee);
    if fee < Decimal::ZERO || fee > max_amount() {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("delivery_fee must be between 0 and {}", max_amount()),
        )
        .with_detail("field", "delivery_fee"));
    }
    Ok(fee)
}

/// Ratings are on a 0 to 5 scale
pub fn rating(value: Option<Decimal>) -> Result<Option<Decimal>, AppError> {
    match value {
        Some(r) if r < Decimal::ZERO || r > Decimal::from(5) => Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "rating must be between 0 and 5",
        )
        .with_detail("field", "rating")),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text_trims_and_bounds() {
        assert_eq!(required_text("  Ana ", "name", NAME_LEN).unwrap(), "Ana");

        let err = required_text("   ", "name", NAME_LEN).unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);

        let err = required_text("A", "name", NAME_LEN).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.message, "name must have between 2 and 100 characters");

        assert!(required_text(&"x".repeat(101), "name", NAME_LEN).is_err());
        assert!(required_text(&"x".repeat(100), "name", NAME_LEN).is_ok());
    }

    #[test]
    fn test_length_counts_characters() {
        // Two characters, four bytes
        assert!(required_text("çã", "name", NAME_LEN).is_ok());
        assert!(required_text("Sushi Salmão", "name", (2, 12)).is_ok());
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text(None, "phone", 5).unwrap(), None);
        assert_eq!(optional_text(Some("  "), "phone", 5).unwrap(), None);
        assert_eq!(
            optional_text(Some(" 1234 "), "phone", 5).unwrap(),
            Some("1234".to_string())
        );
        assert!(optional_text(Some("123456"), "phone", 5).is_err());
    }

    #[test]
    fn test_email() {
        assert_eq!(email(" Thiago@Email.com ").unwrap(), "Thiago@Email.com");
        assert_eq!(email("").unwrap_err().code, ErrorCode::RequiredField);
        assert_eq!(email("thiago@localhost").unwrap(), "thiago@localhost");
        for bad in ["thiago", "@email.com", "thiago@", "a b@email.com", "a@b@c.com"] {
            assert_eq!(email(bad).unwrap_err().code, ErrorCode::InvalidFormat, "{bad}");
        }
    }

    #[test]
    fn test_money_rules() {
        assert!(positive_price(Decimal::new(1, 2)).is_ok());
        assert_eq!(
            positive_price(Decimal::ZERO).unwrap_err().code,
            ErrorCode::ProductInvalidPrice
        );
        assert!(non_negative_fee(Decimal::ZERO).is_ok());
        assert!(non_negative_fee(Decimal::new(-1, 2)).is_err());
        assert!(rating(Some(Decimal::new(48, 1))).is_ok());
        assert!(rating(Some(Decimal::new(51, 1))).is_err());
        assert!(rating(None).unwrap().is_none());
    }

    #[test]
    fn test_money_is_stored_in_cents() {
        assert_eq!(positive_price(Decimal::new(30_005, 3)).unwrap(), Decimal::new(3001, 2));
        assert_eq!(non_negative_fee(Decimal::new(4_994, 3)).unwrap(), Decimal::new(499, 2));

        // Rounds to zero, so it is not a positive price
        let err = positive_price(Decimal::new(1, 3)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductInvalidPrice);
    }

    #[test]
    fn test_money_upper_bound() {
        assert_eq!(max_amount().to_string(), "99999999.99");
        assert!(positive_price(max_amount()).is_ok());
        assert!(non_negative_fee(max_amount()).is_ok());

        let too_big = Decimal::from(1_000_000_000);
        assert_eq!(positive_price(too_big).unwrap_err().code, ErrorCode::ProductInvalidPrice);
        assert_eq!(non_negative_fee(too_big).unwrap_err().code, ErrorCode::ValueOutOfRange);
        assert!(positive_price(max_amount() + Decimal::new(1, 2)).is_err());
    }
}
