//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Customer errors
/// - 2xxx: Restaurant errors
/// - 3xxx: Product errors
/// - 4xxx: Order errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Customer errors (1xxx)
    Customer,
    /// Restaurant errors (2xxx)
    Restaurant,
    /// Product errors (3xxx)
    Product,
    /// Order errors (4xxx)
    Order,
    /// System errors (9xxx and unassigned ranges)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Customer,
            2000..3000 => Self::Restaurant,
            3000..4000 => Self::Product,
            4000..5000 => Self::Order,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Customer => "customer",
            Self::Restaurant => "restaurant",
            Self::Product => "product",
            Self::Order => "order",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(999), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1001), ErrorCategory::Customer);
        assert_eq!(ErrorCategory::from_code(2001), ErrorCategory::Restaurant);
        assert_eq!(ErrorCategory::from_code(3001), ErrorCategory::Product);
        assert_eq!(ErrorCategory::from_code(4001), ErrorCategory::Order);
        assert_eq!(ErrorCategory::from_code(5000), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::Success.category(), ErrorCategory::General);
        assert_eq!(
            ErrorCode::CustomerEmailExists.category(),
            ErrorCategory::Customer
        );
        assert_eq!(
            ErrorCode::RestaurantInactive.category(),
            ErrorCategory::Restaurant
        );
        assert_eq!(ErrorCode::ProductInUse.category(), ErrorCategory::Product);
        assert_eq!(ErrorCode::OrderEmpty.category(), ErrorCategory::Order);
        assert_eq!(ErrorCode::DatabaseError.category(), ErrorCategory::System);
    }

    #[test]
    fn test_category_serialize() {
        let json = serde_json::to_string(&ErrorCategory::Restaurant).unwrap();
        assert_eq!(json, "\"restaurant\"");

        let category: ErrorCategory = serde_json::from_str("\"system\"").unwrap();
        assert_eq!(category, ErrorCategory::System);
        assert_eq!(category.name(), "system");
    }
}
