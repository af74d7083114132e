//! # Validation Module
//!
//! Input validation for storefront commands and catalog writes.
//!
//! ## Where Validation Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Web storefront                                               │
//! │  └── Basic format checks, immediate feedback                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Storefront command (Rust)                                    │
//! │  └── THIS MODULE: promo code format, currency codes, catalog fields    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Cart reducer                                                 │
//! │  └── Never rejects: normalizes quantities and unknown ids              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;

use crate::currency::Currency;
use crate::error::ValidationError;
use crate::money::Money;
use crate::types::DiscountType;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted promo code.
pub const MAX_PROMO_CODE_LEN: usize = 32;

/// Longest accepted product id.
pub const MAX_PRODUCT_ID_LEN: usize = 64;

/// Longest accepted product title.
pub const MAX_PRODUCT_TITLE_LEN: usize = 200;

// =============================================================================
// String Validators
// =============================================================================

/// Normalizes a promo code as typed by a shopper.
///
/// ## Rules
/// - Trimmed and uppercased
/// - 1 to 32 characters
/// - ASCII letters, digits, `-` and `_` only
///
/// ## Example
/// ```rust
/// use pixelvault_core::validation::normalize_promo_code;
///
/// assert_eq!(normalize_promo_code("  save10 ").unwrap(), "SAVE10");
/// assert!(normalize_promo_code("").is_err());
/// assert!(normalize_promo_code("50% OFF").is_err());
/// ```
pub fn normalize_promo_code(code: &str) -> ValidationResult<String> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    if code.chars().count() > MAX_PROMO_CODE_LEN {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: MAX_PROMO_CODE_LEN,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(code.to_ascii_uppercase())
}

/// Validates a product id.
pub fn validate_product_id(id: &str) -> ValidationResult<()> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::Required {
            field: "product_id".to_string(),
        });
    }

    if id.len() > MAX_PRODUCT_ID_LEN {
        return Err(ValidationError::TooLong {
            field: "product_id".to_string(),
            max: MAX_PRODUCT_ID_LEN,
        });
    }

    Ok(())
}

/// Validates a product title.
pub fn validate_product_title(title: &str) -> ValidationResult<()> {
    let title = title.trim();

    if title.is_empty() {
        return Err(ValidationError::Required {
            field: "title".to_string(),
        });
    }

    if title.chars().count() > MAX_PRODUCT_TITLE_LEN {
        return Err(ValidationError::TooLong {
            field: "title".to_string(),
            max: MAX_PRODUCT_TITLE_LEN,
        });
    }

    Ok(())
}

/// Validates a currency code entered by the user and returns its record.
///
/// The currency service itself falls back to KWD for unknown codes; explicit
/// user input is rejected instead so typos don't silently show dinars.
pub fn validate_currency_code(code: &str) -> ValidationResult<&'static Currency> {
    Currency::find(code).ok_or_else(|| ValidationError::NotAllowed {
        field: "currency".to_string(),
        allowed: Currency::all().iter().map(|c| c.code.to_string()).collect(),
    })
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price (must not be negative).
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a discount value against its type.
///
/// ## Rules
/// - Percentage: 0 to 100 inclusive
/// - Fixed: not negative
pub fn validate_discount_value(discount_type: DiscountType, value: Decimal) -> ValidationResult<()> {
    match discount_type {
        DiscountType::Percentage => {
            if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
                return Err(ValidationError::OutOfRange {
                    field: "discount_value".to_string(),
                    min: "0".to_string(),
                    max: "100".to_string(),
                });
            }
        }
        DiscountType::Fixed => {
            if value.is_sign_negative() && !value.is_zero() {
                return Err(ValidationError::MustNotBeNegative {
                    field: "discount_value".to_string(),
                });
            }
        }
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_promo_code() {
        assert_eq!(normalize_promo_code("save-10_x").unwrap(), "SAVE-10_X");
        assert!(matches!(
            normalize_promo_code("   "),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            normalize_promo_code(&"A".repeat(33)),
            Err(ValidationError::TooLong { .. })
        ));
        assert!(matches!(
            normalize_promo_code("خصم"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_validate_product_id() {
        assert!(validate_product_id("fifa-25-ps5").is_ok());
        assert!(validate_product_id("").is_err());
        assert!(validate_product_id(&"x".repeat(65)).is_err());
    }

    #[test]
    fn test_validate_product_title_counts_chars() {
        // 200 Arabic characters are > 200 bytes but still valid
        assert!(validate_product_title(&"ل".repeat(200)).is_ok());
        assert!(validate_product_title(&"ل".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_currency_code() {
        assert_eq!(validate_currency_code("aed").unwrap().code, "AED");
        let err = validate_currency_code("EUR").unwrap_err();
        assert!(matches!(err, ValidationError::NotAllowed { ref allowed, .. } if allowed.len() == 7));
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price("price", Money::zero()).is_ok());
        assert!(validate_price("price", Money::new(-1, 3)).is_err());
    }

    #[test]
    fn test_validate_discount_value() {
        assert!(validate_discount_value(DiscountType::Percentage, Decimal::from(100)).is_ok());
        assert!(validate_discount_value(DiscountType::Percentage, Decimal::from(101)).is_err());
        assert!(validate_discount_value(DiscountType::Percentage, Decimal::from(-1)).is_err());
        assert!(validate_discount_value(DiscountType::Fixed, Decimal::from(500)).is_ok());
        assert!(validate_discount_value(DiscountType::Fixed, Decimal::from(-1)).is_err());
    }
}
