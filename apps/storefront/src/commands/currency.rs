//! # Currency Commands
//!
//! Supported currencies and ad-hoc conversion.

use pixelvault_core::currency;
use pixelvault_core::validation::validate_currency_code;
use pixelvault_core::{Currency, Money, ValidationError};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::ConfigState;

/// Currency entry for the currency picker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyInfo {
    pub code: &'static str,
    pub symbol: &'static str,
    /// Name in the configured direction's language.
    pub name: &'static str,
    pub decimals: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub exchange_rate: Decimal,
    pub is_selected: bool,
}

/// Result of [`convert_amount`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    pub from: &'static str,
    pub to: &'static str,
    pub amount: Money,
    pub converted: Money,
    pub formatted: String,
}

/// Lists supported currencies, marking the configured one.
pub fn list_currencies(config: &ConfigState) -> Vec<CurrencyInfo> {
    debug!("list_currencies command");
    let selected = config.currency().code;

    Currency::all()
        .iter()
        .map(|c| CurrencyInfo {
            code: c.code,
            symbol: c.symbol,
            name: c.display_name(config.rtl),
            decimals: c.decimals,
            exchange_rate: c.exchange_rate(),
            is_selected: c.code == selected,
        })
        .collect()
}

/// Converts `amount` between two supported currencies.
///
/// Unlike the currency service itself, typed-in codes are validated rather
/// than silently falling back to dinars, and a result too large for a
/// decimal is rejected instead of saturating. `converted` keeps full
/// precision; `formatted` is rounded to the target's decimals.
pub fn convert_amount(
    config: &ConfigState,
    amount: Money,
    from: &str,
    to: &str,
) -> Result<Conversion, ApiError> {
    let from = validate_currency_code(from)?;
    let to = validate_currency_code(to)?;
    debug!(from = from.code, to = to.code, amount = %amount.amount(), "convert_amount command");

    let converted = currency::checked_convert(amount, from.code, to.code).ok_or_else(|| {
        ValidationError::OutOfRange {
            field: "amount".to_string(),
            min: Money::MIN.amount().to_string(),
            max: Money::MAX.amount().to_string(),
        }
    })?;

    Ok(Conversion {
        from: from.code,
        to: to.code,
        amount,
        converted,
        formatted: currency::format(converted, to, config.rtl),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_list_currencies() {
        let config = ConfigState::default().with_currency("test", "AED").unwrap();
        let currencies = list_currencies(&config);

        assert_eq!(currencies.len(), 7);
        assert_eq!(currencies[0].code, "KWD");
        let selected: Vec<_> = currencies.iter().filter(|c| c.is_selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].code, "AED");
    }

    #[test]
    fn test_convert_amount() {
        let config = ConfigState::default();
        let result = convert_amount(&config, Money::new(10, 0), "kwd", "sar").unwrap();
        assert_eq!(result.converted, Money::new(1225, 1));
        assert_eq!(result.formatted, "SR 122.50");

        let back = convert_amount(&config, Money::new(1225, 1), "SAR", "KWD").unwrap();
        assert_eq!(back.converted, Money::new(10, 0));
        assert_eq!(back.formatted, "KD 10.000");
    }

    #[test]
    fn test_convert_amount_rejects_unknown_codes() {
        let config = ConfigState::default();
        let err = convert_amount(&config, Money::new(1, 0), "KWD", "EUR").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_convert_amount_rejects_out_of_range_result() {
        let config = ConfigState::default();
        let max: Money = "79228162514264337593543950335".parse().unwrap();

        let err = convert_amount(&config, max, "KWD", "SAR").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("amount"));

        // Shrinking direction still fits
        let ok = convert_amount(&config, max, "SAR", "KWD").unwrap();
        assert!(ok.converted < max);
    }
}
