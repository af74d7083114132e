//! # Currency Service
//!
//! Static currency table, conversion and display formatting.
//!
//! ## Exchange Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Rates relative to 1 KWD (base)                       │
//! │                                                                         │
//! │   KWD 1.000 ──┬──► SAR 12.25   ──┐                                      │
//! │               ├──► AED 12.00     │                                      │
//! │               ├──► QAR 11.85     │  convert(amount, from, to)           │
//! │               ├──► BHD 1.230     ├─ = amount / rate(from) × rate(to)    │
//! │               ├──► OMR 1.250     │                                      │
//! │               └──► USD 3.26    ──┘                                      │
//! │                                                                         │
//! │  Rates are fixed configuration: no live feed, no cache, no globals     │
//! │  that change at runtime. Unknown codes resolve to the default (KWD).   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Formatting
//! ```rust
//! use pixelvault_core::currency::{self, Currency};
//! use pixelvault_core::Money;
//!
//! let sar = Currency::resolve("SAR");
//! let amount = currency::convert(Money::new(10, 0), "KWD", "SAR");
//! assert_eq!(currency::format(amount, sar, false), "SR 122.50");
//! assert_eq!(currency::format(amount, sar, true), "122.50 SR");
//! ```

use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// The currency every cart amount is denominated in.
pub const BASE_CURRENCY: &str = "KWD";

/// Fallback for unknown currency codes.
pub const DEFAULT_CURRENCY: &str = BASE_CURRENCY;

// =============================================================================
// Currency Record
// =============================================================================

/// A supported currency.
///
/// Records are static; obtain them through [`Currency::find`],
/// [`Currency::resolve`] or [`Currency::all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    /// ISO-like code ("KWD", "SAR", ...).
    pub code: &'static str,
    /// Symbol placed next to formatted amounts.
    pub symbol: &'static str,
    /// English display name.
    pub name: &'static str,
    /// Arabic display name.
    pub name_ar: &'static str,
    /// Decimal places used when formatting.
    pub decimals: u32,
    /// Units of this currency per 1 unit of the base currency.
    #[serde(with = "rust_decimal::serde::float")]
    exchange_rate: Decimal,
}

/// Builds a rate from a mantissa and scale at compile time.
const fn rate(mantissa: u32, scale: u32) -> Decimal {
    Decimal::from_parts(mantissa, 0, 0, false, scale)
}

static CURRENCIES: [Currency; 7] = [
    Currency {
        code: "KWD",
        symbol: "KD",
        name: "Kuwaiti Dinar",
        name_ar: "دينار كويتي",
        decimals: 3,
        exchange_rate: rate(1, 0),
    },
    Currency {
        code: "SAR",
        symbol: "SR",
        name: "Saudi Riyal",
        name_ar: "ريال سعودي",
        decimals: 2,
        exchange_rate: rate(1225, 2),
    },
    Currency {
        code: "AED",
        symbol: "AED",
        name: "UAE Dirham",
        name_ar: "درهم إماراتي",
        decimals: 2,
        exchange_rate: rate(1200, 2),
    },
    Currency {
        code: "QAR",
        symbol: "QR",
        name: "Qatari Riyal",
        name_ar: "ريال قطري",
        decimals: 2,
        exchange_rate: rate(1185, 2),
    },
    Currency {
        code: "BHD",
        symbol: "BD",
        name: "Bahraini Dinar",
        name_ar: "دينار بحريني",
        decimals: 3,
        exchange_rate: rate(1230, 3),
    },
    Currency {
        code: "OMR",
        symbol: "OMR",
        name: "Omani Rial",
        name_ar: "ريال عماني",
        decimals: 3,
        exchange_rate: rate(1250, 3),
    },
    Currency {
        code: "USD",
        symbol: "$",
        name: "US Dollar",
        name_ar: "دولار أمريكي",
        decimals: 2,
        exchange_rate: rate(326, 2),
    },
];

impl Currency {
    /// All supported currencies, base currency first.
    pub fn all() -> &'static [Currency] {
        &CURRENCIES
    }

    /// Looks up a currency by code (case-insensitive).
    pub fn find(code: &str) -> Option<&'static Currency> {
        let code = code.trim();
        CURRENCIES
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code))
    }

    /// Looks up a currency, falling back to the default currency.
    ///
    /// Never fails: an unknown or empty code yields KWD.
    pub fn resolve(code: &str) -> &'static Currency {
        Self::find(code).unwrap_or_else(Self::default_currency)
    }

    /// The base currency (rate 1).
    pub fn base() -> &'static Currency {
        &CURRENCIES[0]
    }

    /// The currency used for unknown codes.
    pub fn default_currency() -> &'static Currency {
        Self::base()
    }

    /// Units of this currency per unit of the base currency.
    #[inline]
    pub fn exchange_rate(&self) -> Decimal {
        self.exchange_rate
    }

    /// Name for the given text direction: Arabic when `rtl`, English otherwise.
    pub fn display_name(&self, rtl: bool) -> &'static str {
        if rtl {
            self.name_ar
        } else {
            self.name
        }
    }

    /// Whether this is the base currency.
    pub fn is_base(&self) -> bool {
        self.code == BASE_CURRENCY
    }
}

// =============================================================================
// Conversion
// =============================================================================

/// Converts `amount` from one currency to another via the base currency.
///
/// `amount / rate(from) × rate(to)`; unknown codes use the default
/// currency's rate. No rounding is applied.
///
/// Never fails: a result beyond the decimal range saturates to
/// [`Money::MAX`] (or [`Money::MIN`]). Use [`checked_convert`] to detect that.
///
/// ## Example
/// ```rust
/// use pixelvault_core::currency::convert;
/// use pixelvault_core::Money;
///
/// assert_eq!(convert(Money::new(10, 0), "KWD", "SAR"), Money::new(1225, 1));
/// assert_eq!(convert(Money::new(1225, 1), "SAR", "KWD"), Money::new(10, 0));
/// ```
pub fn convert(amount: Money, from_code: &str, to_code: &str) -> Money {
    checked_convert(amount, from_code, to_code).unwrap_or(if amount.is_negative() {
        Money::MIN
    } else {
        Money::MAX
    })
}

/// Like [`convert`], but `None` when the result does not fit in a decimal.
pub fn checked_convert(amount: Money, from_code: &str, to_code: &str) -> Option<Money> {
    let from = Currency::resolve(from_code);
    let to = Currency::resolve(to_code);

    if from.code == to.code {
        return Some(amount);
    }

    amount
        .amount()
        .checked_div(from.exchange_rate())?
        .checked_mul(to.exchange_rate())
        .map(Money::from_decimal)
}

// =============================================================================
// Formatting
// =============================================================================

/// Formats an amount for display.
///
/// Rounds half away from zero to `currency.decimals`, groups thousands with
/// `,`, and puts the symbol before the number (LTR) or after it (RTL).
pub fn format(amount: Money, currency: &Currency, rtl: bool) -> String {
    let number = group_thousands(amount.amount(), currency.decimals);

    if rtl {
        format!("{number} {}", currency.symbol)
    } else {
        format!("{} {number}", currency.symbol)
    }
}

fn group_thousands(value: Decimal, decimals: u32) -> String {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = format!("{:.*}", decimals as usize, rounded.abs());

    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (digits.as_str(), None),
    };

    let mut out = String::with_capacity(digits.len() + int_part.len() / 3 + 1);
    if negative {
        out.push('-');
    }
    let len = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac_part) = frac_part {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

// =============================================================================
// Multi-Currency Price Records
// =============================================================================

/// A price precomputed per currency, e.g. `{"KWD": 10, "SAR": 122.5}`.
///
/// The base-currency entry is the source of truth; the other entries are a
/// display cache that avoids re-converting (and re-rounding) on every render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct PriceRecord(BTreeMap<String, Money>);

impl PriceRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        PriceRecord::default()
    }

    /// Precomputes every supported currency from a base amount, each rounded
    /// to its currency's decimals. The base entry keeps full precision.
    pub fn precompute(base_amount: Money) -> Self {
        let entries = Currency::all()
            .iter()
            .map(|currency| {
                let value = if currency.is_base() {
                    base_amount
                } else {
                    convert(base_amount, BASE_CURRENCY, currency.code).round_dp(currency.decimals)
                };
                (currency.code.to_string(), value)
            })
            .collect();
        PriceRecord(entries)
    }

    /// Sets the entry for a currency code.
    pub fn insert(&mut self, currency_code: &str, amount: Money) {
        self.0.insert(currency_code.to_ascii_uppercase(), amount);
    }

    /// Returns the entry for a currency code, if present.
    pub fn get(&self, currency_code: &str) -> Option<Money> {
        self.0.get(&currency_code.trim().to_ascii_uppercase()).copied()
    }

    /// The canonical base-currency amount (zero when the record lacks one).
    pub fn base_amount(&self) -> Money {
        self.get(BASE_CURRENCY).unwrap_or_default()
    }
}

/// Reads an amount in `to_code` out of a per-currency record.
///
/// Uses the record's own entry when present, otherwise converts from the
/// base-currency entry.
pub fn from_multi_currency_record(record: &PriceRecord, to_code: &str) -> Money {
    let target = Currency::resolve(to_code);
    match record.get(target.code) {
        Some(amount) => amount,
        None => convert(record.base_amount(), BASE_CURRENCY, target.code),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seven_currencies_base_first() {
        let all = Currency::all();
        assert_eq!(all.len(), 7);
        assert!(all[0].is_base());
        assert_eq!(all[0].exchange_rate(), Decimal::ONE);
    }

    #[test]
    fn test_find_is_case_insensitive() {
        assert_eq!(Currency::find("sar").map(|c| c.code), Some("SAR"));
        assert_eq!(Currency::find(" usd ").map(|c| c.code), Some("USD"));
        assert!(Currency::find("GBP").is_none());
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        assert_eq!(Currency::resolve("GBP").code, DEFAULT_CURRENCY);
        assert_eq!(Currency::resolve("").code, DEFAULT_CURRENCY);
    }

    #[test]
    fn test_convert_kwd_to_sar() {
        assert_eq!(
            convert(Money::new(10, 0), "KWD", "SAR"),
            Money::new(1225, 1)
        );
    }

    #[test]
    fn test_convert_between_non_base_currencies() {
        // 122.5 SAR = 10 KWD = 32.6 USD
        assert_eq!(
            convert(Money::new(1225, 1), "SAR", "USD"),
            Money::new(326, 1)
        );
    }

    #[test]
    fn test_convert_unknown_code_uses_default_rate() {
        // Unknown source is treated as KWD
        assert_eq!(
            convert(Money::new(10, 0), "XYZ", "SAR"),
            Money::new(1225, 1)
        );
        // Unknown target is treated as KWD
        assert_eq!(
            convert(Money::new(1225, 1), "SAR", "XYZ"),
            Money::new(10, 0)
        );
    }

    #[test]
    fn test_convert_out_of_range_saturates() {
        assert_eq!(convert(Money::MAX, "KWD", "SAR"), Money::MAX);
        assert_eq!(convert(Money::MIN, "KWD", "USD"), Money::MIN);
        assert_eq!(checked_convert(Money::MAX, "KWD", "SAR"), None);
        assert_eq!(
            checked_convert(Money::new(10, 0), "KWD", "SAR"),
            Some(Money::new(1225, 1))
        );
        // Same currency never overflows
        assert_eq!(checked_convert(Money::MAX, "SAR", "sar"), Some(Money::MAX));
    }

    #[test]
    fn test_format_ltr_and_rtl() {
        let kwd = Currency::resolve("KWD");
        assert_eq!(format(Money::new(245, 1), kwd, false), "KD 24.500");
        assert_eq!(format(Money::new(245, 1), kwd, true), "24.500 KD");
    }

    #[test]
    fn test_format_thousands_separators() {
        let usd = Currency::resolve("USD");
        assert_eq!(format(Money::new(1_234_567_891, 2), usd, false), "$ 12,345,678.91");
        assert_eq!(format(Money::new(999, 0), usd, false), "$ 999.00");
        assert_eq!(format(Money::new(1000, 0), usd, false), "$ 1,000.00");
    }

    #[test]
    fn test_format_rounds_half_away_from_zero() {
        let sar = Currency::resolve("SAR");
        assert_eq!(format(Money::new(10_005, 3), sar, false), "SR 10.01");
        assert_eq!(format(Money::new(10_004, 3), sar, false), "SR 10.00");
        assert_eq!(format(Money::new(-10_005, 3), sar, false), "SR -10.01");
    }

    #[test]
    fn test_format_negative_zero_has_no_sign() {
        let kwd = Currency::resolve("KWD");
        assert_eq!(format(Money::new(-1, 5), kwd, false), "KD 0.000");
    }

    #[test]
    fn test_precompute_rounds_per_currency() {
        let record = PriceRecord::precompute(Money::new(3_333, 3));
        assert_eq!(record.get("KWD"), Some(Money::new(3_333, 3)));
        // 3.333 × 12.25 = 40.82925 → 40.83
        assert_eq!(record.get("SAR"), Some(Money::new(4_083, 2)));
    }

    #[test]
    fn test_multi_currency_record_prefers_existing_entry() {
        let mut record = PriceRecord::new();
        record.insert("KWD", Money::new(10, 0));
        record.insert("SAR", Money::new(125, 0));

        // Stored entry wins over the computed 122.5
        assert_eq!(from_multi_currency_record(&record, "SAR"), Money::new(125, 0));
        // Missing entry is converted from the base amount
        assert_eq!(from_multi_currency_record(&record, "USD"), Money::new(326, 1));
    }

    #[test]
    fn test_multi_currency_record_without_base_is_zero() {
        let mut record = PriceRecord::new();
        record.insert("SAR", Money::new(125, 0));
        assert_eq!(from_multi_currency_record(&record, "AED"), Money::zero());
    }

    #[test]
    fn test_price_record_json_shape() {
        let record: PriceRecord = serde_json::from_str(r#"{"KWD": 10, "SAR": 122.5}"#).unwrap();
        assert_eq!(record.base_amount(), Money::new(10, 0));
        assert_eq!(record.get("sar"), Some(Money::new(1225, 1)));
    }
}
