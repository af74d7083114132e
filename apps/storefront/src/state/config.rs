//! # Configuration State
//!
//! Stores storefront configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. CLI flags (`--currency`, `--rtl`, `--db`)
//! 2. Environment variables (`PIXELVAULT_*`)
//! 3. Defaults (this file)
//!
//! Configuration is read-only after initialization, so no mutex needed.

use pixelvault_core::{currency, Currency, Money};
use serde::Serialize;
use std::path::PathBuf;

use crate::error::ConfigError;

pub const ENV_DB_PATH: &str = "PIXELVAULT_DB_PATH";
pub const ENV_CURRENCY: &str = "PIXELVAULT_CURRENCY";
pub const ENV_RTL: &str = "PIXELVAULT_RTL";
pub const ENV_STORE_NAME: &str = "PIXELVAULT_STORE_NAME";

/// Storefront configuration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Store name shown in headers.
    pub store_name: String,

    /// Display currency for prices and totals.
    pub currency_code: String,

    /// Right-to-left (Arabic) presentation.
    pub rtl: bool,

    /// Database file override. `None` uses the platform data dir.
    pub database_path: Option<PathBuf>,
}

impl Default for ConfigState {
    /// Development defaults: dinars, left-to-right, platform database path.
    fn default() -> Self {
        ConfigState {
            store_name: "PixelVault".to_string(),
            currency_code: currency::DEFAULT_CURRENCY.to_string(),
            rtl: false,
            database_path: None,
        }
    }
}

impl ConfigState {
    /// Creates a ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `PIXELVAULT_DB_PATH`: database file
    /// - `PIXELVAULT_CURRENCY`: display currency (e.g. "SAR")
    /// - `PIXELVAULT_RTL`: `true`/`false`
    /// - `PIXELVAULT_STORE_NAME`: store name
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`ConfigState::from_env`] with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ConfigState::default();

        if let Some(path) = lookup(ENV_DB_PATH).filter(|p| !p.trim().is_empty()) {
            config.database_path = Some(PathBuf::from(path));
        }

        if let Some(code) = lookup(ENV_CURRENCY) {
            config = config.with_currency(ENV_CURRENCY, &code)?;
        }

        if let Some(raw) = lookup(ENV_RTL) {
            config.rtl = parse_bool(ENV_RTL, &raw)?;
        }

        if let Some(store_name) = lookup(ENV_STORE_NAME).filter(|s| !s.trim().is_empty()) {
            config.store_name = store_name;
        }

        Ok(config)
    }

    /// Switches the display currency. `source` names where the value came
    /// from for error messages.
    pub fn with_currency(mut self, source: &str, code: &str) -> Result<Self, ConfigError> {
        let currency = Currency::find(code).ok_or_else(|| ConfigError::UnsupportedCurrency {
            var: source.to_string(),
            value: code.to_string(),
        })?;
        self.currency_code = currency.code.to_string();
        Ok(self)
    }

    /// The display currency record.
    pub fn currency(&self) -> &'static Currency {
        Currency::resolve(&self.currency_code)
    }

    /// Converts a base-currency amount and formats it for display.
    ///
    /// ```rust,ignore
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_money(Money::new(1_234_500, 3)), "KD 1,234.500");
    /// ```
    pub fn format_money(&self, amount: Money) -> String {
        let target = self.currency();
        let converted = currency::convert(amount, currency::BASE_CURRENCY, target.code);
        currency::format(converted, target, self.rtl)
    }
}

fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var: var.to_string(),
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ConfigState::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.currency_code, "KWD");
        assert!(!config.rtl);
        assert!(config.database_path.is_none());
        assert_eq!(config.store_name, "PixelVault");
    }

    #[test]
    fn test_env_overrides() {
        let config = ConfigState::from_lookup(lookup(&[
            (ENV_CURRENCY, "sar"),
            (ENV_RTL, "true"),
            (ENV_DB_PATH, "/tmp/pv.db"),
            (ENV_STORE_NAME, "بيكسل فولت"),
        ]))
        .unwrap();

        assert_eq!(config.currency_code, "SAR");
        assert!(config.rtl);
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/pv.db")));
        assert_eq!(config.store_name, "بيكسل فولت");
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            ConfigState::from_lookup(lookup(&[(ENV_CURRENCY, "EUR")])).unwrap_err(),
            ConfigError::UnsupportedCurrency {
                var: ENV_CURRENCY.to_string(),
                value: "EUR".to_string(),
            }
        );
        assert!(matches!(
            ConfigState::from_lookup(lookup(&[(ENV_RTL, "maybe")])),
            Err(ConfigError::InvalidBool { .. })
        ));
    }

    #[test]
    fn test_format_money_in_display_currency() {
        let config = ConfigState::default();
        assert_eq!(config.format_money(Money::new(12_345, 1)), "KD 1,234.500");

        let config = ConfigState::default().with_currency("test", "SAR").unwrap();
        assert_eq!(config.format_money(Money::new(10, 0)), "SR 122.50");

        let config = ConfigState {
            rtl: true,
            ..config
        };
        assert_eq!(config.format_money(Money::new(10, 0)), "122.50 SR");
    }
}
