//! # Repository Module
//!
//! Database repository implementations for PixelVault.
//!
//! ```text
//! db.carts()      ──► CartRepository     ──► KvRepository ──► kv_store
//! db.products()   ──► ProductRepository  ──────────────────► products
//! db.discounts()  ──► DiscountRepository ──────────────────► discount_codes
//! ```
//!
//! ## Column Encoding
//! Amounts are stored as decimal TEXT (`"24.500"`) so no precision is lost
//! to SQLite's REAL type; timestamps are RFC 3339 TEXT.

pub mod cart;
pub mod discount;
pub mod kv;
pub mod product;

use pixelvault_core::Money;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::{DbError, DbResult};

/// Parses a decimal TEXT column.
pub(crate) fn parse_decimal(column: &str, raw: &str) -> DbResult<Decimal> {
    Decimal::from_str(raw.trim()).map_err(|e| DbError::invalid_data(column, e))
}

/// Parses a money TEXT column.
pub(crate) fn parse_money(column: &str, raw: &str) -> DbResult<Money> {
    parse_decimal(column, raw).map(Money::from_decimal)
}

/// Parses a nullable money TEXT column.
pub(crate) fn parse_optional_money(column: &str, raw: Option<&str>) -> DbResult<Option<Money>> {
    raw.map(|r| parse_money(column, r)).transpose()
}
