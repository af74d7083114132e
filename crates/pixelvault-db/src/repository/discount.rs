//! # Discount Code Repository
//!
//! Registry of promo codes the storefront accepts. Eligibility rules live in
//! [`pixelvault_core::DiscountCode::check`]; this module only stores codes
//! and counts redemptions.

use chrono::{DateTime, Utc};
use pixelvault_core::validation::{normalize_promo_code, validate_discount_value, validate_price};
use pixelvault_core::{DiscountCode, DiscountType};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::{parse_decimal, parse_optional_money};

#[derive(Debug, sqlx::FromRow)]
struct DiscountRow {
    code: String,
    discount_type: String,
    discount_value: String,
    min_order_amount: Option<String>,
    max_uses: Option<i64>,
    used_count: i64,
    starts_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    is_active: bool,
}

impl TryFrom<DiscountRow> for DiscountCode {
    type Error = DbError;

    fn try_from(row: DiscountRow) -> DbResult<Self> {
        Ok(DiscountCode {
            discount_type: DiscountType::from_str(&row.discount_type)
                .map_err(|e| DbError::invalid_data("discount_codes.discount_type", e))?,
            discount_value: parse_decimal("discount_codes.discount_value", &row.discount_value)?,
            min_order_amount: parse_optional_money(
                "discount_codes.min_order_amount",
                row.min_order_amount.as_deref(),
            )?,
            code: row.code,
            max_uses: row.max_uses,
            used_count: row.used_count,
            starts_at: row.starts_at,
            expires_at: row.expires_at,
            is_active: row.is_active,
        })
    }
}

/// Repository for the `discount_codes` table.
#[derive(Debug, Clone)]
pub struct DiscountRepository {
    pool: SqlitePool,
}

impl DiscountRepository {
    /// Creates a new DiscountRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DiscountRepository { pool }
    }

    /// Looks up a code, case-insensitively.
    pub async fn get_by_code(&self, code: &str) -> DbResult<Option<DiscountCode>> {
        let code = code.trim().to_ascii_uppercase();
        debug!(code = %code, "Looking up discount code");

        let row = sqlx::query_as::<_, DiscountRow>(
            r#"
            SELECT
                code,
                discount_type,
                discount_value,
                min_order_amount,
                max_uses,
                used_count,
                starts_at,
                expires_at,
                is_active
            FROM discount_codes
            WHERE code = ?1
            "#,
        )
        .bind(&code)
        .fetch_optional(&self.pool)
        .await?;

        row.map(DiscountCode::try_from).transpose()
    }

    /// Inserts or replaces a code. The stored code is uppercased.
    ///
    /// `used_count` of an existing row is kept. Malformed codes, percentages
    /// outside 0..=100 and negative amounts are rejected with
    /// [`DbError::Validation`].
    pub async fn upsert(&self, discount: &DiscountCode) -> DbResult<()> {
        let code = normalize_promo_code(&discount.code)?;
        validate_discount_value(discount.discount_type, discount.discount_value)?;
        if let Some(minimum) = discount.min_order_amount {
            validate_price("min_order_amount", minimum)?;
        }
        debug!(code = %code, kind = %discount.discount_type, "Upserting discount code");

        sqlx::query(
            r#"
            INSERT INTO discount_codes (
                code, discount_type, discount_value, min_order_amount,
                max_uses, used_count, starts_at, expires_at, is_active
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(code) DO UPDATE SET
                discount_type = excluded.discount_type,
                discount_value = excluded.discount_value,
                min_order_amount = excluded.min_order_amount,
                max_uses = excluded.max_uses,
                starts_at = excluded.starts_at,
                expires_at = excluded.expires_at,
                is_active = excluded.is_active
            "#,
        )
        .bind(&code)
        .bind(discount.discount_type.as_str())
        .bind(discount.discount_value.to_string())
        .bind(discount.min_order_amount.map(|m| m.amount().to_string()))
        .bind(discount.max_uses)
        .bind(discount.used_count)
        .bind(discount.starts_at)
        .bind(discount.expires_at)
        .bind(discount.is_active)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Counts one redemption.
    pub async fn record_use(&self, code: &str) -> DbResult<()> {
        let code = code.trim().to_ascii_uppercase();

        let result =
            sqlx::query("UPDATE discount_codes SET used_count = used_count + 1 WHERE code = ?1")
                .bind(&code)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Discount code", code));
        }

        debug!(code = %code, "Discount code redemption recorded");
        Ok(())
    }

    /// Counts all codes.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM discount_codes")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
