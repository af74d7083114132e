//! # Discount Codes
//!
//! Eligibility rules for codes held in the discount registry.
//!
//! The cart engine applies whatever promo it is handed; this module is where
//! the application decides whether a registry code may be handed over at all.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::CartAction;
use crate::error::PromoError;
use crate::money::Money;
use crate::types::DiscountType;

/// A discount code as stored in the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DiscountCode {
    /// Normalized (uppercase) code.
    pub code: String,

    pub discount_type: DiscountType,

    /// Percentage points (0-100) or a base-currency amount.
    #[serde(with = "rust_decimal::serde::float")]
    #[ts(type = "number")]
    pub discount_value: Decimal,

    /// Minimum subtotal required, if any.
    pub min_order_amount: Option<Money>,

    /// Maximum number of redemptions (None = unlimited).
    pub max_uses: Option<i64>,

    /// Redemptions so far.
    pub used_count: i64,

    #[ts(as = "String")]
    pub starts_at: DateTime<Utc>,

    /// None = never expires.
    #[ts(as = "Option<String>")]
    pub expires_at: Option<DateTime<Utc>>,

    pub is_active: bool,
}

/// A code that passed [`DiscountCode::check`], ready for the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AppliedPromo {
    pub code: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[ts(type = "number")]
    pub discount: Decimal,
    pub discount_type: DiscountType,
}

impl AppliedPromo {
    /// The cart action applying this promo.
    pub fn into_action(self) -> CartAction {
        CartAction::ApplyPromo {
            code: self.code,
            discount: self.discount,
            discount_type: self.discount_type,
        }
    }
}

impl DiscountCode {
    /// Checks the code against a cart subtotal at time `now`.
    ///
    /// ## Rule Order
    /// 1. inactive
    /// 2. not started yet
    /// 3. expired (`now >= expires_at`)
    /// 4. usage limit reached
    /// 5. minimum order not met
    ///
    /// The first failing rule is reported.
    pub fn check(&self, subtotal: Money, now: DateTime<Utc>) -> Result<AppliedPromo, PromoError> {
        if !self.is_active {
            return Err(PromoError::Inactive(self.code.clone()));
        }

        if now < self.starts_at {
            return Err(PromoError::NotYetActive(self.code.clone()));
        }

        if let Some(expires_at) = self.expires_at {
            if now >= expires_at {
                return Err(PromoError::Expired(self.code.clone()));
            }
        }

        if let Some(max_uses) = self.max_uses {
            if self.used_count >= max_uses {
                return Err(PromoError::UsageLimitReached(self.code.clone()));
            }
        }

        if let Some(minimum) = self.min_order_amount {
            if subtotal < minimum {
                return Err(PromoError::MinimumNotMet {
                    code: self.code.clone(),
                    minimum,
                });
            }
        }

        Ok(AppliedPromo {
            code: self.code.clone(),
            discount: self.discount_value,
            discount_type: self.discount_type,
        })
    }

    /// Remaining redemptions, `None` when unlimited.
    pub fn remaining_uses(&self) -> Option<i64> {
        self.max_uses.map(|max| (max - self.used_count).max(0))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
