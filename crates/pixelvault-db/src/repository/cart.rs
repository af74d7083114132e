//! # Cart Snapshot Repository
//!
//! Saves and reloads the shopper's cart as one JSON document.
//!
//! ## Reload Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  kv_store["pixelvault-cart"]                                           │
//! │       │                                                                 │
//! │       ├── missing ─────────────────────────► CartState::new()          │
//! │       │                                                                 │
//! │       ├── not valid JSON ── warn! ─────────► CartState::new()          │
//! │       │                                                                 │
//! │       └── snapshot ──► CartState::restore                              │
//! │                        (promo stripped, Load, totals recomputed)       │
//! │                             │                                           │
//! │                             └── totals out of range ── warn! ──► new()  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A reloaded cart never carries a discount: promo codes must be re-entered.

use pixelvault_core::{CartState, CART_STORAGE_KEY};
use tracing::{debug, warn};

use crate::error::DbResult;
use crate::repository::kv::KvRepository;

/// Repository for the persisted cart snapshot.
#[derive(Debug, Clone)]
pub struct CartRepository {
    kv: KvRepository,
}

impl CartRepository {
    /// Creates a new CartRepository on top of the key-value store.
    pub fn new(kv: KvRepository) -> Self {
        CartRepository { kv }
    }

    /// Persists a committed cart state.
    pub async fn save(&self, cart: &CartState) -> DbResult<()> {
        let json = serde_json::to_string(cart)?;
        debug!(lines = cart.lines.len(), total = %cart.total, "Saving cart snapshot");
        self.kv.set(CART_STORAGE_KEY, &json).await
    }

    /// Reloads the cart. Only storage failures are errors.
    pub async fn load(&self) -> DbResult<CartState> {
        let Some(json) = self.kv.get(CART_STORAGE_KEY).await? else {
            debug!("No saved cart, starting empty");
            return Ok(CartState::new());
        };

        match serde_json::from_str::<CartState>(&json) {
            Ok(snapshot) => {
                let cart = CartState::restore(snapshot);
                if cart.subtotal.is_saturated() {
                    warn!(
                        lines = cart.lines.len(),
                        "Saved cart totals are out of range, starting with an empty cart"
                    );
                    return Ok(CartState::new());
                }
                debug!(lines = cart.lines.len(), "Cart restored");
                Ok(cart)
            }
            Err(e) => {
                warn!(error = %e, "Saved cart is unreadable, starting with an empty cart");
                Ok(CartState::new())
            }
        }
    }

    /// Removes the saved snapshot.
    pub async fn clear(&self) -> DbResult<()> {
        self.kv.delete(CART_STORAGE_KEY).await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use pixelvault_core::{CartAction, CatalogItem, DiscountType, Money};
    use rust_decimal::Decimal;

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn cart_with_promo() -> CartState {
        CartState::new()
            .apply(CartAction::AddLine(
                CatalogItem::new("A", Money::new(10, 0), true).with_title("Gift Card"),
            ))
            .apply(CartAction::AddLine(CatalogItem::new("B", Money::new(5, 0), false)))
            .apply(CartAction::ApplyPromo {
                code: "SAVE10".to_string(),
                discount: Decimal::from(10),
                discount_type: DiscountType::Percentage,
            })
    }

    #[tokio::test]
    async fn test_missing_snapshot_loads_empty() {
        let db = db().await;
        assert_eq!(db.carts().load().await.unwrap(), CartState::new());
    }

    #[tokio::test]
    async fn test_reload_strips_promo() {
        let db = db().await;
        let cart = cart_with_promo();
        assert_eq!(cart.total, Money::new(15_500, 3));

        db.carts().save(&cart).await.unwrap();
        let restored = db.carts().load().await.unwrap();

        assert_eq!(restored.lines, cart.lines);
        assert!(!restored.has_promo());
        assert_eq!(restored.discount_amount, Money::zero());
        assert_eq!(restored.total, Money::new(17, 0));
    }

    #[tokio::test]
    async fn test_corrupted_snapshot_loads_empty() {
        let db = db().await;
        db.kv().set(CART_STORAGE_KEY, "{not json").await.unwrap();

        assert_eq!(db.carts().load().await.unwrap(), CartState::new());
    }

    #[tokio::test]
    async fn test_out_of_range_snapshot_loads_empty() {
        let db = db().await;
        db.kv()
            .set(
                CART_STORAGE_KEY,
                r#"{"lines":[{"id":"A","unitPrice":5e28,"isDigital":true,"quantity":2}]}"#,
            )
            .await
            .unwrap();

        assert_eq!(db.carts().load().await.unwrap(), CartState::new());
        // The store opens every time, not just once
        assert_eq!(db.carts().load().await.unwrap(), CartState::new());
    }

    #[tokio::test]
    async fn test_snapshot_uses_camel_case_layout() {
        let db = db().await;
        db.carts().save(&cart_with_promo()).await.unwrap();

        let raw = db.kv().get(CART_STORAGE_KEY).await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(value["promoCode"], "SAVE10");
        assert_eq!(value["promoDiscountType"], "percentage");
        assert_eq!(value["shippingCost"], 2.0);
        assert_eq!(value["lines"][0]["unitPrice"], 10.0);
        assert_eq!(value["lines"][0]["isDigital"], true);
    }

    #[tokio::test]
    async fn test_clear_removes_snapshot() {
        let db = db().await;
        db.carts().save(&cart_with_promo()).await.unwrap();
        db.carts().clear().await.unwrap();

        assert!(db.kv().get(CART_STORAGE_KEY).await.unwrap().is_none());
    }
}
