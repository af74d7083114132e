//! # Cart Commands
//!
//! Commands for cart manipulation. Every command returns the cart rendered
//! in the configured display currency.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐   add_to_cart     ┌──────────┐   apply_promo  ┌────────┐ │
//! │  │  Empty   │──────────────────►│ In Cart  │───────────────►│ Promo  │ │
//! │  │  Cart    │                   │          │◄───────────────│ Applied│ │
//! │  └──────────┘                   └──────────┘  remove_promo  └────────┘ │
//! │       ▲                          │   update_cart_item            │     │
//! │       │                          │   remove_from_cart            │     │
//! │       └──────── clear_cart ──────┴───────────────────────────────┘     │
//! │                                                                         │
//! │  App restart: cart reloads, promo is dropped                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use pixelvault_core::currency::{self, Currency, BASE_CURRENCY};
use pixelvault_core::validation::{normalize_promo_code, validate_product_id};
use pixelvault_core::{
    AppliedPromo, CartAction, CartLine, CartState, CatalogItem, CoreError, Money, PromoError,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{CartStore, ConfigState, DbState};

// =============================================================================
// Cart View
// =============================================================================

/// A cart line priced in the display currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    pub id: String,
    pub title: String,
    pub quantity: u32,
    pub is_digital: bool,
    pub unit_price: Money,
    pub line_total: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_unit_price: Option<Money>,
    pub unit_price_formatted: String,
    pub line_total_formatted: String,
}

/// Totals as display strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedTotals {
    pub subtotal: String,
    pub shipping_cost: String,
    pub discount_amount: String,
    pub total: String,
}

/// A cart snapshot rendered into a display currency.
///
/// Amounts are converted from the base currency and rounded to the display
/// currency's decimals; the engine's own state is never touched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub currency: &'static str,
    pub rtl: bool,
    pub lines: Vec<CartLineView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,
    pub total_items: u64,
    pub subtotal: Money,
    pub shipping_cost: Money,
    pub discount_amount: Money,
    pub total: Money,
    pub formatted: FormattedTotals,
}

impl CartView {
    /// Renders `cart` in `target`.
    pub fn render(cart: &CartState, target: &'static Currency, rtl: bool) -> Self {
        let convert = |amount: Money| {
            currency::convert(amount, BASE_CURRENCY, target.code).round_dp(target.decimals)
        };
        let display = |amount: Money| currency::format(amount, target, rtl);

        let lines = cart
            .lines
            .iter()
            .map(|line: &CartLine| {
                let unit_price = convert(line.unit_price);
                let line_total = convert(line.line_total());
                CartLineView {
                    id: line.id.clone(),
                    title: line.title.clone(),
                    quantity: line.quantity,
                    is_digital: line.is_digital,
                    unit_price,
                    line_total,
                    original_unit_price: line.original_unit_price.map(&convert),
                    unit_price_formatted: display(unit_price),
                    line_total_formatted: display(line_total),
                }
            })
            .collect();

        let subtotal = convert(cart.subtotal);
        let shipping_cost = convert(cart.shipping_cost);
        let discount_amount = convert(cart.discount_amount);
        let total = convert(cart.total);

        CartView {
            currency: target.code,
            rtl,
            lines,
            promo_code: cart.has_promo().then(|| cart.promo_code.clone()),
            total_items: cart.total_items,
            subtotal,
            shipping_cost,
            discount_amount,
            total,
            formatted: FormattedTotals {
                subtotal: display(subtotal),
                shipping_cost: display(shipping_cost),
                discount_amount: display(discount_amount),
                total: display(total),
            },
        }
    }

    /// Renders `cart` with the configured currency and direction.
    pub fn for_config(cart: &CartState, config: &ConfigState) -> Self {
        Self::render(cart, config.currency(), config.rtl)
    }
}

// =============================================================================
// Commands
// =============================================================================

/// Gets the current cart contents.
pub fn get_cart(cart: &CartStore, config: &ConfigState) -> CartView {
    debug!("get_cart command");
    CartView::for_config(&cart.snapshot(), config)
}

/// Adds one unit of a catalog product.
///
/// ## Flow
/// 1. Look the product up (price is captured now, later catalog edits
///    don't change the line)
/// 2. Reject unknown or deactivated products
/// 3. Dispatch `AddLine`
pub async fn add_to_cart(
    db: &DbState,
    cart: &CartStore,
    config: &ConfigState,
    product_id: &str,
) -> Result<CartView, ApiError> {
    debug!(product_id = %product_id, "add_to_cart command");
    validate_product_id(product_id)?;

    let product = db
        .inner()
        .products()
        .get_by_id(product_id)
        .await?
        .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

    if !product.is_active {
        return Err(CoreError::ProductUnavailable(product.id).into());
    }

    let state = cart.dispatch(CartAction::AddLine(CatalogItem::from(&product)));
    Ok(CartView::for_config(&state, config))
}

/// Sets a line's quantity. Zero or negative removes it; unknown ids are a no-op.
pub fn update_cart_item(
    cart: &CartStore,
    config: &ConfigState,
    product_id: &str,
    quantity: i64,
) -> CartView {
    debug!(product_id = %product_id, quantity = quantity, "update_cart_item command");

    let state = cart.dispatch(CartAction::SetQuantity {
        id: product_id.to_string(),
        quantity,
    });
    CartView::for_config(&state, config)
}

/// Removes a line. Removing an absent id is a no-op.
pub fn remove_from_cart(cart: &CartStore, config: &ConfigState, product_id: &str) -> CartView {
    debug!(product_id = %product_id, "remove_from_cart command");

    let state = cart.dispatch(CartAction::RemoveLine {
        id: product_id.to_string(),
    });
    CartView::for_config(&state, config)
}

/// Empties the cart and drops any promo.
pub fn clear_cart(cart: &CartStore, config: &ConfigState) -> CartView {
    debug!("clear_cart command");
    let state = cart.dispatch(CartAction::Clear);
    CartView::for_config(&state, config)
}

/// Applies a discount code from the registry.
///
/// ## Flow
/// ```text
/// "  save10 " ──► normalize ──► "SAVE10"
///                                  │
///                                  ▼
///                  registry lookup ── missing ──► NOT_FOUND
///                                  │
///                                  ▼
///   try_dispatch: DiscountCode::check(subtotal, now) ── rule fails ──► PROMO_REJECTED
///                                  │      (same lock as the commit)
///                                  ▼
///                              ApplyPromo
/// ```
pub async fn apply_promo(
    db: &DbState,
    cart: &CartStore,
    config: &ConfigState,
    code: &str,
) -> Result<CartView, ApiError> {
    let code = normalize_promo_code(code)?;
    debug!(code = %code, "apply_promo command");

    let discount = db
        .inner()
        .discounts()
        .get_by_code(&code)
        .await?
        .ok_or_else(|| PromoError::NotFound(code.clone()))?;

    let now = Utc::now();
    let state = cart.try_dispatch(|state| {
        discount
            .check(state.subtotal, now)
            .map(AppliedPromo::into_action)
    })?;

    info!(code = %discount.code, kind = %discount.discount_type, "Promo applied");
    Ok(CartView::for_config(&state, config))
}

/// Drops the applied promo.
pub fn remove_promo(cart: &CartStore, config: &ConfigState) -> CartView {
    debug!("remove_promo command");
    let state = cart.dispatch(CartAction::RemovePromo);
    CartView::for_config(&state, config)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use chrono::Duration;
    use pixelvault_core::{DiscountCode, DiscountType, Product};
    use pixelvault_db::{Database, DbConfig};
    use rust_decimal::Decimal;

    fn product(id: &str, price: Money, digital: bool) -> Product {
        let now = Utc::now();
        Product {
            id: id.to_string(),
            title: format!("Game {}", id),
            title_ar: None,
            price,
            original_price: None,
            is_digital: digital,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn code(code: &str, discount_type: DiscountType, value: i64) -> DiscountCode {
        DiscountCode {
            code: code.to_string(),
            discount_type,
            discount_value: Decimal::from(value),
            min_order_amount: None,
            max_uses: None,
            used_count: 0,
            starts_at: Utc::now() - Duration::days(1),
            expires_at: None,
            is_active: true,
        }
    }

    async fn setup() -> (DbState, CartStore, ConfigState) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let products = db.products();
        products.upsert(&product("A", Money::new(10, 0), true)).await.unwrap();
        products.upsert(&product("B", Money::new(5, 0), false)).await.unwrap();
        products.upsert(&product("OLD", Money::new(3, 0), true)).await.unwrap();
        products.deactivate("OLD").await.unwrap();

        let discounts = db.discounts();
        discounts.upsert(&code("SAVE10", DiscountType::Percentage, 10)).await.unwrap();
        discounts.upsert(&code("HUNDRED", DiscountType::Fixed, 100)).await.unwrap();
        let mut big = code("BIG20", DiscountType::Percentage, 20);
        big.min_order_amount = Some(Money::new(50, 0));
        discounts.upsert(&big).await.unwrap();

        (DbState::new(db), CartStore::default(), ConfigState::default())
    }

    #[tokio::test]
    async fn test_checkout_walkthrough() {
        let (db, cart, config) = setup().await;

        let view = add_to_cart(&db, &cart, &config, "A").await.unwrap();
        assert_eq!(view.total, Money::new(10, 0));

        let view = add_to_cart(&db, &cart, &config, "A").await.unwrap();
        assert_eq!(view.lines[0].quantity, 2);
        assert_eq!(view.total, Money::new(20, 0));

        let view = add_to_cart(&db, &cart, &config, "B").await.unwrap();
        assert_eq!(view.subtotal, Money::new(25, 0));
        assert_eq!(view.shipping_cost, Money::new(2, 0));
        assert_eq!(view.total, Money::new(27, 0));
        assert_eq!(view.formatted.total, "KD 27.000");

        let view = apply_promo(&db, &cart, &config, " save10 ").await.unwrap();
        assert_eq!(view.promo_code.as_deref(), Some("SAVE10"));
        assert_eq!(view.discount_amount, Money::new(25, 1));
        assert_eq!(view.total, Money::new(24_500, 3));

        let view = apply_promo(&db, &cart, &config, "HUNDRED").await.unwrap();
        assert_eq!(view.total, Money::zero());

        let view = remove_promo(&cart, &config);
        assert_eq!(view.total, Money::new(27, 0));

        let view = update_cart_item(&cart, &config, "B", 0);
        assert_eq!(view.shipping_cost, Money::zero());

        let view = remove_from_cart(&cart, &config, "A");
        assert!(view.lines.is_empty());

        add_to_cart(&db, &cart, &config, "A").await.unwrap();
        let view = clear_cart(&cart, &config);
        assert_eq!(view.total_items, 0);
    }

    #[tokio::test]
    async fn test_add_unknown_or_inactive_product() {
        let (db, cart, config) = setup().await;

        let err = add_to_cart(&db, &cart, &config, "ZZZ").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = add_to_cart(&db, &cart, &config, "OLD").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = add_to_cart(&db, &cart, &config, "  ").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        assert!(cart.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_apply_promo_rejections() {
        let (db, cart, config) = setup().await;
        add_to_cart(&db, &cart, &config, "A").await.unwrap();

        let err = apply_promo(&db, &cart, &config, "NOPE").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = apply_promo(&db, &cart, &config, "BIG20").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PromoRejected);

        let err = apply_promo(&db, &cart, &config, "50% OFF").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        assert!(!cart.snapshot().has_promo());
    }

    #[test]
    fn test_render_in_display_currency() {
        let cart = CartState::new()
            .apply(CartAction::AddLine(CatalogItem::new("A", Money::new(10, 0), true)))
            .apply(CartAction::AddLine(CatalogItem::new("B", Money::new(5, 0), false)));

        let view = CartView::render(&cart, Currency::resolve("SAR"), false);
        assert_eq!(view.currency, "SAR");
        assert_eq!(view.lines[0].unit_price, Money::new(1225, 1));
        assert_eq!(view.shipping_cost, Money::new(245, 1));
        assert_eq!(view.total, Money::new(20_825, 2));
        assert_eq!(view.formatted.total, "SR 208.25");

        let view = CartView::render(&cart, Currency::resolve("KWD"), true);
        assert_eq!(view.formatted.subtotal, "15.000 KD");
        assert_eq!(view.lines[1].line_total_formatted, "5.000 KD");
    }
}
