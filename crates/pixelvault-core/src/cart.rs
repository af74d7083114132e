//! # Cart & Pricing Engine
//!
//! The shopping cart as a pure state machine: every mutation is a
//! [`CartAction`] fed through [`reduce`], which returns a new, fully
//! consistent [`CartState`].
//!
//! ## Reducer Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Reducer                                         │
//! │                                                                         │
//! │  CartState ──┐                                                          │
//! │              ├──► reduce() ──► apply action ──► recalculate() ──► new   │
//! │  CartAction ─┘                  (lines/promo)    (derived fields) state │
//! │                                                                         │
//! │  Actions                      Effect                                    │
//! │  ───────                      ──────                                    │
//! │  AddLine(item)                +1 on existing id, else append qty 1      │
//! │  RemoveLine(id)               drop line (no-op when absent)             │
//! │  SetQuantity(id, n)           n <= 0 ≡ RemoveLine, else qty = n         │
//! │  Clear                        empty cart, no promo                      │
//! │  ApplyPromo(code, value, ty)  overwrite promo fields                    │
//! │  RemovePromo                  reset promo fields                        │
//! │  Load(snapshot)               replace state, normalize lines            │
//! │                                                                         │
//! │  NOTHING FAILS: bad input degrades to a no-op or a removal.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Totals
//! ```text
//! total_items     = Σ quantity
//! subtotal        = Σ unit_price × quantity          (no rounding)
//! shipping_cost   = FLAT_SHIPPING_FEE if any physical line, else 0
//! discount_amount = subtotal × promo / 100  (percentage)
//!                 | promo                   (fixed, base currency)
//! total           = max(0, subtotal + shipping_cost − discount_amount)
//! ```
//!
//! Amounts saturate at [`Money::MAX`] rather than overflow.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{CatalogItem, DiscountType};
use crate::FLAT_SHIPPING_FEE;

// =============================================================================
// Cart Line
// =============================================================================

/// One product line in the cart.
///
/// ## Invariants
/// - At most one line per `id`
/// - `quantity >= 1`; a line that would reach 0 is removed instead
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLine {
    /// Product id, the join key for every operation.
    pub id: String,

    /// Product title at the time the line was added (display only).
    #[serde(default)]
    pub title: String,

    /// Price per unit in the base currency.
    pub unit_price: Money,

    /// Pre-sale reference price (display only, never used in totals).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_unit_price: Option<Money>,

    /// Digital lines don't trigger shipping.
    pub is_digital: bool,

    /// Units of this product in the cart.
    pub quantity: u32,
}

impl CartLine {
    /// Creates a line with quantity 1 from a catalog item.
    pub fn from_item(item: CatalogItem) -> Self {
        CartLine {
            id: item.id,
            title: item.title,
            unit_price: item.unit_price,
            original_unit_price: item.original_unit_price,
            is_digital: item.is_digital,
            quantity: 1,
        }
    }

    /// `unit_price × quantity`.
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Cart State
// =============================================================================

/// The cart aggregate.
///
/// The derived fields (`total_items` .. `total`) are recomputed after every
/// action and persisted alongside the inputs so a reloaded cart can render
/// before recomputation. They are never mutated on their own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct CartState {
    /// Lines in insertion order.
    pub lines: Vec<CartLine>,

    /// Applied discount code, empty when none.
    pub promo_code: String,

    /// Percentage points or a base-currency amount, per `promo_discount_type`.
    #[serde(with = "rust_decimal::serde::float")]
    #[ts(type = "number")]
    pub promo_discount: Decimal,

    pub promo_discount_type: DiscountType,

    // -- derived --
    pub total_items: u64,
    pub subtotal: Money,
    pub shipping_cost: Money,
    pub discount_amount: Money,
    pub total: Money,
}

/// The closed set of cart mutations.
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    /// Add one unit of a product.
    AddLine(CatalogItem),
    /// Remove a product's line.
    RemoveLine { id: String },
    /// Set a line's absolute quantity; `<= 0` removes the line.
    SetQuantity { id: String, quantity: i64 },
    /// Empty the cart and drop any promo.
    Clear,
    /// Apply a promo. The value is trusted as-is.
    ApplyPromo {
        code: String,
        discount: Decimal,
        discount_type: DiscountType,
    },
    /// Drop the applied promo.
    RemovePromo,
    /// Replace the whole state with a persisted snapshot.
    ///
    /// Callers reloading from storage strip the promo first
    /// (see [`CartState::restore`]).
    Load(CartState),
}

impl CartState {
    /// Creates an empty cart.
    pub fn new() -> Self {
        CartState::default()
    }

    /// Applies an action, consuming the current state.
    ///
    /// ## Example
    /// ```rust
    /// use pixelvault_core::cart::{CartAction, CartState};
    /// use pixelvault_core::types::CatalogItem;
    /// use pixelvault_core::Money;
    ///
    /// let item = CatalogItem::new("A", Money::new(10, 0), true);
    /// let cart = CartState::new()
    ///     .apply(CartAction::AddLine(item.clone()))
    ///     .apply(CartAction::AddLine(item));
    ///
    /// assert_eq!(cart.lines.len(), 1);
    /// assert_eq!(cart.lines[0].quantity, 2);
    /// assert_eq!(cart.total, Money::new(20, 0));
    /// ```
    pub fn apply(mut self, action: CartAction) -> Self {
        match action {
            CartAction::AddLine(item) => self.add_line(item),
            CartAction::RemoveLine { id } => self.remove_line(&id),
            CartAction::SetQuantity { id, quantity } => self.set_quantity(&id, quantity),
            CartAction::Clear => self = CartState::default(),
            CartAction::ApplyPromo {
                code,
                discount,
                discount_type,
            } => {
                self.promo_code = code;
                self.promo_discount = discount;
                self.promo_discount_type = discount_type;
            }
            CartAction::RemovePromo => self.clear_promo(),
            CartAction::Load(snapshot) => {
                self = snapshot;
                self.normalize_lines();
            }
        }

        self.recalculate();
        self
    }

    /// Rebuilds a cart from a persisted snapshot for a new session.
    ///
    /// The snapshot's promo is discarded so a stale or tampered discount
    /// never carries over; totals come out without any discount.
    pub fn restore(snapshot: CartState) -> Self {
        CartState::new().apply(CartAction::Load(snapshot.without_promo()))
    }

    /// Returns a copy of the inputs with the promo fields reset.
    pub fn without_promo(mut self) -> Self {
        self.clear_promo();
        self
    }

    /// Checks if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Finds a line by product id.
    pub fn line(&self, id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.id == id)
    }

    /// Whether a promo code is currently applied.
    pub fn has_promo(&self) -> bool {
        !self.promo_code.is_empty()
    }

    /// Whether any line needs shipping.
    pub fn has_physical_items(&self) -> bool {
        self.lines.iter().any(|l| !l.is_digital)
    }

    // -------------------------------------------------------------------------
    // Line operations
    // -------------------------------------------------------------------------

    fn add_line(&mut self, item: CatalogItem) {
        match self.lines.iter_mut().find(|l| l.id == item.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.lines.push(CartLine::from_item(item)),
        }
    }

    fn remove_line(&mut self, id: &str) {
        self.lines.retain(|l| l.id != id);
    }

    fn set_quantity(&mut self, id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove_line(id);
            return;
        }

        if let Some(line) = self.lines.iter_mut().find(|l| l.id == id) {
            line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
    }

    fn clear_promo(&mut self) {
        self.promo_code.clear();
        self.promo_discount = Decimal::ZERO;
        self.promo_discount_type = DiscountType::default();
    }

    /// Drops zero-quantity lines and merges duplicate ids, keeping the
    /// position of each id's first occurrence.
    fn normalize_lines(&mut self) {
        let mut merged: Vec<CartLine> = Vec::with_capacity(self.lines.len());
        for line in self.lines.drain(..) {
            if line.quantity == 0 {
                continue;
            }
            match merged.iter_mut().find(|l| l.id == line.id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(line.quantity)
                }
                None => merged.push(line),
            }
        }
        self.lines = merged;
    }

    // -------------------------------------------------------------------------
    // Totals
    // -------------------------------------------------------------------------

    fn recalculate(&mut self) {
        self.total_items = self.lines.iter().map(|l| u64::from(l.quantity)).sum();
        self.subtotal = self.lines.iter().map(CartLine::line_total).sum();
        self.shipping_cost = if self.has_physical_items() {
            FLAT_SHIPPING_FEE
        } else {
            Money::zero()
        };
        self.discount_amount = match self.promo_discount_type {
            DiscountType::Percentage => self.subtotal.percentage(self.promo_discount),
            DiscountType::Fixed => Money::from_decimal(self.promo_discount),
        };
        self.total =
            (self.subtotal + self.shipping_cost - self.discount_amount).clamp_non_negative();
    }
}

/// Pure reducer entry point: `(state, action) -> state`.
pub fn reduce(state: &CartState, action: CartAction) -> CartState {
    state.clone().apply(action)
}

// =============================================================================
// Unit Tests
// =============================================================================
