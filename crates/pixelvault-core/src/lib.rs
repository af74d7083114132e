//! # pixelvault-core: Pure Business Logic for PixelVault
//!
//! This crate is the **heart** of the PixelVault storefront backend. It holds
//! the cart reducer, the totals math and the currency service as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        PixelVault Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Storefront (web UI, Arabic / English)              │   │
//! │  │    Shop grid ──► Cart drawer ──► Checkout ──► Stripe           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 apps/storefront (commands)                      │   │
//! │  │    add_to_cart, apply_promo, get_cart, convert_amount ...       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ pixelvault-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌──────────────┐  │   │
//! │  │   │  money   │  │ currency │  │   cart   │  │   discount   │  │   │
//! │  │   │  Money   │  │ Currency │  │ reducer  │  │ DiscountCode │  │   │
//! │  │   │ Decimal  │  │ convert  │  │ totals   │  │   rules      │  │   │
//! │  │   └──────────┘  └──────────┘  └──────────┘  └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 pixelvault-db (Database Layer)                  │   │
//! │  │        cart snapshot, product catalog, discount registry        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`cart`] - Cart state, actions and the reducer
//! - [`currency`] - Static currency table, conversion and formatting
//! - [`discount`] - Discount code registry rules
//! - [`money`] - Exact decimal money type
//! - [`types`] - Catalog types shared with the database layer
//! - [`validation`] - Input validation for commands
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use pixelvault_core::cart::{CartAction, CartState};
//! use pixelvault_core::types::{CatalogItem, DiscountType};
//! use pixelvault_core::Money;
//!
//! let cart = CartState::new()
//!     .apply(CartAction::AddLine(CatalogItem::new("A", Money::new(10, 0), true)))
//!     .apply(CartAction::AddLine(CatalogItem::new("B", Money::new(5, 0), false)))
//!     .apply(CartAction::ApplyPromo {
//!         code: "SAVE10".to_string(),
//!         discount: Money::new(10, 0).amount(),
//!         discount_type: DiscountType::Percentage,
//!     });
//!
//! // 15.000 subtotal + 2.000 shipping - 1.500 discount
//! assert_eq!(cart.total, Money::new(15_500, 3));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod currency;
pub mod discount;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{CartAction, CartLine, CartState};
pub use currency::{Currency, PriceRecord};
pub use discount::{AppliedPromo, DiscountCode};
pub use error::{CoreError, CoreResult, PromoError, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Storage key of the persisted cart snapshot.
pub const CART_STORAGE_KEY: &str = "pixelvault-cart";

/// Flat shipping fee in the base currency (2.000 KWD).
///
/// Charged once per cart as soon as any physical line is present,
/// regardless of how many physical items there are.
pub const FLAT_SHIPPING_FEE: Money = Money::from_parts(2000, 3);
