//! # Error Types
//!
//! Domain-specific error types for pixelvault-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  pixelvault-core errors (this file)                                    │
//! │  ├── CoreError        - General domain errors                          │
//! │  ├── PromoError       - Discount code rejected by the registry rules   │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  pixelvault-db errors (separate crate)                                 │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  storefront errors (in app)                                            │
//! │  └── ApiError         - What the frontend sees (serialized)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Note
//! The cart reducer itself never returns an error: invalid quantities and
//! unknown ids are normalized. These types cover the layers around it.

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Product exists but is no longer for sale.
    #[error("Product is not available: {0}")]
    ProductUnavailable(String),

    /// Discount code rejected.
    #[error(transparent)]
    Promo(#[from] PromoError),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Promo Error
// =============================================================================

/// Reasons a discount code cannot be applied.
///
/// ## User Workflow
/// ```text
/// Shopper types "WINTER25"
///      │
///      ▼
/// Registry lookup ── missing ──► NotFound
///      │
///      ▼
/// DiscountCode::check(subtotal, now)
///      │
///      ├── is_active = false ───────────► Inactive
///      ├── now < starts_at ─────────────► NotYetActive
///      ├── now >= expires_at ───────────► Expired
///      ├── used_count >= max_uses ──────► UsageLimitReached
///      └── subtotal < min_order_amount ─► MinimumNotMet
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromoError {
    #[error("Discount code not found: {0}")]
    NotFound(String),

    #[error("Discount code {0} is inactive")]
    Inactive(String),

    #[error("Discount code {0} is not active yet")]
    NotYetActive(String),

    #[error("Discount code {0} has expired")]
    Expired(String),

    #[error("Discount code {0} has reached its usage limit")]
    UsageLimitReached(String),

    #[error("Discount code {code} requires a minimum order of {minimum}")]
    MinimumNotMet { code: String, minimum: Money },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for early validation before business logic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: String, max: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
