//! # Domain Types
//!
//! Catalog and discount types shared by the core, the database layer and the
//! storefront commands.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐      ┌─────────────────┐     ┌─────────────────┐  │
//! │  │    Product      │      │   CatalogItem   │     │  DiscountType   │  │
//! │  │  ─────────────  │ ───► │  ─────────────  │     │  ─────────────  │  │
//! │  │  id             │ From │  id, title      │     │  Percentage     │  │
//! │  │  title/title_ar │      │  unit_price     │     │  Fixed          │  │
//! │  │  price          │      │  original_price │     └─────────────────┘  │
//! │  │  is_digital     │      │  is_digital     │                          │
//! │  │  is_active      │      └─────────────────┘                          │
//! │  └─────────────────┘       what the cart needs                         │
//! │   catalog row                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::currency::PriceRecord;
use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product in the storefront catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique identifier.
    pub id: String,

    /// English title.
    pub title: String,

    /// Arabic title, when translated.
    pub title_ar: Option<String>,

    /// Price in the base currency.
    pub price: Money,

    /// Pre-sale reference price, shown struck through.
    pub original_price: Option<Money>,

    /// Digital products (game keys, gift cards) ship for free.
    pub is_digital: bool,

    /// Whether the product can be added to a cart (soft delete).
    pub is_active: bool,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Title for the given text direction, falling back to English.
    pub fn display_title(&self, rtl: bool) -> &str {
        match (&self.title_ar, rtl) {
            (Some(title_ar), true) if !title_ar.trim().is_empty() => title_ar,
            _ => &self.title,
        }
    }

    /// Whether the product is discounted relative to its original price.
    pub fn is_on_sale(&self) -> bool {
        self.original_price
            .map(|original| original > self.price)
            .unwrap_or(false)
    }

    /// Prices in every supported currency, for catalog listings.
    pub fn price_record(&self) -> PriceRecord {
        PriceRecord::precompute(self.price)
    }
}

// =============================================================================
// Catalog Item
// =============================================================================

/// The slice of a product the cart copies into a line.
///
/// This is the product catalog's lookup shape:
/// `{id, title, unitPrice, originalUnitPrice?, isDigital}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CatalogItem {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub unit_price: Money,
    #[serde(default)]
    pub original_unit_price: Option<Money>,
    pub is_digital: bool,
}

impl CatalogItem {
    /// Creates an untitled catalog item.
    pub fn new(id: impl Into<String>, unit_price: Money, is_digital: bool) -> Self {
        CatalogItem {
            id: id.into(),
            title: String::new(),
            unit_price,
            original_unit_price: None,
            is_digital,
        }
    }

    /// Sets the display title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the pre-sale reference price.
    pub fn with_original_price(mut self, original: Money) -> Self {
        self.original_unit_price = Some(original);
        self
    }
}

impl From<&Product> for CatalogItem {
    fn from(product: &Product) -> Self {
        CatalogItem {
            id: product.id.clone(),
            title: product.title.clone(),
            unit_price: product.price,
            original_unit_price: product.original_price,
            is_digital: product.is_digital,
        }
    }
}

// =============================================================================
// Discount Type
// =============================================================================

/// How a promo's discount value is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum DiscountType {
    /// Value is percentage points of the subtotal.
    #[default]
    Percentage,
    /// Value is an amount in the base currency.
    Fixed,
}

impl DiscountType {
    /// Stable string form, used in the database and the snapshot.
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Percentage => "percentage",
            DiscountType::Fixed => "fixed",
        }
    }
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiscountType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "percentage" | "percent" => Ok(DiscountType::Percentage),
            "fixed" => Ok(DiscountType::Fixed),
            _ => Err(ValidationError::NotAllowed {
                field: "discount_type".to_string(),
                allowed: vec!["percentage".to_string(), "fixed".to_string()],
            }),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(title_ar: Option<&str>) -> Product {
        Product {
            id: "elden-ring-ps5".to_string(),
            title: "Elden Ring (PS5)".to_string(),
            title_ar: title_ar.map(str::to_string),
            price: Money::new(15_500, 3),
            original_price: Some(Money::new(19_900, 3)),
            is_digital: false,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_display_title_prefers_arabic_in_rtl() {
        let p = product(Some("إلدن رينج"));
        assert_eq!(p.display_title(true), "إلدن رينج");
        assert_eq!(p.display_title(false), "Elden Ring (PS5)");
    }

    #[test]
    fn test_display_title_falls_back_to_english() {
        assert_eq!(product(None).display_title(true), "Elden Ring (PS5)");
        assert_eq!(product(Some("  ")).display_title(true), "Elden Ring (PS5)");
    }

    #[test]
    fn test_is_on_sale() {
        let mut p = product(None);
        assert!(p.is_on_sale());
        p.original_price = None;
        assert!(!p.is_on_sale());
    }

    #[test]
    fn test_catalog_item_from_product() {
        let p = product(None);
        let item = CatalogItem::from(&p);
        assert_eq!(item.id, p.id);
        assert_eq!(item.unit_price, p.price);
        assert_eq!(item.original_unit_price, p.original_price);
        assert!(!item.is_digital);
    }

    #[test]
    fn test_discount_type_parse() {
        assert_eq!("Percentage".parse::<DiscountType>().unwrap(), DiscountType::Percentage);
        assert_eq!("fixed".parse::<DiscountType>().unwrap(), DiscountType::Fixed);
        assert!("bogo".parse::<DiscountType>().is_err());
    }

    #[test]
    fn test_discount_type_serde() {
        assert_eq!(
            serde_json::to_string(&DiscountType::Fixed).unwrap(),
            "\"fixed\""
        );
    }
}
