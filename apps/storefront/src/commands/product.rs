//! # Product Commands
//!
//! Catalog listing and lookup, priced in the display currency.

use pixelvault_core::currency::{self, PriceRecord};
use pixelvault_core::validation::validate_product_id;
use pixelvault_core::{CoreError, Money, Product};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::{ConfigState, DbState};

/// Default page size for catalog listings.
pub const DEFAULT_PRODUCT_LIMIT: u32 = 50;

/// Product as shown to the shopper.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: String,
    /// Title for the configured direction (Arabic when RTL and available).
    pub title: String,
    pub is_digital: bool,
    pub is_on_sale: bool,
    /// Price in the display currency.
    pub price: Money,
    pub price_formatted: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price_formatted: Option<String>,
}

impl ProductView {
    /// Prices `product` through its multi-currency record.
    pub fn render(product: &Product, config: &ConfigState) -> Self {
        let target = config.currency();
        let price = currency::from_multi_currency_record(&product.price_record(), target.code);

        let original_price_formatted = product.original_price.map(|original| {
            let record = PriceRecord::precompute(original);
            let amount = currency::from_multi_currency_record(&record, target.code);
            currency::format(amount, target, config.rtl)
        });

        ProductView {
            id: product.id.clone(),
            title: product.display_title(config.rtl).to_string(),
            is_digital: product.is_digital,
            is_on_sale: product.is_on_sale(),
            price,
            price_formatted: currency::format(price, target, config.rtl),
            original_price_formatted,
        }
    }
}

/// Lists active products sorted by title.
pub async fn list_products(
    db: &DbState,
    config: &ConfigState,
    limit: Option<u32>,
) -> Result<Vec<ProductView>, ApiError> {
    let limit = limit.unwrap_or(DEFAULT_PRODUCT_LIMIT);
    debug!(limit = limit, "list_products command");

    let products = db.inner().products().list_active(limit).await?;
    Ok(products
        .iter()
        .map(|p| ProductView::render(p, config))
        .collect())
}

/// Gets one product by id (inactive products included).
pub async fn get_product(
    db: &DbState,
    config: &ConfigState,
    product_id: &str,
) -> Result<ProductView, ApiError> {
    debug!(product_id = %product_id, "get_product command");
    validate_product_id(product_id)?;

    let product = db
        .inner()
        .products()
        .get_by_id(product_id)
        .await?
        .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

    Ok(ProductView::render(&product, config))
}
