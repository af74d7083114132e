//! # Product Repository
//!
//! Database operations for the storefront catalog.
//!
//! ## Key Operations
//! - Lookup by id (cart adds go through here)
//! - Active catalog listing
//! - Upsert and soft delete

use chrono::{DateTime, Utc};
use pixelvault_core::validation::{validate_price, validate_product_id, validate_product_title};
use pixelvault_core::{Money, Product};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::{parse_money, parse_optional_money};

/// Raw `products` row; amounts still TEXT.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    title: String,
    title_ar: Option<String>,
    price: String,
    original_price: Option<String>,
    is_digital: bool,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = DbError;

    fn try_from(row: ProductRow) -> DbResult<Self> {
        Ok(Product {
            price: parse_money("products.price", &row.price)?,
            original_price: parse_optional_money(
                "products.original_price",
                row.original_price.as_deref(),
            )?,
            id: row.id,
            title: row.title,
            title_ar: row.title_ar,
            is_digital: row.is_digital,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const SELECT_PRODUCT: &str = r#"
    SELECT
        id,
        title,
        title_ar,
        price,
        original_price,
        is_digital,
        is_active,
        created_at,
        updated_at
    FROM products
"#;

fn money_text(amount: Money) -> String {
    amount.amount().to_string()
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
/// let catalog = repo.list_active(50).await?;
/// let product = repo.get_by_id("elden-ring-ps5").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its ID, active or not.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!("{SELECT_PRODUCT} WHERE id = ?1"))
            .bind(id.trim())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Product::try_from).transpose()
    }

    /// Lists active products sorted by title.
    pub async fn list_active(&self, limit: u32) -> DbResult<Vec<Product>> {
        debug!(limit = limit, "Listing active products");

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "{SELECT_PRODUCT} WHERE is_active = 1 ORDER BY title LIMIT ?1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Inserts a product or replaces an existing one with the same id.
    ///
    /// `created_at` of an existing row is preserved. Rejects blank ids or
    /// titles and negative prices with [`DbError::Validation`].
    pub async fn upsert(&self, product: &Product) -> DbResult<()> {
        validate_product_id(&product.id)?;
        validate_product_title(&product.title)?;
        validate_price("price", product.price)?;
        if let Some(original) = product.original_price {
            validate_price("original_price", original)?;
        }
        debug!(id = %product.id, price = %product.price, "Upserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, title, title_ar, price, original_price,
                is_digital, is_active, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                title_ar = excluded.title_ar,
                price = excluded.price,
                original_price = excluded.original_price,
                is_digital = excluded.is_digital,
                is_active = excluded.is_active,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&product.id)
        .bind(&product.title)
        .bind(product.title_ar.as_deref())
        .bind(money_text(product.price))
        .bind(product.original_price.map(money_text))
        .bind(product.is_digital)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Soft-deletes a product so it can no longer be added to a cart.
    ///
    /// Lines already in a cart keep their captured price.
    pub async fn deactivate(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("UPDATE products SET is_active = 0, updated_at = ?2 WHERE id = ?1")
            .bind(id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        debug!(id = %id, "Product deactivated");
        Ok(())
    }

    /// Counts all products, active or not.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use pixelvault_core::ValidationError;

    fn product(id: &str, title: &str, price: Money) -> Product {
        let now = Utc::now();
        Product {
            id: id.to_string(),
            title: title.to_string(),
            title_ar: None,
            price,
            original_price: None,
            is_digital: true,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_upsert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let mut p = product("elden-ring", "Elden Ring", Money::new(19_500, 3));
        p.title_ar = Some("إلدن رينغ".to_string());
        p.original_price = Some(Money::new(24_750, 3));
        repo.upsert(&p).await.unwrap();

        let found = repo.get_by_id("elden-ring").await.unwrap().unwrap();
        assert_eq!(found.title, "Elden Ring");
        assert_eq!(found.title_ar.as_deref(), Some("إلدن رينغ"));
        assert_eq!(found.price, Money::new(19_500, 3));
        assert_eq!(found.original_price, Some(Money::new(24_750, 3)));
        assert!(found.is_on_sale());

        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_replaces_price() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        repo.upsert(&product("fc-25", "EA FC 25", Money::new(20, 0))).await.unwrap();
        repo.upsert(&product("fc-25", "EA FC 25", Money::new(15, 0))).await.unwrap();

        assert_eq!(repo.count().await.unwrap(), 1);
        let found = repo.get_by_id("fc-25").await.unwrap().unwrap();
        assert_eq!(found.price, Money::new(15, 0));
    }

    #[tokio::test]
    async fn test_list_active_sorted_and_filtered() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        repo.upsert(&product("z", "Zelda", Money::new(18, 0))).await.unwrap();
        repo.upsert(&product("a", "Astro Bot", Money::new(17, 0))).await.unwrap();
        repo.upsert(&product("h", "Halo", Money::new(9, 0))).await.unwrap();
        repo.deactivate("h").await.unwrap();

        let titles: Vec<String> = repo
            .list_active(10)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["Astro Bot", "Zelda"]);

        let halo = repo.get_by_id("h").await.unwrap().unwrap();
        assert!(!halo.is_active);
    }

    #[tokio::test]
    async fn test_upsert_rejects_invalid_products() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let negative = product("neg", "Refund Glitch", Money::new(-5, 0));
        assert!(matches!(
            repo.upsert(&negative).await,
            Err(DbError::Validation(ValidationError::MustNotBeNegative { .. }))
        ));

        let mut bad_original = product("orig", "Sale", Money::new(5, 0));
        bad_original.original_price = Some(Money::new(-1, 0));
        assert!(repo.upsert(&bad_original).await.is_err());

        assert!(repo.upsert(&product("blank", "   ", Money::new(5, 0))).await.is_err());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_deactivate_missing_product() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(matches!(
            db.products().deactivate("ghost").await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_corrupt_price_is_invalid_data() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();
        repo.upsert(&product("x", "X", Money::new(1, 0))).await.unwrap();

        sqlx::query("UPDATE products SET price = 'free' WHERE id = 'x'")
            .execute(db.pool())
            .await
            .unwrap();

        assert!(matches!(
            repo.get_by_id("x").await,
            Err(DbError::InvalidData { .. })
        ));
    }
}
