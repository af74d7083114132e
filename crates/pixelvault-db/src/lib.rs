//! # pixelvault-db: Local Store for PixelVault
//!
//! SQLite storage for the storefront backend, with sqlx for async access.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        PixelVault Data Flow                             │
//! │                                                                         │
//! │  Storefront command (add_to_cart, apply_promo)                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  pixelvault-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │   │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│ KvRepository   │   │  (embedded)  │  │   │
//! │  │   │               │    │ CartRepository │   │ 001_init.sql │  │   │
//! │  │   │  SqlitePool   │    │ ProductRepo    │   │              │  │   │
//! │  │   │               │    │ DiscountRepo   │   │              │  │   │
//! │  │   └───────────────┘    └────────────────┘   └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file under the platform data dir (pixelvault.db)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pixelvault_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("pixelvault.db")).await?;
//! let cart = db.carts().load().await?;
//! let product = db.products().get_by_id("elden-ring-ps5").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::cart::CartRepository;
pub use repository::discount::DiscountRepository;
pub use repository::kv::KvRepository;
pub use repository::product::ProductRepository;
