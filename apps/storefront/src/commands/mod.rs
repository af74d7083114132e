//! # Commands
//!
//! The storefront's command surface. Each command takes only the state it
//! needs and returns a serializable response or an [`ApiError`].
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Command               State needed                 Returns            │
//! │  ───────               ────────────                 ───────            │
//! │  get_cart              CartStore, Config            CartView           │
//! │  add_to_cart           Db, CartStore, Config        CartView           │
//! │  update_cart_item      CartStore, Config            CartView           │
//! │  remove_from_cart      CartStore, Config            CartView           │
//! │  clear_cart            CartStore, Config            CartView           │
//! │  apply_promo           Db, CartStore, Config        CartView           │
//! │  remove_promo          CartStore, Config            CartView           │
//! │  list_products         Db, Config                   Vec<ProductView>   │
//! │  get_product           Db, Config                   ProductView        │
//! │  list_currencies       Config                       Vec<CurrencyInfo>  │
//! │  convert_amount        Config                       Conversion         │
//! │  get_config            Config                       ConfigState        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`ApiError`]: crate::error::ApiError

pub mod cart;
pub mod config;
pub mod currency;
pub mod product;
