//! # PixelVault CLI
//!
//! Drives the storefront commands from a terminal. Every subcommand prints
//! its result as pretty JSON on stdout; failures print an `ApiError` on
//! stderr and exit with status 1.
//!
//! ```bash
//! pixelvault products --currency SAR
//! pixelvault add 1f0c...e9
//! pixelvault promo save10
//! pixelvault show --rtl
//! pixelvault convert 10 KWD USD
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use pixelvault_core::Money;
use serde::Serialize;
use tracing::info;

use pixelvault_storefront::commands::{cart, config as config_cmd, currency, product};
use pixelvault_storefront::error::ApiError;
use pixelvault_storefront::state::ConfigState;
use pixelvault_storefront::{init_tracing, Storefront};

/// PixelVault storefront CLI
#[derive(Debug, Parser)]
#[command(name = "pixelvault", about = "PixelVault storefront cart & pricing", long_about = None)]
struct Cli {
    /// Display currency (KWD, SAR, AED, QAR, BHD, OMR, USD)
    #[arg(long, global = true)]
    currency: Option<String>,

    /// Right-to-left (Arabic) presentation
    #[arg(long, global = true)]
    rtl: bool,

    /// Database file (overrides PIXELVAULT_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the cart
    Show,
    /// Add one unit of a product
    Add { product_id: String },
    /// Remove a product's line
    Remove { product_id: String },
    /// Set a line's quantity (0 or less removes it)
    SetQty {
        product_id: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
    /// Apply a discount code
    Promo { code: String },
    /// Remove the applied discount code
    Unpromo,
    /// List active products
    Products {
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show one product
    Product { product_id: String },
    /// List supported currencies
    Currencies,
    /// Convert an amount between currencies
    Convert { amount: Money, from: String, to: String },
    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            match serde_json::to_string_pretty(&err) {
                Ok(json) => eprintln!("{json}"),
                Err(_) => eprintln!("{err}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<String, ApiError> {
    let mut config = ConfigState::from_env()?;
    if let Some(code) = &cli.currency {
        config = config.with_currency("--currency", code)?;
    }
    if cli.rtl {
        config.rtl = true;
    }
    if let Some(db) = cli.db {
        config.database_path = Some(db);
    }

    // Commands that never touch the store
    match &cli.command {
        Command::Currencies => return to_json(&currency::list_currencies(&config)),
        Command::Convert { amount, from, to } => {
            return to_json(&currency::convert_amount(&config, *amount, from, to)?)
        }
        Command::Config => return to_json(&config_cmd::get_config(&config)),
        _ => {}
    }

    info!("Starting PixelVault storefront");
    let app = Storefront::open(config).await?;
    let result = dispatch(&app, cli.command).await;
    app.shutdown().await;
    result
}

async fn dispatch(app: &Storefront, command: Command) -> Result<String, ApiError> {
    let Storefront { db, cart: store, config } = app;

    match command {
        Command::Show => to_json(&cart::get_cart(store, config)),
        Command::Add { product_id } => {
            to_json(&cart::add_to_cart(db, store, config, &product_id).await?)
        }
        Command::Remove { product_id } => {
            to_json(&cart::remove_from_cart(store, config, &product_id))
        }
        Command::SetQty {
            product_id,
            quantity,
        } => to_json(&cart::update_cart_item(store, config, &product_id, quantity)),
        Command::Clear => to_json(&cart::clear_cart(store, config)),
        Command::Promo { code } => to_json(&cart::apply_promo(db, store, config, &code).await?),
        Command::Unpromo => to_json(&cart::remove_promo(store, config)),
        Command::Products { limit } => to_json(&product::list_products(db, config, limit).await?),
        Command::Product { product_id } => {
            to_json(&product::get_product(db, config, &product_id).await?)
        }
        Command::Currencies => to_json(&currency::list_currencies(config)),
        Command::Convert { amount, from, to } => {
            to_json(&currency::convert_amount(config, amount, &from, &to)?)
        }
        Command::Config => to_json(&config_cmd::get_config(config)),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value).map_err(|e| ApiError::internal(e.to_string()))
}
