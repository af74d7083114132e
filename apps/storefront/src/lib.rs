//! # PixelVault Storefront Library
//!
//! Backend of the PixelVault gaming storefront: wires configuration, the
//! local store and the cart together and exposes the command surface.
//!
//! ## Module Organization
//! ```text
//! pixelvault_storefront/
//! ├── lib.rs          ◄─── You are here (startup & shutdown)
//! ├── state/
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   ├── cart.rs     ◄─── CartStore (Arc<Mutex<CartState>> + writer task)
//! │   └── config.rs   ◄─── Configuration state
//! ├── commands/
//! │   ├── cart.rs     ◄─── Cart commands + CartView
//! │   ├── product.rs  ◄─── Catalog commands
//! │   ├── currency.rs ◄─── Currency list / conversion
//! │   └── config.rs   ◄─── get_config
//! └── error.rs        ◄─── ApiError / ConfigError
//! ```

pub mod commands;
pub mod error;
pub mod state;

use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use error::{ApiError, ConfigError};
use pixelvault_db::{Database, DbConfig};
use state::{CartStore, ConfigState, DbState};

/// Database file name inside the data directory.
pub const DATABASE_FILE: &str = "pixelvault.db";

/// Everything a command may need, opened once per process.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Resolve database path (config override or platform data dir)       │
/// │  2. Connect to SQLite (WAL) and run pending migrations                 │
/// │  3. Restore the saved cart (promo dropped) and start its writer        │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug)]
pub struct Storefront {
    pub db: DbState,
    pub cart: CartStore,
    pub config: ConfigState,
}

impl Storefront {
    /// Opens the store described by `config`.
    pub async fn open(config: ConfigState) -> Result<Self, ApiError> {
        let db_path = get_database_path(&config)?;
        info!(?db_path, "Database path determined");

        let db = Database::new(DbConfig::new(db_path)).await?;
        Self::with_database(db, config).await
    }

    /// Opens the storefront on an already connected database.
    pub async fn with_database(db: Database, config: ConfigState) -> Result<Self, ApiError> {
        let cart = CartStore::open(&db).await?;
        info!(
            currency = %config.currency_code,
            rtl = config.rtl,
            "Storefront ready"
        );

        Ok(Storefront {
            db: DbState::new(db),
            cart,
            config,
        })
    }

    /// Flushes the cart and closes the database.
    pub async fn shutdown(self) {
        self.cart.shutdown().await;
        self.db.inner().close().await;
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=pixelvault=trace` - Trace for pixelvault crates only
/// - Default: `info,pixelvault=debug,sqlx=warn`
///
/// Logs go to stderr so command output on stdout stays machine-readable.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pixelvault=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Determines the database file path.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.pixelvault.storefront/pixelvault.db`
/// - **Windows**: `%APPDATA%\pixelvault\storefront\data\pixelvault.db`
/// - **Linux**: `~/.local/share/storefront/pixelvault.db`
///
/// `PIXELVAULT_DB_PATH` (or `--db`) overrides the platform location.
pub fn get_database_path(config: &ConfigState) -> Result<PathBuf, ConfigError> {
    if let Some(path) = &config.database_path {
        return Ok(path.clone());
    }

    let proj_dirs =
        ProjectDirs::from("com", "pixelvault", "storefront").ok_or(ConfigError::NoDataDir)?;
    let data_dir = proj_dirs.data_dir();

    std::fs::create_dir_all(data_dir).map_err(|e| ConfigError::DataDir(e.to_string()))?;

    Ok(data_dir.join(DATABASE_FILE))
}
