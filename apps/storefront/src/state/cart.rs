//! # Cart Store
//!
//! The one cart the whole storefront sees, plus its write-behind persistence.
//!
//! ## Thread Safety
//! The cart is wrapped in `Arc<Mutex<T>>`: commands may run concurrently
//! but only one may reduce the cart at a time.
//!
//! ## Dispatch Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Dispatch                                        │
//! │                                                                         │
//! │  command ──► dispatch(action) / try_dispatch(|state| action)           │
//! │                 │                                                       │
//! │                 ├── lock                                                │
//! │                 ├── reduce(&state, action)  (pixelvault-core)          │
//! │                 ├── commit new state                                    │
//! │                 ├── send snapshot ──────────► mpsc (unbounded)         │
//! │                 └── unlock, return snapshot          │                  │
//! │                                                      ▼                  │
//! │                                      writer task: CartRepository::save │
//! │                                      (failures logged, never undone)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Snapshots are queued while the lock is held, so the writer sees them in
//! commit order. When several are queued the writer skips to the newest.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pixelvault_core::cart::reduce;
use pixelvault_core::{CartAction, CartState};
use pixelvault_db::{CartRepository, Database, DbResult};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Handle to the shopper's cart.
///
/// ## Usage
/// ```rust,ignore
/// let store = CartStore::open(&db).await?;
/// let cart = store.dispatch(CartAction::AddLine(item));
/// store.shutdown().await;
/// ```
#[derive(Debug)]
pub struct CartStore {
    cart: Arc<Mutex<CartState>>,
    persist: Option<mpsc::UnboundedSender<CartState>>,
    writer: Option<JoinHandle<()>>,
}

impl CartStore {
    /// Creates a store with no persistence.
    pub fn new(initial: CartState) -> Self {
        CartStore {
            cart: Arc::new(Mutex::new(initial)),
            persist: None,
            writer: None,
        }
    }

    /// Restores the saved cart and starts the snapshot writer.
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn open(db: &Database) -> DbResult<Self> {
        let repo = db.carts();
        let initial = repo.load().await?;
        info!(lines = initial.lines.len(), "Cart loaded");

        let (tx, rx) = mpsc::unbounded_channel();
        let writer = tokio::spawn(run_writer(repo, rx));

        Ok(CartStore {
            cart: Arc::new(Mutex::new(initial)),
            persist: Some(tx),
            writer: Some(writer),
        })
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> CartState {
        self.lock().clone()
    }

    /// Applies one action and returns the committed state.
    pub fn dispatch(&self, action: CartAction) -> CartState {
        let mut cart = self.lock();
        self.commit(&mut cart, action)
    }

    /// Chooses an action from the current state and applies it under the
    /// same lock, so no other dispatch can land in between.
    ///
    /// Nothing is committed when `decide` fails.
    pub fn try_dispatch<F, E>(&self, decide: F) -> Result<CartState, E>
    where
        F: FnOnce(&CartState) -> Result<CartAction, E>,
    {
        let mut cart = self.lock();
        let action = decide(&*cart)?;
        Ok(self.commit(&mut cart, action))
    }

    fn commit(&self, cart: &mut CartState, action: CartAction) -> CartState {
        let next = reduce(cart, action);
        *cart = next.clone();

        if let Some(tx) = &self.persist {
            if tx.send(next.clone()).is_err() {
                warn!("Cart writer has stopped, change not persisted");
            }
        }

        debug!(lines = next.lines.len(), total = %next.total, "Cart committed");
        next
    }

    /// Stops the writer after it has flushed every queued snapshot.
    pub async fn shutdown(mut self) {
        // Closing the channel ends the writer loop once it drains.
        drop(self.persist.take());

        if let Some(writer) = self.writer.take() {
            if let Err(e) = writer.await {
                warn!(error = %e, "Cart writer task failed");
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, CartState> {
        // The reducer cannot leave a half-applied state behind, so a
        // poisoned lock still guards a consistent cart.
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new(CartState::new())
    }
}

async fn run_writer(repo: CartRepository, mut rx: mpsc::UnboundedReceiver<CartState>) {
    while let Some(mut snapshot) = rx.recv().await {
        while let Ok(newer) = rx.try_recv() {
            snapshot = newer;
        }

        if let Err(e) = repo.save(&snapshot).await {
            warn!(error = %e, "Failed to persist cart");
        }
    }
    debug!("Cart writer stopped");
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pixelvault_core::{CatalogItem, DiscountType, Money};
    use pixelvault_db::DbConfig;
    use rust_decimal::Decimal;

    fn item(id: &str, price: i64, digital: bool) -> CatalogItem {
        CatalogItem::new(id, Money::new(price, 0), digital)
    }

    #[test]
    fn test_dispatch_commits() {
        let store = CartStore::default();
        let cart = store.dispatch(CartAction::AddLine(item("A", 10, true)));
        assert_eq!(cart.total, Money::new(10, 0));
        assert_eq!(store.snapshot(), cart);

        store.dispatch(CartAction::SetQuantity {
            id: "A".to_string(),
            quantity: -5,
        });
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_try_dispatch_decides_on_current_state() {
        let store = CartStore::default();
        store.dispatch(CartAction::AddLine(item("A", 10, true)));
        store.dispatch(CartAction::AddLine(item("B", 50, true)));

        let needs_fifty = |cart: &CartState| {
            if cart.subtotal >= Money::new(50, 0) {
                Ok(CartAction::ApplyPromo {
                    code: "BIG20".to_string(),
                    discount: Decimal::from(20),
                    discount_type: DiscountType::Percentage,
                })
            } else {
                Err("minimum not met")
            }
        };

        store.dispatch(CartAction::RemoveLine {
            id: "B".to_string(),
        });
        assert_eq!(store.try_dispatch(needs_fifty), Err("minimum not met"));
        assert!(!store.snapshot().has_promo());
        assert_eq!(store.snapshot().total, Money::new(10, 0));

        store.dispatch(CartAction::AddLine(item("B", 50, true)));
        let cart = store.try_dispatch(needs_fifty).unwrap();
        assert_eq!(cart.promo_code, "BIG20");
        assert_eq!(cart.total, Money::new(48, 0));
        assert_eq!(store.snapshot(), cart);
    }

    #[tokio::test]
    async fn test_shutdown_flushes_last_snapshot() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let store = CartStore::open(&db).await.unwrap();
        store.dispatch(CartAction::AddLine(item("A", 10, true)));
        store.dispatch(CartAction::AddLine(item("A", 10, true)));
        store.dispatch(CartAction::AddLine(item("B", 5, false)));
        store.shutdown().await;

        let reopened = CartStore::open(&db).await.unwrap();
        let cart = reopened.snapshot();
        assert_eq!(cart.line("A").map(|l| l.quantity), Some(2));
        assert_eq!(cart.total, Money::new(27, 0));
        reopened.shutdown().await;
    }

    #[tokio::test]
    async fn test_reopen_drops_promo() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let store = CartStore::open(&db).await.unwrap();
        store.dispatch(CartAction::AddLine(item("A", 20, true)));
        let discounted = store.dispatch(CartAction::ApplyPromo {
            code: "SAVE10".to_string(),
            discount: Decimal::from(10),
            discount_type: DiscountType::Percentage,
        });
        assert_eq!(discounted.total, Money::new(18, 0));
        store.shutdown().await;

        let reopened = CartStore::open(&db).await.unwrap();
        let cart = reopened.snapshot();
        assert!(!cart.has_promo());
        assert_eq!(cart.total, Money::new(20, 0));
        reopened.shutdown().await;
    }

    #[tokio::test]
    async fn test_failed_write_keeps_state() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = CartStore::open(&db).await.unwrap();

        db.close().await;
        let cart = store.dispatch(CartAction::AddLine(item("A", 10, true)));
        store.shutdown().await;

        assert_eq!(cart.total_items, 1);
    }
}
