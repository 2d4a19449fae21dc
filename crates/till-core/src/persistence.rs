//! # Persistence Adapter
//!
//! The key/value byte store that cart and ledger snapshots are written to.
//!
//! ## Snapshot Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Snapshot Lifecycle                                   │
//! │                                                                         │
//! │  CartStore::open / SalesLedger::open ──► load(key)                      │
//! │       missing ─────────────► empty state                               │
//! │       corrupt ─────────────► empty state + warn!                       │
//! │                                                                         │
//! │  every mutating call ──────────────────► save(key, full snapshot)       │
//! │                                                                         │
//! │  reset() ──────────────────────────────► clear(key)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Writes are whole-snapshot; there are no partial or incremental writes.
//! If a save fails the caller keeps its in-memory state and the stored
//! snapshot simply lags behind.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{CoreError, PersistenceResult};

/// Key under which the active cart is stored.
pub const CART_LINES_KEY: &str = "cartLines";

/// Key under which the sales ledger is stored.
pub const SALES_LEDGER_KEY: &str = "salesLedger";

/// Synchronous key/value byte store.
///
/// Methods take `&self` so one adapter can be shared by the cart and the
/// ledger behind an `Arc`; implementations use interior mutability.
pub trait PersistenceAdapter: Send + Sync {
    /// Reads the bytes stored under `key`, or `None` if nothing is stored.
    fn load(&self, key: &str) -> PersistenceResult<Option<Vec<u8>>>;

    /// Replaces whatever is stored under `key` with `bytes`.
    fn save(&self, key: &str, bytes: &[u8]) -> PersistenceResult<()>;

    /// Removes `key`. Clearing a missing key is not an error.
    fn clear(&self, key: &str) -> PersistenceResult<()>;
}

/// Shared handle used by `CartStore` and `SalesLedger`.
pub type SharedAdapter = Arc<dyn PersistenceAdapter>;

// =============================================================================
// Snapshot helpers
// =============================================================================

/// Loads and decodes the snapshot under `key`.
///
/// Fails open: a missing, unreadable or undecodable snapshot yields
/// `T::default()`.
pub(crate) fn load_snapshot<T>(adapter: &dyn PersistenceAdapter, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    let bytes = match adapter.load(key) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            debug!(key, "No stored snapshot, starting empty");
            return T::default();
        }
        Err(e) => {
            warn!(key, error = %e, "Failed to read snapshot, starting empty");
            return T::default();
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        Err(source) => {
            let err = CoreError::Serialization {
                key: key.to_string(),
                source,
            };
            warn!(key, error = %err, "Stored snapshot is corrupt, starting empty");
            T::default()
        }
    }
}

/// Encodes `value` and writes it under `key`, logging any failure.
pub(crate) fn save_snapshot<T>(adapter: &dyn PersistenceAdapter, key: &str, value: &T)
where
    T: Serialize + ?Sized,
{
    let bytes = match serde_json::to_vec(value) {
        Ok(bytes) => bytes,
        Err(source) => {
            let err = CoreError::Serialization {
                key: key.to_string(),
                source,
            };
            warn!(key, error = %err, "Failed to encode snapshot");
            return;
        }
    };

    if let Err(e) = adapter.save(key, &bytes) {
        warn!(key, error = %e, "Failed to persist snapshot; in-memory state kept");
    }
}

/// Erases the snapshot under `key`, logging any failure.
pub(crate) fn clear_snapshot(adapter: &dyn PersistenceAdapter, key: &str) {
    if let Err(e) = adapter.clear(key) {
        warn!(key, error = %e, "Failed to clear snapshot");
    }
}

// =============================================================================
// In-memory adapter
// =============================================================================

/// Adapter backed by a `HashMap`, for tests and embedding hosts that provide
/// their own durability.
#[derive(Debug, Default)]
pub struct MemoryAdapter {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a shared handle, ready to pass to `CartStore::open`.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Whether anything is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    /// Raw bytes stored under `key`.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.lock().get(key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        // A panic while holding the lock cannot leave the map half-written.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PersistenceAdapter for MemoryAdapter {
    fn load(&self, key: &str) -> PersistenceResult<Option<Vec<u8>>> {
        Ok(self.get(key))
    }

    fn save(&self, key: &str, bytes: &[u8]) -> PersistenceResult<()> {
        self.lock().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn clear(&self, key: &str) -> PersistenceResult<()> {
        self.lock().remove(key);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::PersistenceError;

    /// Adapter whose writes always fail; reads return whatever it was seeded with.
    #[derive(Debug, Default)]
    pub(crate) struct FailingAdapter {
        pub(crate) seeded: Option<Vec<u8>>,
    }

    impl PersistenceAdapter for FailingAdapter {
        fn load(&self, _key: &str) -> PersistenceResult<Option<Vec<u8>>> {
            Ok(self.seeded.clone())
        }

        fn save(&self, key: &str, _bytes: &[u8]) -> PersistenceResult<()> {
            Err(PersistenceError::Backend(format!("disk full writing {key}")))
        }

        fn clear(&self, key: &str) -> PersistenceResult<()> {
            Err(PersistenceError::Backend(format!("cannot clear {key}")))
        }
    }

    #[test]
    fn test_memory_adapter_round_trip() {
        let adapter = MemoryAdapter::new();
        assert!(adapter.load("k").unwrap().is_none());

        adapter.save("k", b"[1,2]").unwrap();
        assert_eq!(adapter.load("k").unwrap().as_deref(), Some(&b"[1,2]"[..]));

        adapter.clear("k").unwrap();
        assert!(!adapter.contains("k"));

        // Clearing again is fine
        adapter.clear("k").unwrap();
    }

    #[test]
    fn test_load_snapshot_fails_open_on_corruption() {
        let adapter = MemoryAdapter::new();
        adapter.save("k", b"{not json").unwrap();

        let value: Vec<u32> = load_snapshot(&adapter, "k");
        assert!(value.is_empty());
    }

    #[test]
    fn test_load_snapshot_decodes_valid_bytes() {
        let adapter = MemoryAdapter::new();
        save_snapshot(&adapter, "k", &vec![1u32, 2, 3]);

        let value: Vec<u32> = load_snapshot(&adapter, "k");
        assert_eq!(value, vec![1, 2, 3]);
    }

    #[test]
    fn test_failed_save_is_swallowed() {
        let adapter = FailingAdapter::default();
        save_snapshot(&adapter, "k", &vec![1u32]);
        clear_snapshot(&adapter, "k");
    }
}
