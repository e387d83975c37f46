//! Atomic catalog publication.
//!
//! Readers pin an `Arc<Catalog>` and work against that immutable view for the
//! whole request. Reloads build a complete replacement off to the side and
//! publish it with a single swap; reloads are serialized with a mutex so only
//! one rebuild runs at a time. Reads never take the lock.

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::sync::Arc;

use super::Catalog;

pub struct CatalogStore {
    snap: ArcSwap<Catalog>,
    reload_lock: Mutex<()>,
}

impl CatalogStore {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            snap: ArcSwap::from_pointee(catalog),
            reload_lock: Mutex::new(()),
        }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Arc<Catalog> {
        self.snap.load_full()
    }

    /// Replace the snapshot outright.
    pub fn publish(&self, catalog: Catalog) {
        let _guard = self.reload_lock.lock();
        self.snap.store(Arc::new(catalog));
    }

    /// Rebuild under the reload lock and publish the result.
    ///
    /// `build` returns the new catalog plus any side value (such as a load
    /// report). If it fails, the current snapshot stays in place.
    pub fn reload_with<R, E>(&self, build: impl FnOnce() -> Result<(Catalog, R), E>) -> Result<R, E> {
        let _guard = self.reload_lock.lock();
        let (catalog, extra) = build()?;
        self.snap.store(Arc::new(catalog));
        Ok(extra)
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new(Catalog::empty())
    }
}
