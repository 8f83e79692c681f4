//! Derived state shared by a geometry and the change notifiers of its attributes.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crate::attribute::TagModifiedFn;
use crate::util::BBox3f;

/// Caches derived from attribute values.
///
/// Geometries hold their runtime in an `Arc`, so notifiers can invalidate caches
/// while the geometry itself is mutably borrowed by a writer.
#[derive(Debug, Default)]
pub struct GeometryRuntime {
    bounds_cache: Mutex<Option<BBox3f>>,
    batch_dirty: AtomicBool,
    change_count: AtomicU64,
}

impl GeometryRuntime {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// New runtime starting with the same cached bounds.
    pub fn duplicate(&self) -> Arc<Self> {
        Arc::new(Self {
            bounds_cache: Mutex::new(*self.bounds_cache.lock()),
            batch_dirty: AtomicBool::new(self.is_batch_dirty()),
            change_count: AtomicU64::new(0),
        })
    }

    /// Cached bounds, computed with `compute` on a miss.
    pub fn bounds(&self, compute: impl FnOnce() -> Option<BBox3f>) -> Option<BBox3f> {
        let mut cache = self.bounds_cache.lock();
        if cache.is_none() {
            *cache = compute();
        }
        *cache
    }

    pub fn has_cached_bounds(&self) -> bool {
        self.bounds_cache.lock().is_some()
    }

    /// Positions changed: drop the bounds and everything else derived from values.
    pub fn tag_positions_changed(&self) {
        *self.bounds_cache.lock() = None;
        self.tag_attribute_changed();
    }

    /// Values of some attribute changed.
    pub fn tag_attribute_changed(&self) {
        self.batch_dirty.store(true, Ordering::Release);
        self.change_count.fetch_add(1, Ordering::AcqRel);
    }

    /// Whether draw data must be rebuilt.
    pub fn is_batch_dirty(&self) -> bool {
        self.batch_dirty.load(Ordering::Acquire)
    }

    pub fn clear_batch_dirty(&self) {
        self.batch_dirty.store(false, Ordering::Release);
    }

    /// Number of changes tagged so far.
    pub fn change_count(&self) -> u64 {
        self.change_count.load(Ordering::Acquire)
    }

    /// Notifier for position writes.
    pub fn positions_tag_fn(self: &Arc<Self>) -> TagModifiedFn {
        let runtime = Arc::clone(self);
        Box::new(move || runtime.tag_positions_changed())
    }

    /// Notifier for generic attribute writes.
    pub fn attribute_tag_fn(self: &Arc<Self>) -> TagModifiedFn {
        let runtime = Arc::clone(self);
        Box::new(move || runtime.tag_attribute_changed())
    }
}
