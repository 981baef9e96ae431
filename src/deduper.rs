//! Sliding-window deduper over a ring of probabilistic filter layers.
//!
//! Locking policy: the ring (layer vector + current index) sits behind a
//! single `RwLock`. `add`, `try_insert` and `cycle` take the write side, so
//! the test-then-add sequence inside `try_insert` is atomic and an insert
//! can never race a rotation into a layer that is being replaced. `test`
//! takes the read side, which makes window scans linearizable with
//! concurrent rotation instead of tolerating a transient false-negative
//! window around `cycle`. Readers never block each other; the only writer
//! contention that matters is `cycle`, which runs once per rotation period.

use crate::error::{DedupError, Result};
use crate::filter::{Filter, FilterFactory};
use std::sync::RwLock;
use tracing::{debug, trace};

/// Fixed ring of filter layers, one of which is current.
///
/// Layer order encodes recency: the current layer is "now", each step
/// backward in ring order is one rotation older.
struct LayerRing {
    layers: Vec<Box<dyn Filter>>,
    current: usize,
}

impl LayerRing {
    /// Window-wide membership scan in strict recency order.
    fn test(&self, key: &[u8]) -> bool {
        // Duplicates typically arrive close together, so the current layer
        // is the common case and short-circuits the scan.
        if self.layers[self.current].test(key) {
            return true;
        }

        let n = self.layers.len();
        for depth in 1..n {
            let idx = (self.current + n - depth) % n;
            if self.layers[idx].test(key) {
                // hits deep in the window indicate serious arrival skew,
                // since duplicates should show up around the same time
                trace!(depth, "key matched below the current layer");
                return true;
            }
        }

        false
    }
}

/// Approximate duplicate detector over a sliding window of filter layers.
///
/// Memory is fixed at construction: `num_layers` filter instances built by
/// the supplied factory. Keys age out structurally, by [`cycle`] replacing
/// the oldest layer with a fresh one; after `num_layers` rotations without
/// a re-add, a key is guaranteed gone (modulo the variant's residual false
/// positives).
///
/// [`cycle`]: Deduper::cycle
pub struct Deduper {
    ring: RwLock<LayerRing>,
    factory: FilterFactory,
}

impl Deduper {
    /// Creates a deduper with `num_layers` layers, each eagerly built by
    /// `factory`. Fails with [`DedupError::ZeroLayers`] for an empty ring.
    pub fn new(num_layers: usize, factory: FilterFactory) -> Result<Self> {
        if num_layers == 0 {
            return Err(DedupError::ZeroLayers);
        }

        let layers: Vec<Box<dyn Filter>> =
            (0..num_layers).map(|_| factory()).collect();

        Ok(Self {
            ring: RwLock::new(LayerRing { layers, current: 0 }),
            factory,
        })
    }

    /// Ring depth, as configured at construction.
    pub fn num_layers(&self) -> usize {
        self.ring.read().expect("ring lock poisoned").layers.len()
    }

    /// Returns true if `key` is possibly present somewhere in the window,
    /// false if it is definitely in no layer. Does not mutate any layer.
    pub fn test(&self, key: &[u8]) -> bool {
        self.ring.read().expect("ring lock poisoned").test(key)
    }

    /// Records `key` in the current layer. Older layers are never written.
    pub fn add(&self, key: &[u8]) {
        let mut ring = self.ring.write().expect("ring lock poisoned");
        let current = ring.current;
        ring.layers[current].add(key);
    }

    /// Atomic test-then-add: returns true if `key` was newly seen (and is
    /// now recorded), false if it was already somewhere in the window (a
    /// probable duplicate; nothing is written).
    pub fn try_insert(&self, key: &[u8]) -> bool {
        let mut ring = self.ring.write().expect("ring lock poisoned");
        if ring.test(key) {
            return false;
        }
        let current = ring.current;
        ring.layers[current].add(key);
        true
    }

    /// Rotates the window: the oldest layer's filter is dropped, a fresh
    /// one takes its place and becomes current. The caller owns the cadence;
    /// this is the only path by which keys age out.
    pub fn cycle(&self) {
        let mut ring = self.ring.write().expect("ring lock poisoned");
        let next = (ring.current + 1) % ring.layers.len();
        ring.layers[next] = (self.factory)();
        ring.current = next;
        debug!(layer = next, "cycled ring, evicted oldest layer");
    }
}

impl std::fmt::Debug for Deduper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ring = self.ring.read().expect("ring lock poisoned");
        write!(
            f,
            "Deduper {{ layers: {}, current: {} }}",
            ring.layers.len(),
            ring.current
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::ClassicBloomConfigBuilder;

    fn small_factory() -> FilterFactory {
        ClassicBloomConfigBuilder::default()
            .capacity(1000)
            .false_positive_rate(0.001)
            .build()
            .unwrap()
            .into_factory()
            .unwrap()
    }

    #[test]
    fn test_zero_layers_rejected() {
        assert_eq!(
            Deduper::new(0, small_factory()).unwrap_err(),
            DedupError::ZeroLayers
        );
    }

    #[test]
    fn test_single_layer_ring() {
        let d = Deduper::new(1, small_factory()).unwrap();
        d.add(b"aaa");
        assert!(d.test(b"aaa"));

        // one rotation wipes the whole window
        d.cycle();
        assert!(!d.test(b"aaa"));
    }

    #[test]
    fn test_add_goes_to_current_layer_only() {
        let d = Deduper::new(3, small_factory()).unwrap();
        d.add(b"aaa");
        d.cycle();
        d.add(b"bbb");

        // "aaa" now lives one layer down, "bbb" in current; both visible
        assert!(d.test(b"aaa"));
        assert!(d.test(b"bbb"));
    }

    #[test]
    fn test_try_insert_is_test_and_set() {
        let d = Deduper::new(3, small_factory()).unwrap();
        assert!(d.try_insert(b"aaa"));
        assert!(!d.try_insert(b"aaa"));
        assert!(d.test(b"aaa"));
    }

    #[test]
    fn test_num_layers() {
        let d = Deduper::new(4, small_factory()).unwrap();
        assert_eq!(d.num_layers(), 4);
        d.cycle();
        assert_eq!(d.num_layers(), 4);
    }
}
