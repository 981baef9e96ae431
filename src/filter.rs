/// Capability contract the deduper requires from a filter variant.
///
/// A filter answers "have I seen this key" and records keys; nothing else.
/// Variants trade error behavior differently: the classic bloom filter
/// never false-negatives within a layer's lifetime, the inverse filter
/// never false-positives, the stable filter bounds its false-positive rate
/// over an unbounded stream by decaying old entries.
pub trait Filter: Send + Sync {
    /// Returns true if the key is possibly present. Pure, no side effects.
    fn test(&self, key: &[u8]) -> bool;

    /// Records the key. Idempotent in effect.
    fn add(&mut self, key: &[u8]);
}

/// Zero-argument constructor producing a fresh, empty filter instance.
///
/// The factory captures the variant choice and its tuning parameters;
/// the deduper invokes it once per layer at construction and once per
/// rotation, and stays unaware of what it builds.
pub type FilterFactory = Box<dyn Fn() -> Box<dyn Filter> + Send + Sync>;
