use crate::error::{DedupError, Result};
use crate::filter::{Filter, FilterFactory};
use crate::hash::hash_murmur32;
use derive_builder::Builder;

/// Configuration for the inverse bloom filter variant.
#[derive(Clone, Debug, Builder)]
#[builder(pattern = "owned")]
pub struct InverseBloomConfig {
    /// Number of buckets; collisions evict, so size for the number of
    /// distinct keys expected in flight per layer
    #[builder(default = "1_000_000")]
    pub capacity: usize,
}

impl InverseBloomConfig {
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(DedupError::ZeroCapacity);
        }
        Ok(())
    }

    pub fn into_factory(self) -> Result<FilterFactory> {
        self.validate()?;
        Ok(Box::new(move || {
            Box::new(InverseBloomFilter::with_capacity(self.capacity))
        }))
    }
}

/// Concurrent-sighting filter optimized for recently-added recall.
///
/// Each bucket remembers the last key hashed to it. A key tests positive
/// while its bucket still holds it, so the filter never false-positives;
/// a different key landing in the same bucket evicts the previous one,
/// which is the (accepted) false-negative path.
pub struct InverseBloomFilter {
    buckets: Vec<Option<Box<[u8]>>>,
}

impl InverseBloomFilter {
    pub fn new(config: InverseBloomConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_capacity(config.capacity))
    }

    fn with_capacity(capacity: usize) -> Self {
        Self {
            buckets: vec![None; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    fn bucket_index(&self, key: &[u8]) -> usize {
        hash_murmur32(key) as usize % self.buckets.len()
    }
}

impl Filter for InverseBloomFilter {
    fn test(&self, key: &[u8]) -> bool {
        match &self.buckets[self.bucket_index(key)] {
            Some(stored) => stored.as_ref() == key,
            None => false,
        }
    }

    fn add(&mut self, key: &[u8]) {
        let idx = self.bucket_index(key);
        self.buckets[idx] = Some(key.into());
    }
}

impl std::fmt::Debug for InverseBloomFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let occupied = self.buckets.iter().filter(|b| b.is_some()).count();
        write!(
            f,
            "InverseBloomFilter {{ capacity: {}, occupied: {} }}",
            self.buckets.len(),
            occupied
        )
    }
}
