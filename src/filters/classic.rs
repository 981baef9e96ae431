use crate::error::{DedupError, Result};
use crate::filter::{Filter, FilterFactory};
use crate::hash::{
    HashFunction, default_hash_function, optimal_bit_vector_size,
    optimal_num_hashes,
};
use bitvec::{bitvec, order::Lsb0, vec::BitVec};
use derive_builder::Builder;

/// Configuration for the classic bloom filter variant.
#[derive(Clone, Debug, Builder)]
#[builder(pattern = "owned")]
pub struct ClassicBloomConfig {
    /// Expected number of elements per layer
    #[builder(default = "1_000_000")]
    pub capacity: usize,

    /// Target false positive rate (between 0 and 1)
    #[builder(default = "0.01")]
    pub false_positive_rate: f64,

    /// Hash function used to derive bit indices
    #[builder(default = "default_hash_function")]
    pub hash_function: HashFunction,
}

impl ClassicBloomConfig {
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(DedupError::ZeroCapacity);
        }
        if self.false_positive_rate <= 0.0 || self.false_positive_rate >= 1.0 {
            return Err(DedupError::InvalidFalsePositiveRate {
                rate: self.false_positive_rate,
            });
        }
        Ok(())
    }

    /// Builds a factory producing fresh, empty filters with this tuning.
    pub fn into_factory(self) -> Result<FilterFactory> {
        self.validate()?;
        Ok(Box::new(move || {
            Box::new(ClassicBloomFilter::with_config(&self))
        }))
    }
}

/// Standard k-hash bloom filter over a bit vector.
///
/// Never reports false for a key added to this instance; false positives
/// are bounded by the configured capacity and target rate.
pub struct ClassicBloomFilter {
    hash_function: HashFunction,
    bits: BitVec<usize, Lsb0>,
    num_hashes: usize,
    insert_count: usize,
}

impl ClassicBloomFilter {
    pub fn new(config: ClassicBloomConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_config(&config))
    }

    fn with_config(config: &ClassicBloomConfig) -> Self {
        let bit_vector_size =
            optimal_bit_vector_size(config.capacity, config.false_positive_rate);
        let num_hashes = optimal_num_hashes(config.capacity, bit_vector_size);

        Self {
            hash_function: config.hash_function,
            bits: bitvec![0; bit_vector_size],
            num_hashes,
            insert_count: 0,
        }
    }

    /// Number of bits backing the filter.
    pub fn bit_vector_size(&self) -> usize {
        self.bits.len()
    }

    pub fn num_hashes(&self) -> usize {
        self.num_hashes
    }

    /// Number of keys added since construction.
    pub fn insert_count(&self) -> usize {
        self.insert_count
    }
}

impl Filter for ClassicBloomFilter {
    fn test(&self, key: &[u8]) -> bool {
        let indices =
            (self.hash_function)(key, self.num_hashes, self.bits.len());
        indices.into_iter().all(|idx| self.bits[idx as usize])
    }

    fn add(&mut self, key: &[u8]) {
        let indices =
            (self.hash_function)(key, self.num_hashes, self.bits.len());
        for idx in indices {
            self.bits.set(idx as usize, true);
        }
        self.insert_count += 1;
    }
}

impl std::fmt::Debug for ClassicBloomFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ClassicBloomFilter {{ bits: {}, num_hashes: {}, inserts: {} }}",
            self.bits.len(),
            self.num_hashes,
            self.insert_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_then_test() {
        let config = ClassicBloomConfigBuilder::default()
            .capacity(1000)
            .false_positive_rate(0.01)
            .build()
            .expect("Unable to build ClassicBloomConfig");
        let mut filter =
            ClassicBloomFilter::new(config).expect("Failed to create filter");

        assert!(!filter.test(b"some data"));
        filter.add(b"some data");
        assert!(filter.test(b"some data"));
        assert!(!filter.test(b"other data"));
        assert_eq!(filter.insert_count(), 1);
    }

    #[test]
    fn test_no_false_negatives() {
        let config = ClassicBloomConfigBuilder::default()
            .capacity(10_000)
            .false_positive_rate(0.01)
            .build()
            .unwrap();
        let mut filter = ClassicBloomFilter::new(config).unwrap();

        for i in 0..10_000u32 {
            filter.add(&i.to_le_bytes());
        }
        for i in 0..10_000u32 {
            assert!(filter.test(&i.to_le_bytes()));
        }
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = ClassicBloomConfigBuilder::default()
            .capacity(0)
            .build()
            .unwrap();
        assert_eq!(
            ClassicBloomFilter::new(config).unwrap_err(),
            DedupError::ZeroCapacity
        );
    }

    #[test]
    fn test_factory_builds_empty_filters() {
        let factory = ClassicBloomConfigBuilder::default()
            .capacity(100)
            .build()
            .unwrap()
            .into_factory()
            .unwrap();

        let mut first = factory();
        first.add(b"key");
        assert!(first.test(b"key"));

        // a second instance must not see the first one's keys
        let second = factory();
        assert!(!second.test(b"key"));
    }
}
