use crate::error::{DedupError, Result};
use crate::filter::{Filter, FilterFactory};
use crate::hash::{
    HashFunction, default_hash_function, optimal_decrement_count,
    optimal_num_hashes_for_fpr,
};
use derive_builder::Builder;
use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Configuration for the stable bloom filter variant.
#[derive(Clone, Debug, Builder)]
#[builder(pattern = "owned")]
pub struct StableBloomConfig {
    /// Number of counter cells
    #[builder(default = "1_000_000")]
    pub num_cells: usize,

    /// Target false positive rate the filter converges to (between 0 and 1)
    #[builder(default = "0.01")]
    pub false_positive_rate: f64,

    /// Bits per cell (1 to 8); 1 reproduces the classic "unstable" layout
    #[builder(default = "1")]
    pub counter_bits: u8,

    /// Hash function used to derive cell indices
    #[builder(default = "default_hash_function")]
    pub hash_function: HashFunction,
}

impl StableBloomConfig {
    pub fn validate(&self) -> Result<()> {
        if self.num_cells == 0 {
            return Err(DedupError::ZeroCapacity);
        }
        if self.false_positive_rate <= 0.0 || self.false_positive_rate >= 1.0 {
            return Err(DedupError::InvalidFalsePositiveRate {
                rate: self.false_positive_rate,
            });
        }
        if self.counter_bits == 0 || self.counter_bits > 8 {
            return Err(DedupError::InvalidConfig(format!(
                "Counter bits must be between 1 and 8, got {}",
                self.counter_bits
            )));
        }
        Ok(())
    }

    pub fn into_factory(self) -> Result<FilterFactory> {
        self.validate()?;
        Ok(Box::new(move || {
            Box::new(StableBloomFilter::with_config(&self))
        }))
    }
}

/// Stable bloom filter (Deng & Rafiei): saturating counter cells that decay
/// on every insertion.
///
/// Each add first decrements a fixed number of cells starting at a random
/// position, then raises the key's cells to the counter maximum. Decay keeps
/// the fraction of set cells stationary, so the false-positive rate stays
/// bounded over an unbounded stream; the price is probabilistic false
/// negatives for entries that have not been refreshed recently, even
/// without any layer rotation.
pub struct StableBloomFilter {
    hash_function: HashFunction,
    cells: Vec<u8>,
    counter_max: u8,
    num_hashes: usize,
    decrement_count: usize,
    rng: SmallRng,
}

impl StableBloomFilter {
    pub fn new(config: StableBloomConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_config(&config))
    }

    fn with_config(config: &StableBloomConfig) -> Self {
        let counter_max = ((1u16 << config.counter_bits) - 1) as u8;
        let num_hashes =
            optimal_num_hashes_for_fpr(config.false_positive_rate)
                .min(config.num_cells);
        let decrement_count = optimal_decrement_count(
            config.num_cells,
            num_hashes,
            counter_max,
            config.false_positive_rate,
        );

        Self {
            hash_function: config.hash_function,
            cells: vec![0; config.num_cells],
            counter_max,
            num_hashes,
            decrement_count,
            rng: SmallRng::from_rng(&mut rand::rng()),
        }
    }

    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn decrement_count(&self) -> usize {
        self.decrement_count
    }

    /// Decrement a run of cells starting at a random position. A contiguous
    /// run is as good as independent picks for stability and touches memory
    /// sequentially.
    fn decay(&mut self) {
        let start = self.rng.random_range(0..self.cells.len());
        for i in 0..self.decrement_count {
            let idx = (start + i) % self.cells.len();
            self.cells[idx] = self.cells[idx].saturating_sub(1);
        }
    }
}

impl Filter for StableBloomFilter {
    fn test(&self, key: &[u8]) -> bool {
        let indices =
            (self.hash_function)(key, self.num_hashes, self.cells.len());
        indices.into_iter().all(|idx| self.cells[idx as usize] > 0)
    }

    fn add(&mut self, key: &[u8]) {
        self.decay();
        let indices =
            (self.hash_function)(key, self.num_hashes, self.cells.len());
        for idx in indices {
            self.cells[idx as usize] = self.counter_max;
        }
    }
}

impl std::fmt::Debug for StableBloomFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "StableBloomFilter {{ cells: {}, num_hashes: {}, max: {}, p: {} }}",
            self.cells.len(),
            self.num_hashes,
            self.counter_max,
            self.decrement_count
        )
    }
}
