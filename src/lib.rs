//! Probabilistic stream deduplication over a sliding window of bloom
//! filter layers.
//!
//! Detects "seen before in a recent time window" duplicates in an unbounded
//! stream using bounded memory, accepting a small tunable error rate
//! instead of exact (and unbounded) state.
//!
//! HowTo:
//!    * Layers: the window is a fixed ring of N filter instances, one of
//!      which is current (the write target / most recent time bucket).
//!    * Test: a key is checked against every layer, current first, in
//!      recency order, short-circuiting on the first hit.
//!    * Insert: keys are only ever added to the current layer.
//!    * Rotation: `cycle()` replaces the oldest layer with a fresh, empty
//!      filter from the factory and promotes it to current. This is the
//!      only way data ages out; the caller decides the cadence (e.g. a
//!      periodic tick keyed to expected duplicate-arrival latency).
//!
//! The filter variant is pluggable through the [`Filter`] trait and a
//! [`FilterFactory`] closure; classic, inverse and stable bloom filters
//! ship in [`filters`] and trade memory, false-positive rate and
//! false-negative behavior differently.
//!
//! Obvious problems:
//!     * Duplicates spaced further apart than N layers x rotation period
//!       are rediscovered as new; that is the window semantics, not a bug.
//!     * Error behavior is inherited from the configured variant, so pick
//!       it for the stream at hand (see the `filters` module docs).

mod deduper;
mod error;
mod filter;
pub mod filters;
mod hash;

pub use deduper::Deduper;
pub use error::{DedupError, Result};
pub use filter::{Filter, FilterFactory};
pub use filters::{
    ClassicBloomConfig, ClassicBloomConfigBuilder, ClassicBloomFilter,
    InverseBloomConfig, InverseBloomConfigBuilder, InverseBloomFilter,
    StableBloomConfig, StableBloomConfigBuilder, StableBloomFilter,
};
pub use hash::{
    HashFunction, default_hash_function, optimal_bit_vector_size,
    optimal_num_hashes,
};
