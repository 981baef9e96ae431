//! Pluggable filter variants for the deduper window.
pub mod classic;
pub mod inverse;
pub mod stable;

pub use classic::{
    ClassicBloomConfig, ClassicBloomConfigBuilder, ClassicBloomFilter,
};
pub use inverse::{
    InverseBloomConfig, InverseBloomConfigBuilder, InverseBloomFilter,
};
pub use stable::{
    StableBloomConfig, StableBloomConfigBuilder, StableBloomFilter,
};
