use fnv::FnvHasher;
use murmur3::murmur3_32;
use std::hash::Hasher;
use std::io::Cursor;

/// A type alias for the hash function used by the filter variants.
///
/// Takes a key, the number of indices to derive and the size of the target
/// array, and returns `num_hashes` indices in `[0, size)`. The variants
/// differ only in what lives at those indices (bits, counters, buckets).
pub type HashFunction = fn(&[u8], usize, usize) -> Vec<u32>;

pub(crate) fn hash_murmur32(key: &[u8]) -> u32 {
    let mut cursor = Cursor::new(key);
    murmur3_32(&mut cursor, 0).expect("Failed to compute Murmur3 hash")
}

pub(crate) fn hash_fnv32(key: &[u8]) -> u32 {
    let mut hasher = FnvHasher::default();
    hasher.write(key);
    hasher.finish() as u32
}

/// Kirsch-Mitzenmacher double hashing: two base hashes simulate k
/// independent hash functions.
pub fn default_hash_function(
    key: &[u8],
    num_hashes: usize,
    size: usize,
) -> Vec<u32> {
    let h1 = hash_murmur32(key);
    let h2 = hash_fnv32(key);
    (0..num_hashes)
        .map(|i| h1.wrapping_add((i as u32).wrapping_mul(h2)) % size as u32)
        .collect()
}

pub fn optimal_bit_vector_size(n: usize, fpr: f64) -> usize {
    let ln2 = std::f64::consts::LN_2;
    ((-(n as f64) * fpr.ln()) / (ln2 * ln2)).ceil() as usize
}

pub fn optimal_num_hashes(n: usize, m: usize) -> usize {
    ((m as f64 / n as f64) * std::f64::consts::LN_2)
        .round()
        .max(1.0) as usize
}

/// Number of hash functions giving the target false-positive rate on its
/// own, independent of fill ratio. Used by the stable variant, where the
/// cell count is fixed and the decay rate absorbs the load.
pub fn optimal_num_hashes_for_fpr(fpr: f64) -> usize {
    (1.0 / fpr).log2().ceil().max(1.0) as usize
}

/// Expected number of cells to decay per insertion so that a stable bloom
/// filter converges to the target false-positive rate (Deng & Rafiei,
/// "Approximately Detecting Duplicates for Streaming Data").
pub fn optimal_decrement_count(
    num_cells: usize,
    num_hashes: usize,
    counter_max: u8,
    fpr: f64,
) -> usize {
    let max = f64::from(counter_max);
    let sub_denom = (1.0 - fpr.powf(1.0 / num_hashes as f64)).powf(1.0 / max);
    let denom = (1.0 / sub_denom - 1.0)
        * (1.0 / num_hashes as f64 - 1.0 / num_cells as f64);
    let p = (1.0 / denom) as usize;
    p.max(1)
}
