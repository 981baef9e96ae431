use clap::{Parser, Subcommand};
use rand::Rng;
use std::collections::HashSet;
use stream_deduper_rs::{
    ClassicBloomConfigBuilder, Deduper, FilterFactory,
    InverseBloomConfigBuilder, StableBloomConfigBuilder,
    optimal_bit_vector_size, optimal_num_hashes,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Number of layers in the ring
    #[arg(short, long, default_value = "1")]
    layers: usize,

    /// Number of random keys to generate
    #[arg(short, long, default_value = "1000000")]
    keys: usize,

    /// Size of keys, in bytes
    #[arg(long, default_value = "16")]
    key_size: usize,

    #[command(subcommand)]
    variant: Variant,
}

#[derive(Subcommand)]
enum Variant {
    /// Profile a ring of classic bloom filters
    Classic {
        /// Expected number of items per layer
        #[arg(short, long, default_value = "1000000")]
        capacity: usize,

        /// Desired false positive rate
        #[arg(short, long, default_value = "0.000001")]
        fpr: f64,
    },

    /// Profile a ring of inverse bloom filters
    Inverse {
        /// Number of buckets per layer
        #[arg(short, long, default_value = "1000000")]
        capacity: usize,
    },

    /// Profile a ring of stable bloom filters
    Stable {
        /// Number of counter cells per layer
        #[arg(short, long, default_value = "1000000")]
        cells: usize,

        /// Desired false positive rate
        #[arg(short, long, default_value = "0.000001")]
        fpr: f64,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let factory: FilterFactory = match cli.variant {
        Variant::Classic { capacity, fpr } => {
            let bits = optimal_bit_vector_size(capacity, fpr);
            println!(
                "ClassicBloomFilter (n={capacity}, fpr={fpr}) (bits={bits}, k={})",
                optimal_num_hashes(capacity, bits)
            );
            ClassicBloomConfigBuilder::default()
                .capacity(capacity)
                .false_positive_rate(fpr)
                .build()?
                .into_factory()?
        }
        Variant::Inverse { capacity } => {
            println!("InverseBloomFilter (cap={capacity})");
            InverseBloomConfigBuilder::default()
                .capacity(capacity)
                .build()?
                .into_factory()?
        }
        Variant::Stable { cells, fpr } => {
            println!("StableBloomFilter (m={cells}, fpr={fpr})");
            StableBloomConfigBuilder::default()
                .num_cells(cells)
                .false_positive_rate(fpr)
                .build()?
                .into_factory()?
        }
    };

    let deduper = Deduper::new(cli.layers, factory)?;
    run_profile(&deduper, cli.keys, cli.key_size);

    Ok(())
}

/// Inserts half of a unique random key set, then measures the observed
/// false-positive rate over the absent half and the false-negative rate
/// over the present half.
fn run_profile(deduper: &Deduper, num_keys: usize, key_size: usize) {
    let mut rng = rand::rng();

    // HashSet guards against duplicate random keys skewing the measurement
    let mut keys: HashSet<Vec<u8>> = HashSet::with_capacity(num_keys);
    while keys.len() < num_keys {
        let key: Vec<u8> = (0..key_size).map(|_| rng.random()).collect();
        keys.insert(key);
    }

    let mut not_present = Vec::with_capacity(num_keys / 2);
    let mut yes_present = Vec::with_capacity(num_keys / 2);

    for (n, key) in keys.into_iter().enumerate() {
        if n % 2 == 0 {
            not_present.push(key);
        } else {
            deduper.add(&key);
            yes_present.push(key);
        }
    }

    let false_positives =
        not_present.iter().filter(|k| deduper.test(k)).count();
    let fpr = false_positives as f64 / not_present.len() as f64;
    println!("false positive rate: {fpr}");

    let false_negatives =
        yes_present.iter().filter(|k| !deduper.test(k)).count();
    let fnr = false_negatives as f64 / yes_present.len() as f64;
    println!("false negative rate: {fnr}");
}
