use thiserror::Error;

pub type Result<T> = std::result::Result<T, DedupError>;

#[derive(Error, Debug, PartialEq)]
pub enum DedupError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Ring must contain at least one layer")]
    ZeroLayers,

    #[error("Capacity must be greater than 0")]
    ZeroCapacity,

    #[error("False positive rate must be between 0 and 1, got {rate}")]
    InvalidFalsePositiveRate { rate: f64 },
}
