//! Configuration of a split, checked before any record is read.
use bon::Builder;
use thiserror::Error;

use crate::{
    fields::FieldSpec,
    hashing::{ByteOrder, HashAlgorithm},
};

/// Default number of digest bytes consulted
pub const DEFAULT_BYTE_COUNT: usize = 4;
/// Default number of records handed to a worker at once
pub const DEFAULT_BATCH_SIZE: usize = 4096;
/// Default number of records between two progress events
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 1_000_000;

/// Everything a [crate::assigner::StreamAssigner] needs to know.
///
/// ```
/// use data_splitter::config::SplitConfig;
///
/// let config = SplitConfig::builder()
///     .weights(vec![0.8, 0.1, 0.1])
///     .with_header(true)
///     .build();
/// assert_eq!(config.byte_count, 4);
/// ```
#[derive(Debug, Clone, Builder)]
pub struct SplitConfig {
    /// Relative size of every partition, in partition order
    pub weights: Vec<f64>,
    /// Fields forming the hash key, empty for the whole line
    #[builder(default)]
    pub fields: FieldSpec,
    /// Hash function applied to the key
    #[builder(default)]
    pub hash: HashAlgorithm,
    /// Number of digest bytes turned into the hash integer
    #[builder(default = DEFAULT_BYTE_COUNT)]
    pub byte_count: usize,
    /// Which end of the digest is used and how it is read
    #[builder(default)]
    pub byte_order: ByteOrder,
    /// Copy the first record into every partition instead of routing it
    #[builder(default)]
    pub with_header: bool,
    /// Number of hashing threads, 1 routes on the calling thread
    #[builder(default = 1)]
    pub threads: usize,
    /// Records per batch when hashing on multiple threads
    #[builder(default = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,
    /// Emit a progress event every this many records, 0 turns it off
    #[builder(default = DEFAULT_PROGRESS_INTERVAL)]
    pub progress_interval: u64,
}

impl SplitConfig {
    /// Check the settings which are not covered by the hashing and
    /// cut-point setup
    pub(crate) fn validate_execution(&self) -> Result<(), ConfigError> {
        if self.threads == 0 {
            return Err(ConfigError::ZeroThreads);
        }
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        Ok(())
    }
}

/// Invalid configuration, detected before any record is read
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Splitting needs at least two partitions
    #[error("At least 2 fractions are required, got {0}")]
    TooFewWeights(usize),
    /// Weights must be finite and not negative
    #[error("Fraction #{index} is invalid: {weight}")]
    InvalidWeight {
        /// position of the weight
        index: usize,
        /// offending value
        weight: f64,
    },
    /// Weights must not add up to zero
    #[error("Fractions must sum to a positive number, got {0}")]
    NonPositiveWeightSum(f64),
    /// Byte order other than `big` or `little`
    #[error("Unknown byte order `{0}`, expected `big` or `little`")]
    UnknownByteOrder(String),
    /// Need at least one thread
    #[error("Number of threads must be at least 1")]
    ZeroThreads,
    /// Need at least one record per batch
    #[error("Batch size must be at least 1")]
    ZeroBatchSize,
}
