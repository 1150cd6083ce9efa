//! Errors which abort a split
use std::io;

use thiserror::Error;

use crate::{config::ConfigError, fields::FieldError, hashing::HashError, router::RouterError};

/// Every error ending a run. None of them are recoverable: partitions
/// written so far stay as they are.
#[derive(Debug, Error)]
pub enum SplitError {
    /// Invalid weights or settings
    #[error("Invalid configuration")]
    Config(#[from] ConfigError),
    /// Unknown hash function or unusable byte count
    #[error("Invalid hash setup")]
    Hash(#[from] HashError),
    /// A record does not have the selected fields
    #[error("Cannot build hash key for input line {line}")]
    Field {
        /// 1-based line number in the input
        line: u64,
        /// what went wrong
        #[source]
        source: FieldError,
    },
    /// A hash value fell outside the router. This is a bug.
    #[error("Cannot route hash value")]
    Router(#[from] RouterError),
    /// Number of sinks does not match the number of weights
    #[error("Expected {expected} partition sinks, got {actual}")]
    SinkCount {
        /// number of partitions
        expected: usize,
        /// number of sinks given
        actual: usize,
    },
    /// Reading the input or writing a partition failed
    #[error("I/O error")]
    Io(#[from] io::Error),
    /// A hashing thread died
    #[error("Hashing thread panicked")]
    WorkerPanicked,
}
