//! Reproducible splitting of line oriented data into weighted partitions.
//!
//! Every record is routed by a hash of its key: the hash integer is looked up
//! in a table of cut-points derived from the partition weights. Since the
//! result only depends on the key and the configuration, the same input is
//! always split the same way, on any machine, without shared state.
//!
//! ```
//! use std::io::Cursor;
//! use data_splitter::{SplitConfig, StreamAssigner, sinks::WriterSink};
//!
//! let config = SplitConfig::builder().weights(vec![0.9, 0.1]).build();
//! let assigner = StreamAssigner::new(config).unwrap();
//! let mut sinks = vec![WriterSink::new("train", Vec::new()), WriterSink::new("test", Vec::new())];
//! let report = assigner.run(Cursor::new("a\nb\nc\n"), &mut sinks).unwrap();
//! assert_eq!(report.records, 3);
//! ```
pub mod assigner;
pub mod config;
pub mod cutpoints;
pub mod errors;
pub mod fields;
pub mod hashing;
pub mod router;
pub mod sinks;

pub use assigner::{SplitReport, StreamAssigner};
pub use config::SplitConfig;
pub use errors::SplitError;

#[cfg(test)]
pub(crate) mod testing;
