//! The per-record driver: derive the key, hash it, route it and append the
//! untouched record to the chosen partition.
use std::io::{self, BufRead};

use itertools::Itertools;
use num_bigint::BigUint;
use tracing::{debug, info};

use crate::{
    config::SplitConfig,
    cutpoints::{CutPoint, CutPointTable},
    errors::SplitError,
    fields::FieldSpec,
    hashing::HashDigest,
    router::PartitionRouter,
    sinks::{close_all, PartitionSink},
};

mod parallel;
mod progress;

use progress::Progress;

/// Splits a stream of records into weighted partitions.
///
/// The partition of a record only depends on its hash key and the
/// configuration, so running the same input through the same configuration
/// always yields identical partitions.
#[derive(Debug, Clone)]
pub struct StreamAssigner {
    fields: FieldSpec,
    hasher: HashDigest,
    table: CutPointTable,
    router: PartitionRouter<BigUint, usize>,
    with_header: bool,
    threads: usize,
    batch_size: usize,
    progress_interval: u64,
}

/// Summary of a finished run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitReport {
    /// A header record was copied to every partition
    pub header: bool,
    /// Number of routed records, the header not included
    pub records: u64,
    /// Routed records per partition
    pub per_partition: Vec<u64>,
}

impl StreamAssigner {
    /// Validate `config` and set up hashing and routing
    pub fn new(config: SplitConfig) -> Result<Self, SplitError> {
        config.validate_execution()?;
        let hasher = HashDigest::new(config.hash, config.byte_count, config.byte_order)?;
        let table = CutPointTable::build(&config.weights, &hasher.space().max_value())?;
        let router = PartitionRouter::from_table(&table);

        info!(
            "hash: {}, bytes number: {}, byte-order: {}",
            hasher.algorithm(),
            hasher.space().byte_count(),
            hasher.space().byte_order()
        );
        debug!(
            "{} partitions, key fields: {}, cut-points: [{}]",
            table.len(),
            config.fields,
            table.points().iter().map(CutPoint::bound).join(", ")
        );

        Ok(Self {
            fields: config.fields,
            hasher,
            table,
            router,
            with_header: config.with_header,
            threads: config.threads,
            batch_size: config.batch_size,
            progress_interval: config.progress_interval,
        })
    }

    /// Number of partitions, equal to the number of weights
    pub fn partitions(&self) -> usize {
        self.table.len()
    }

    /// Cut-points the router was built from
    pub fn cut_points(&self) -> &CutPointTable {
        &self.table
    }

    /// Hash function and space in use
    pub fn hasher(&self) -> &HashDigest {
        &self.hasher
    }

    /// Partition index for `record`, `line` is only used for error reporting
    pub fn assign(&self, line: u64, record: &[u8]) -> Result<usize, SplitError> {
        let key = self
            .fields
            .extract(record)
            .map_err(|source| SplitError::Field { line, source })?;
        let value = self.hasher.digest_to_int(&key)?;
        Ok(self.router.route(&value)?)
    }

    /// Route every record of `input` into `sinks`, one sink per partition in
    /// weight order.
    ///
    /// All sinks are closed exactly once when this returns, whether the run
    /// succeeded or not. Records already written stay written.
    pub fn run<R, S>(&self, input: R, sinks: &mut [S]) -> Result<SplitReport, SplitError>
    where
        R: BufRead + Send,
        S: PartitionSink,
    {
        let result = self.route_all(input, sinks);
        let closed = close_all(sinks);
        let report = result?;
        closed?;

        info!(
            "Split {} records into {} partitions: [{}]",
            report.records,
            report.per_partition.len(),
            report.per_partition.iter().join(", ")
        );
        Ok(report)
    }

    fn route_all<R, S>(&self, mut input: R, sinks: &mut [S]) -> Result<SplitReport, SplitError>
    where
        R: BufRead + Send,
        S: PartitionSink,
    {
        if sinks.len() != self.partitions() {
            return Err(SplitError::SinkCount {
                expected: self.partitions(),
                actual: sinks.len(),
            });
        }
        let mut progress = Progress::new(self.partitions(), self.progress_interval);
        let mut lines_read = 0;
        let mut buf = Vec::new();

        // the header must be in every partition before any routed record
        if self.with_header && read_record(&mut input, &mut buf)? {
            lines_read += 1;
            for sink in sinks.iter_mut() {
                sink.write_record(&buf)?;
            }
            progress.header();
        }

        if self.threads > 1 {
            parallel::route_parallel(self, input, lines_read, sinks, &mut progress)?;
        } else {
            while read_record(&mut input, &mut buf)? {
                lines_read += 1;
                let partition = self.assign(lines_read, &buf)?;
                write_routed(sinks, partition, &buf)?;
                progress.record(partition);
            }
        }
        Ok(progress.into_report())
    }
}

/// Read the next record including its terminator into `buf`.
/// Returns false at the end of the input.
fn read_record<R: BufRead>(input: &mut R, buf: &mut Vec<u8>) -> io::Result<bool> {
    buf.clear();
    Ok(input.read_until(b'\n', buf)? != 0)
}

fn write_routed<S: PartitionSink>(
    sinks: &mut [S],
    partition: usize,
    record: &[u8],
) -> Result<(), SplitError> {
    let actual = sinks.len();
    let sink = sinks.get_mut(partition).ok_or(SplitError::SinkCount {
        expected: partition + 1,
        actual,
    })?;
    Ok(sink.write_record(record)?)
}
