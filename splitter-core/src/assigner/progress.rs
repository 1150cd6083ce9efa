use tracing::info;

use super::SplitReport;

/// Counts routed records and periodically reports how far we got
#[derive(Debug)]
pub(super) struct Progress {
    interval: u64,
    header: bool,
    total: u64,
    per_partition: Vec<u64>,
}

impl Progress {
    pub(super) fn new(partitions: usize, interval: u64) -> Self {
        Self {
            interval,
            header: false,
            total: 0,
            per_partition: vec![0; partitions],
        }
    }

    pub(super) fn header(&mut self) {
        self.header = true;
    }

    pub(super) fn record(&mut self, partition: usize) {
        if let Some(count) = self.per_partition.get_mut(partition) {
            *count += 1;
        }
        self.total += 1;
        if self.interval != 0 && self.total % self.interval == 0 {
            info!("Routed {} records", self.total);
        }
    }

    pub(super) fn into_report(self) -> SplitReport {
        SplitReport {
            header: self.header,
            records: self.total,
            per_partition: self.per_partition,
        }
    }
}
