//! Hashing on multiple threads while keeping the input order per partition.
//!
//! A reader thread cuts the input into numbered batches, workers hash and
//! route whole batches and the calling thread writes finished batches in
//! sequence order. The calling thread is the only one touching the sinks.
use std::{collections::BTreeMap, io::BufRead, thread};

use itertools::Itertools;

use super::{progress::Progress, read_record, write_routed, StreamAssigner};
use crate::{errors::SplitError, sinks::PartitionSink};

/// Records read in one go, `first_line` is the line number of the first one
struct Batch {
    seq: u64,
    first_line: u64,
    records: Vec<Vec<u8>>,
}

/// A batch together with the partition of every record
struct Routed {
    seq: u64,
    records: Vec<Vec<u8>>,
    targets: Result<Vec<usize>, SplitError>,
}

pub(super) fn route_parallel<R, S>(
    assigner: &StreamAssigner,
    input: R,
    lines_read: u64,
    sinks: &mut [S],
    progress: &mut Progress,
) -> Result<(), SplitError>
where
    R: BufRead + Send,
    S: PartitionSink,
{
    let capacity = assigner.threads * 2;
    let (batch_tx, batch_rx) = flume::bounded(capacity);
    let (routed_tx, routed_rx) = flume::bounded(capacity);
    let batch_size = assigner.batch_size;

    thread::scope(|scope| {
        let reader = scope.spawn(move || read_batches(input, lines_read, batch_size, batch_tx));
        let workers = (0..assigner.threads)
            .map(|_| {
                let batch_rx = batch_rx.clone();
                let routed_tx = routed_tx.clone();
                scope.spawn(move || hash_batches(assigner, batch_rx, routed_tx))
            })
            .collect_vec();
        // only the workers may keep these alive, otherwise the channels never close
        drop(batch_rx);
        drop(routed_tx);

        let written = write_in_order(routed_rx, sinks, progress);

        let read = reader.join().map_err(|_| SplitError::WorkerPanicked)?;
        for worker in workers {
            worker.join().map_err(|_| SplitError::WorkerPanicked)?;
        }
        written?;
        read
    })
}

fn read_batches<R: BufRead>(
    mut input: R,
    lines_read: u64,
    batch_size: usize,
    batch_tx: flume::Sender<Batch>,
) -> Result<(), SplitError> {
    let mut next_line = lines_read + 1;
    for seq in 0.. {
        let mut records = Vec::with_capacity(batch_size);
        let mut buf = Vec::new();
        while records.len() < batch_size && read_record(&mut input, &mut buf)? {
            records.push(std::mem::take(&mut buf));
        }
        if records.is_empty() {
            break;
        }
        let exhausted = records.len() < batch_size;
        let first_line = next_line;
        next_line += records.len() as u64;
        if batch_tx
            .send(Batch {
                seq,
                first_line,
                records,
            })
            .is_err()
        {
            // the writer stopped and will report why
            break;
        }
        if exhausted {
            break;
        }
    }
    Ok(())
}

fn hash_batches(
    assigner: &StreamAssigner,
    batch_rx: flume::Receiver<Batch>,
    routed_tx: flume::Sender<Routed>,
) {
    for batch in batch_rx.iter() {
        let targets = batch
            .records
            .iter()
            .zip(batch.first_line..)
            .map(|(record, line)| assigner.assign(line, record))
            .collect();
        let routed = Routed {
            seq: batch.seq,
            records: batch.records,
            targets,
        };
        if routed_tx.send(routed).is_err() {
            return;
        }
    }
}

fn write_in_order<S: PartitionSink>(
    routed_rx: flume::Receiver<Routed>,
    sinks: &mut [S],
    progress: &mut Progress,
) -> Result<(), SplitError> {
    let mut pending = BTreeMap::new();
    let mut next_seq = 0;
    for routed in routed_rx.iter() {
        pending.insert(routed.seq, routed);
        while let Some(routed) = pending.remove(&next_seq) {
            for (record, partition) in routed.records.iter().zip(routed.targets?) {
                write_routed(sinks, partition, record)?;
                progress.record(partition);
            }
            next_seq += 1;
        }
    }
    Ok(())
}
