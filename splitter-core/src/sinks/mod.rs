//! Byte sinks receiving the records of one partition
use std::io;

mod writer;
pub use writer::{FileSink, WriterSink};

/// Destination of all records routed to one partition.
///
/// A sink is written many times and closed exactly once after the input
/// is exhausted or the run failed.
pub trait PartitionSink {
    /// Append one record, exactly as it was read
    fn write_record(&mut self, record: &[u8]) -> io::Result<()>;

    /// Flush and release the sink.
    /// Use this method to clean up any resources like file handles
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: PartitionSink + ?Sized> PartitionSink for Box<S> {
    fn write_record(&mut self, record: &[u8]) -> io::Result<()> {
        (**self).write_record(record)
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

/// Close every sink, even if closing an earlier one failed.
/// Returns the first error.
pub fn close_all<S: PartitionSink>(sinks: &mut [S]) -> io::Result<()> {
    let mut first_err = None;
    for sink in sinks.iter_mut() {
        if let Err(e) = sink.close() {
            first_err.get_or_insert(e);
        }
    }
    match first_err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
