use std::{
    io,
    sync::{Arc, Mutex},
};

use crate::sinks::PartitionSink;

/// A Helper to write records into a shared vector and take them out
/// again.
/// This struct uses an Arc<Mutex<..>> internally, so it can be freely
/// cloned and inspected after the sink itself was handed to a run
#[derive(Clone, Default)]
pub struct VecSink {
    inner: Arc<Mutex<Captured>>,
}

#[derive(Default)]
struct Captured {
    records: Vec<Vec<u8>>,
    closed: usize,
}

impl VecSink {
    /// Create a new sink which collects all records into a `Vec`
    pub fn new() -> Self {
        Self::default()
    }

    /// All records written so far
    pub fn records(&self) -> Vec<Vec<u8>> {
        self.inner.lock().unwrap().records.clone()
    }

    /// Records as strings, for readable assertions
    pub fn lines(&self) -> Vec<String> {
        self.records()
            .into_iter()
            .map(|r| String::from_utf8(r).unwrap())
            .collect()
    }

    /// How often `close` was called
    pub fn closed(&self) -> usize {
        self.inner.lock().unwrap().closed
    }
}

impl PartitionSink for VecSink {
    fn write_record(&mut self, record: &[u8]) -> io::Result<()> {
        self.inner.lock().unwrap().records.push(record.to_vec());
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        self.inner.lock().unwrap().closed += 1;
        Ok(())
    }
}

/// A sink which fails every write
#[derive(Clone, Default)]
pub struct FailingSink {
    closed: Arc<Mutex<usize>>,
}

impl FailingSink {
    /// How often `close` was called
    pub fn closed(&self) -> usize {
        *self.closed.lock().unwrap()
    }
}

impl PartitionSink for FailingSink {
    fn write_record(&mut self, _record: &[u8]) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::Other, "disk full"))
    }

    fn close(&mut self) -> io::Result<()> {
        *self.closed.lock().unwrap() += 1;
        Ok(())
    }
}
