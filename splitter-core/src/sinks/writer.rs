use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use tracing::debug;

use super::PartitionSink;

/// Sink writing records through a buffered [Write]
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    name: String,
    inner: BufWriter<W>,
    closed: bool,
}

impl<W: Write> WriterSink<W> {
    /// Wrap `writer`, `name` only shows up in diagnostics
    pub fn new(name: impl Into<String>, writer: W) -> Self {
        Self {
            name: name.into(),
            inner: BufWriter::new(writer),
            closed: false,
        }
    }

    /// Name given on creation
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True once [PartitionSink::close] was called
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Flush and hand back the underlying writer, also after the sink was
    /// closed
    pub fn into_inner(self) -> io::Result<W> {
        self.inner.into_inner().map_err(|e| e.into_error())
    }
}

impl<W: Write> PartitionSink for WriterSink<W> {
    fn write_record(&mut self, record: &[u8]) -> io::Result<()> {
        if self.closed {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                format!("Partition sink `{}` is already closed", self.name),
            ));
        }
        self.inner.write_all(record)
    }

    fn close(&mut self) -> io::Result<()> {
        if !self.closed {
            debug!("Closing partition sink {}", self.name);
            self.closed = true;
            self.inner.flush()?;
        }
        Ok(())
    }
}

/// Partition sink backed by a file on the local filesystem
pub type FileSink = WriterSink<File>;

impl FileSink {
    /// Create or truncate the file at `path`
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let path: PathBuf = path.as_ref().into();
        let file = File::create(&path)?;
        Ok(Self::new(path.display().to_string(), file))
    }
}
