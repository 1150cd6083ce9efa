use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

use data_splitter::sinks::FileSink;

use crate::Error;

/// Name used for the output files when reading standard input
pub(crate) const STDIN_NAME: &str = "stdin";

/// Open the input, standard input if no path is given.
/// Returns the reader and the name output files are derived from
pub(crate) fn open_input(path: Option<&Path>) -> Result<(Box<dyn BufRead + Send>, String), Error> {
    match path {
        None => Ok((Box::new(BufReader::new(io::stdin())), STDIN_NAME.to_owned())),
        Some(path) => {
            let name = input_basename(path)?;
            let file = File::open(path).map_err(|e| Error::OpenInput(path.to_owned(), e))?;
            Ok((Box::new(BufReader::new(file)), name))
        }
    }
}

fn input_basename(path: &Path) -> Result<String, Error> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| Error::NoFileName(path.to_owned()))
}

/// Path of output file `index`
pub(crate) fn partition_path(dir: &Path, name: &str, index: usize) -> PathBuf {
    dir.join(format!("{name}.part_{index}"))
}

/// Create (or truncate) one output file per partition
pub(crate) fn create_sinks(dir: &Path, name: &str, partitions: usize) -> Result<Vec<FileSink>, Error> {
    (0..partitions)
        .map(|i| {
            let path = partition_path(dir, name, i);
            FileSink::create(&path).map_err(|e| Error::CreateOutput(path, e))
        })
        .collect()
}
