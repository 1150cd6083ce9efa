//! Reproducible, hash based data splitter
use std::{io, path::PathBuf, process::ExitCode};

use clap::Parser;
use data_splitter::{SplitError, SplitReport, StreamAssigner};
use thiserror::Error;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

mod cli;
mod output;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = cli::Splitter::parse_from(cli::normalize_args(std::env::args_os()));
    match main_inner(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Splitting failed");
            eprintln!("{:?}", eyre::Report::new(e));
            ExitCode::FAILURE
        }
    }
}

fn main_inner(args: cli::Splitter) -> Result<SplitReport, Error> {
    debug!("Got the following args: {args:?}");

    // validate before any output file gets created
    let assigner = StreamAssigner::new(args.to_config())?;
    let (input, name) = output::open_input(args.input.as_deref())?;
    let mut sinks = output::create_sinks(&args.output_dir, &name, assigner.partitions())?;
    Ok(assigner.run(input, &mut sinks)?)
}

#[derive(Debug, Error)]
enum Error {
    #[error("Cannot open input file {0:?}")]
    OpenInput(PathBuf, #[source] io::Error),
    #[error("Cannot create output file {0:?}")]
    CreateOutput(PathBuf, #[source] io::Error),
    #[error("Input path {0:?} does not name a file")]
    NoFileName(PathBuf),
    #[error(transparent)]
    Split(#[from] SplitError),
}
