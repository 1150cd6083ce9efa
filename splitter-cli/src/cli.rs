use std::{ffi::OsString, fmt::Display, iter, path::PathBuf};

use data_splitter::{
    config::DEFAULT_PROGRESS_INTERVAL,
    fields::FieldSpec,
    hashing::{ByteOrder, HashAlgorithm},
    SplitConfig,
};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    /// Use the last bytes of the digest, most significant first
    Big,
    /// Use the first bytes of the digest, least significant first
    Little,
}

impl Display for Endian {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let matched = match self {
            Endian::Big => "big",
            Endian::Little => "little",
        };
        f.write_str(matched)
    }
}

impl From<Endian> for ByteOrder {
    fn from(value: Endian) -> Self {
        match value {
            Endian::Big => ByteOrder::Big,
            Endian::Little => ByteOrder::Little,
        }
    }
}

/// Splits data in reproducible fashion.
///
/// Every input line is routed to one of the output files by a hash of the
/// line (or of some of its fields). Output files are named
/// `<input name>.part_<n>`, one per fraction.
#[derive(clap::Parser, Debug)]
#[command(name = "splitter", version, about, long_about = None)]
pub struct Splitter {
    /// Fraction or percentage of input which will be in the first output file
    #[arg(value_name = "FRACTION")]
    pub first_fraction: f64,

    /// Fractions for the remaining output files
    #[arg(value_name = "FRACTION", required = true, num_args = 1..)]
    pub rest_fractions: Vec<f64>,

    /// Input file, standard input if omitted
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Fields from which to calculate hash in the same format as Linux `cut` command.
    /// e.g. -f 1,3-5 to select 1st, 3rd, 4th, 5th field
    #[arg(short, long)]
    pub fields: Option<FieldSpec>,

    /// Handles header. Add it into every split file
    #[arg(long)]
    pub with_header: bool,

    /// Hash function to be used, also accepted as `-hash`
    #[arg(long, default_value_t = HashAlgorithm::Md5)]
    pub hash_function: HashAlgorithm,

    /// Number of bytes of the hash to consider
    #[arg(short, long, default_value_t = 4)]
    pub bytes_nr: usize,

    /// Choose order of bytes. With big endian last X bytes are chosen,
    /// with little endian first X bytes are chosen
    #[arg(long, default_value_t = Endian::Big)]
    pub endian: Endian,

    /// Directory the output files are created in
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Number of hashing threads
    #[arg(short, long, default_value_t = 1)]
    pub threads: usize,

    /// Log progress every this many lines, 0 to disable
    #[arg(long, default_value_t = DEFAULT_PROGRESS_INTERVAL)]
    pub progress_every: u64,
}

impl Splitter {
    /// All fractions in output file order
    pub fn fractions(&self) -> Vec<f64> {
        iter::once(self.first_fraction)
            .chain(self.rest_fractions.iter().copied())
            .collect()
    }

    pub fn to_config(&self) -> SplitConfig {
        SplitConfig::builder()
            .weights(self.fractions())
            .fields(self.fields.clone().unwrap_or_default())
            .hash(self.hash_function)
            .byte_count(self.bytes_nr)
            .byte_order(self.endian.into())
            .with_header(self.with_header)
            .threads(self.threads)
            .progress_interval(self.progress_every)
            .build()
    }
}

/// Rewrite the single dash `-hash` flag into `--hash-function`, clap only
/// knows single character short flags
pub fn normalize_args<I>(args: I) -> impl Iterator<Item = OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter().map(|arg| match arg.to_str() {
        Some("-hash") => OsString::from("--hash-function"),
        Some(s) if s.starts_with("-hash=") => {
            OsString::from(format!("--hash-function={}", &s["-hash=".len()..]))
        }
        _ => arg,
    })
}
