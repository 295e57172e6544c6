use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use jwstfits::extract::FileKind;

mod config;
mod demo;
mod extract;
mod info;

/// jwstfits - JWST NIRSpec x1d / x1dints spectrum extraction
#[derive(Parser)]
#[command(name = "jwstfits")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// How to read the input file.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum KindArg {
    /// Detect from the file's extensions
    #[default]
    Auto,
    /// Single exposure
    X1d,
    /// Time series of integrations
    X1dints,
}

impl KindArg {
    fn file_kind(self) -> Option<FileKind> {
        match self {
            KindArg::Auto => None,
            KindArg::X1d => Some(FileKind::SingleExposure),
            KindArg::X1dints => Some(FileKind::TimeSeries),
        }
    }
}

/// Options for the extract command.
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Input x1d or x1dints FITS file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// File kind (auto-detected when omitted)
    #[arg(short, long, default_value = "auto", value_enum)]
    kind: KindArg,

    /// Keep only wavelengths in [LO, HI] microns
    #[arg(long, num_args = 2, value_names = ["LO", "HI"], allow_negative_numbers = true)]
    wlrange: Option<Vec<f64>>,

    /// Remove samples (x1d) or integrations (x1dints) with NaN flux
    #[arg(long)]
    kick_nan: bool,

    /// Target flux unit ("Jy" or "W/m2/um")
    #[arg(long, value_name = "UNIT")]
    flux_unit: Option<String>,

    /// Output representation: arrays, dataframe or datacube
    #[arg(short, long, value_name = "FORMAT")]
    output: Option<String>,

    /// Suspect artifact range [LO, HI] microns to excise around its peak
    #[arg(long, num_args = 2, value_names = ["LO", "HI"], allow_negative_numbers = true)]
    outlier: Option<Vec<f64>>,

    /// Samples removed either side of the artifact peak
    #[arg(long)]
    buffer: Option<usize>,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the result here (.parquet or .csv for dataframe, .json for datacube)
    #[arg(long, value_name = "PATH")]
    out: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract and clean a spectrum
    Extract(ExtractArgs),

    /// Show the extensions and columns of a FITS file
    Info {
        /// Input FITS file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print the first N rows of the first spectrum table
        #[arg(long, default_value = "0")]
        head: usize,
    },

    /// Write a synthetic x1d or x1dints file for testing
    Demo {
        /// Output FITS file path
        #[arg(value_name = "OUTPUT", default_value = "demo_x1dints.fits")]
        output: PathBuf,

        /// Number of integrations (0 writes a single-exposure x1d file)
        #[arg(short, long, default_value = "10")]
        integrations: usize,

        /// Wavelength samples per spectrum
        #[arg(short, long, default_value = "400")]
        samples: usize,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Extract(args) => extract::run(args),
        Commands::Info { file, head } => info::run(file, head),
        Commands::Demo {
            output,
            integrations,
            samples,
        } => demo::run(output, integrations, samples),
    }
}
