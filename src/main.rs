//! # jwstfits
//!
//! Command-line front end for extracting and cleaning JWST NIRSpec spectra.
//!
//! ## Usage
//!
//! ```bash
//! # Clip, drop NaNs and write a Parquet table
//! jwstfits extract jw01366_nrs1_x1dints.fits --wlrange 2.87 5.1 --kick-nan \
//!     --output dataframe --out spectrum.parquet
//!
//! # Generate a synthetic x1dints file
//! jwstfits demo demo_x1dints.fits --integrations 20
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
