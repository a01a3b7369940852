//! # exfilms
//!
//! A command-line tool for extracting mass spectrometry data into JSON.
//!
//! ## Supported Input Formats
//!
//! - **mzML**: HUPO-PSI standard XML format
//! - **Vendor formats** (`.d`, `.raw`, `.wiff`): converted to mzML first by an
//!   msconvert-compatible program given with `--converter`
//!
//! ## Usage
//!
//! ```bash
//! # Extract every data file of a directory
//! exfilms extract -i /data/raw -o /data/json
//!
//! # Only MS1 centroid spectra, reduced to a target list
//! exfilms extract -i /data/raw -s --ms-level 1 --spectrum-type centroid \
//!     -t --target-file targets.tsv
//!
//! # Inspect a target list
//! exfilms targets targets.tsv --polarity positive
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
