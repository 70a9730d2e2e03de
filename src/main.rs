//! # stagemap
//!
//! A command-line tool that labels exported microscope tiles by matching the
//! acquisition's stage positions to an operator-authored multipoint list.
//!
//! ## Usage
//!
//! ```bash
//! # Match positions and write matched_positions.csv
//! stagemap match plate.ome.xml multipoints.xml
//!
//! # Copy tiles to renamed/ under their multipoint labels
//! stagemap rename matched_positions.csv tiles/ renamed/
//!
//! # Both in one go
//! stagemap -v run plate.ome.xml multipoints.xml tiles/ renamed/
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
