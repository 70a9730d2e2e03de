//! # Mapping Table
//!
//! The persisted join result: one CSV row per [`MatchRecord`] with the header
//!
//! ```text
//! image_name,point_name,posX,posY,dX,dY
//! ```
//!
//! Column names and order are the interchange contract between the match stage
//! and later rename runs. A table with a header and no rows means "no matches".

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::records::MatchRecord;

mod error;


pub use error::TableError;

/// Header row of the mapping table, in column order
pub const TABLE_HEADER: [&str; 6] = ["image_name", "point_name", "posX", "posY", "dX", "dY"];

/// Default file name of the mapping table
pub const DEFAULT_TABLE_FILE: &str = "matched_positions.csv";

/// Write match records to any writer, header first
pub fn write_matches_to<W: Write>(writer: W, matches: &[MatchRecord]) -> Result<(), TableError> {
    // The header is written explicitly so an empty table still carries it
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(TABLE_HEADER)?;
    for record in matches {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write match records to a table file, replacing any existing file
pub fn write_matches<P: AsRef<Path>>(path: P, matches: &[MatchRecord]) -> Result<(), TableError> {
    let file = File::create(path.as_ref())?;
    write_matches_to(BufWriter::new(file), matches)
}

/// Read match records from any reader.
///
/// Columns are located by header name; extra columns are ignored.
pub fn read_matches_from<R: Read>(reader: R) -> Result<Vec<MatchRecord>, TableError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    for column in TABLE_HEADER {
        if !headers.iter().any(|h| h == column) {
            return Err(TableError::MissingColumn(column.to_string()));
        }
    }

    let mut records = Vec::new();
    for row in csv_reader.deserialize() {
        let record: MatchRecord = row?;
        records.push(record);
    }
    Ok(records)
}

/// Read match records from a table file
pub fn read_matches<P: AsRef<Path>>(path: P) -> Result<Vec<MatchRecord>, TableError> {
    let file = File::open(path.as_ref())?;
    read_matches_from(BufReader::new(file))
}
