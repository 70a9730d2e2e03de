/// Errors that can occur while reading or writing the mapping table
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// I/O error reading or writing the table file
    #[error("Failed to access table file: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV parsing or serialization error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// A required column is missing from the header row
    #[error("Missing required table column: {0}")]
    MissingColumn(String),
}
