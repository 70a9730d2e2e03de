use std::path::PathBuf;

use crate::ome::OmeError;
use crate::rename::RenameError;
use crate::table::TableError;

/// Errors that stop a pipeline stage
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The match tolerance is negative or not finite
    #[error("Invalid tolerance {0}: must be a finite, non-negative number")]
    InvalidTolerance(f64),

    /// The acquisition metadata could not be read
    #[error("Failed to read acquisition metadata {path}: {source}")]
    Acquisition {
        /// OME-XML path
        path: PathBuf,
        /// Underlying parse error
        source: OmeError,
    },

    /// The acquisition metadata holds no usable planes
    #[error("No planes found in acquisition metadata {0}")]
    NoPlanes(PathBuf),

    /// The mapping table could not be written
    #[error("Failed to write mapping table {path}: {source}")]
    WriteTable {
        /// Table path
        path: PathBuf,
        /// Underlying table error
        source: TableError,
    },

    /// The rename pass could not start
    #[error(transparent)]
    Rename(#[from] RenameError),
}
