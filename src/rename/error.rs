use std::path::PathBuf;

/// Errors that abort a rename pass.
///
/// Problems with individual tiles never abort the pass; they are reported as
/// diagnostics and counted in the [`RenameReport`](super::RenameReport).
#[derive(Debug, thiserror::Error)]
pub enum RenameError {
    /// The source directory could not be listed
    #[error("Failed to read source directory {path}: {source}")]
    ReadSource {
        /// Source directory
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The destination directory could not be created
    #[error("Failed to create destination directory {path}: {source}")]
    CreateDestination {
        /// Destination directory
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The destination resolves to the source directory
    #[error("Destination directory {0} is the source directory; tiles would be written over the originals")]
    DestinationIsSource(PathBuf),
}
