/// Errors that can occur while reading OME-XML acquisition metadata
#[derive(Debug, thiserror::Error)]
pub enum OmeError {
    /// Error parsing XML
    #[error("XML parsing error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
