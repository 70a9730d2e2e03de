/// Errors that can occur while reading a multipoint position list
#[derive(Debug, thiserror::Error)]
pub enum MultipointError {
    /// Error parsing XML
    #[error("XML parsing error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The document has no `no_name` point container under its root
    #[error("Missing point container element '{0}'")]
    MissingContainer(String),
}
