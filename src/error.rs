//! Error types for tablib.
//!
//! Only ingestion can fail hard. Dangling references and missing container
//! elements inside a document degrade to rests or to nothing and are never
//! reported through this type.

use thiserror::Error;

/// Result alias carrying [`TabError`].
pub type Result<T> = std::result::Result<T, TabError>;

#[derive(Error, Debug)]
pub enum TabError {
    /// The GPIF document is not well-formed XML.
    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// The `.gp` container could not be opened or read.
    #[error("Failed to read GP archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// The archive opened fine but holds no `.gpif` score.
    #[error("No score.gpif found in archive. Files: {entries:?}")]
    MissingScore { entries: Vec<String> },

    /// Input bytes are not valid UTF-8.
    #[error("Invalid UTF-8 in score document: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Legacy song JSON or options JSON could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
