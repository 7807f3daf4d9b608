use thiserror::Error;

/// Main error type for the catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Filesystem errors (reading pages, databases, writing exports)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Sort selector value that maps to no sort mode
    #[error("Unknown sort key: {0}")]
    UnknownSortKey(String),

    /// Export format other than json/csv
    #[error("Unknown export format: {0}")]
    UnknownExportFormat(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<String> for CatalogError {
    fn from(s: String) -> Self {
        CatalogError::Other(s)
    }
}

impl From<&str> for CatalogError {
    fn from(s: &str) -> Self {
        CatalogError::Other(s.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, CatalogError>;
