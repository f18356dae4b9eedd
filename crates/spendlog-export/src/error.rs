use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("PDF rendering failed: {0}")]
    Pdf(String),
}
