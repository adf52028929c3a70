use thiserror::Error;

/// Errors that can occur while storing, fetching or printing recipes
#[derive(Error, Debug)]
pub enum AppError {
    /// Failed to read or write the recipe file
    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),

    /// The recipe file could not be parsed or written as CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Failed to download a recipe image
    #[error("Failed to fetch image: {0}")]
    FetchError(#[from] reqwest::Error),

    /// Image server answered with a non-success status
    #[error("Image request to {url} returned status {status}")]
    ImageStatus { url: String, status: u16 },

    /// Downloaded bytes are not a decodable image
    #[error("Failed to decode image: {0}")]
    ImageDecode(String),

    /// Failed to build the flipbook document
    #[error("PDF generation failed: {0}")]
    PdfError(#[from] printpdf::Error),

    /// A submitted recipe is incomplete
    #[error("{0}")]
    Validation(#[from] crate::model::ValidationError),

    /// A blocking file or PDF job did not finish
    #[error("Background task failed: {0}")]
    TaskError(#[from] tokio::task::JoinError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, AppError>;
