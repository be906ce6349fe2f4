use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    /// A row the computation cannot proceed without is missing, or the sheet
    /// does not have the expected three-column layout.
    #[error("Data shape error: {0}")]
    DataShape(String),

    /// Liquidity markers absent. Callers treat this as "metric unavailable".
    #[error("Missing line items for metric: {}", .markers.join(", "))]
    MissingMetric { markers: Vec<String> },

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[cfg(feature = "gemini")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AnalysisError {
    /// True for failures that should stop rendering the table entirely.
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            AnalysisError::DataShape(_)
                | AnalysisError::Spreadsheet(_)
                | AnalysisError::UnsupportedFormat(_)
                | AnalysisError::IoError(_)
        )
    }
}

impl From<calamine::Error> for AnalysisError {
    fn from(err: calamine::Error) -> Self {
        AnalysisError::Spreadsheet(err.to_string())
    }
}

impl From<csv::Error> for AnalysisError {
    fn from(err: csv::Error) -> Self {
        AnalysisError::Spreadsheet(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
