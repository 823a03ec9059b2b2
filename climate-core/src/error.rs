use thiserror::Error;

/// Failures that abort an analysis. Out-of-range values never show up here:
/// they are clamped at ingestion.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Malformed response from climate data source: {0}")]
    MalformedResponse(String),
}

/// Rejections of user-typed location names.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Location cannot be empty.")]
    Empty,
    #[error("Location is too long (max {max} characters).")]
    TooLong { max: usize },
    #[error("Only letters, numbers, spaces, and - . , ' characters are allowed.")]
    InvalidCharacters,
}
