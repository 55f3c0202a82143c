/// Error types for the agro dashboard
use thiserror::Error;

/// Main error type for loading and analysing climate records
#[derive(Error, Debug)]
pub enum AgroError {
    /// A required input file is missing or unreadable
    #[error("Data unavailable: {path} ({reason})")]
    DataUnavailable { path: String, reason: String },

    /// The similarity reference year is absent from the year profile
    #[error("Reference year {0} not found in the filtered data")]
    ReferenceNotFound(i32),

    /// The current filter combination matched no rows
    #[error("No rows match the current filter selection")]
    EmptyFilterResult,

    /// Similarity scoring was requested without any metric
    #[error("At least one metric must be selected")]
    EmptyMetricSet,

    /// The dataset carries no precipitation column
    #[error("Precipitation data is not available for rain-risk analysis")]
    RainRiskUnavailable,

    /// Failed to parse CSV data
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

/// Type alias for Results using AgroError
pub type Result<T> = std::result::Result<T, AgroError>;
