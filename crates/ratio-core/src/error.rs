use thiserror::Error;

/// Structural failures. Metric-level problems (zero denominators, missing
/// fields, short history) are never errors; they are [`crate::Undefined`] values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricsError {
    #[error("Duplicate record for {company} in {year}")]
    DuplicateRecord { company: String, year: i32 },

    #[error("Unknown line item: {0}")]
    UnknownLineItem(String),

    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),
}

pub type Result<T> = std::result::Result<T, MetricsError>;
