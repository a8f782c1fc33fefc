//! Error types for trueprofit
//!
//! This module defines the error type used throughout the trueprofit crates.
//! All errors are derived from `thiserror` for convenient error handling
//! and automatic `From` implementations.
//!
//! # Example
//!
//! ```
//! use trueprofit_core::error::{Result, TrueProfitError};
//!
//! fn example_function() -> Result<()> {
//!     // This will automatically convert io::Error to TrueProfitError
//!     let _file = std::fs::read_to_string("nonexistent.csv")?;
//!     Ok(())
//! }
//!
//! assert!(matches!(example_function(), Err(TrueProfitError::Io(_))));
//! ```

use thiserror::Error;

/// Main error type for trueprofit operations
///
/// Loading failures are reported as [`TrueProfitError::DataSource`] and are
/// always fatal to the load. Empty results are never errors; only asking for
/// the bounds of an empty store is.
#[derive(Error, Debug)]
pub enum TrueProfitError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Record source is missing or malformed
    #[error("Data source error in {source_name}: {detail}")]
    DataSource {
        /// Path or label of the record source
        source_name: String,
        /// What was wrong with it
        detail: String,
    },

    /// Operation needs at least one trip record
    #[error("No trip records loaded")]
    EmptyStore,

    /// Filter criteria rejected
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// Invalid date format
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl TrueProfitError {
    /// Build a data source error for the named source
    pub fn data_source(source_name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::DataSource {
            source_name: source_name.into(),
            detail: detail.into(),
        }
    }

    /// Whether this error means the record source could not be loaded
    pub fn is_data_source(&self) -> bool {
        matches!(self, Self::DataSource { .. } | Self::Csv(_))
    }
}

/// Convenience type alias for Results in trueprofit
pub type Result<T> = std::result::Result<T, TrueProfitError>;
