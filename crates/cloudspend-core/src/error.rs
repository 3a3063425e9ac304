//! Error types for cloudspend
//!
//! This module defines the error types used throughout the cloudspend library.
//! All errors are derived from `thiserror` for convenient error handling
//! and automatic `From` implementations.
//!
//! # Example
//!
//! ```
//! use cloudspend_core::error::{CloudspendError, Result};
//!
//! fn example_function() -> Result<()> {
//!     // This will automatically convert io::Error to CloudspendError
//!     let _file = std::fs::read_to_string("nonexistent.txt")?;
//!     Ok(())
//! }
//! ```

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

use crate::types::ContainerName;

/// Main error type for cloudspend operations
///
/// Every variant carries the context needed to explain the failure upstream:
/// the offending date string, byte count, container, or file.
#[derive(Error, Debug)]
pub enum CloudspendError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// A supplied date does not match `YYYY-MM-DD`
    #[error("Invalid date format: '{0}' (expected YYYY-MM-DD)")]
    InvalidDateFormat(String),

    /// The resolved start date lies after today
    #[error("Start date {start} is in the future (today is {today})")]
    FutureStartDate {
        /// Resolved start date
        start: NaiveDate,
        /// Date used as "now" for the check
        today: NaiveDate,
    },

    /// The resolved end date is not after the start date
    #[error("End date {end} must be after start date {start}")]
    NonPositiveRange {
        /// Resolved start date
        start: NaiveDate,
        /// Resolved end date
        end: NaiveDate,
    },

    /// No pricing tier covers the byte count
    #[error(
        "No pricing tier covers {total_bytes} bytes; the storage pricing table needs updating"
    )]
    UnsupportedPricingTier {
        /// Total byte count that fell outside every tier
        total_bytes: u64,
    },

    /// Listing containers or objects failed
    #[error("Failed to enumerate {}: {source}", enumeration_target(.container))]
    EnumerationFailed {
        /// Container being listed, if the failure happened inside one
        container: Option<ContainerName>,
        /// Underlying collaborator error
        #[source]
        source: Box<CloudspendError>,
    },

    /// The billing query failed
    #[error("Cost query failed: {source}")]
    CostQueryFailed {
        /// Underlying collaborator error
        #[source]
        source: Box<CloudspendError>,
    },

    /// The same container was listed twice
    #[error("Container listed more than once: {0}")]
    DuplicateContainer(ContainerName),

    /// Object sizes or counts exceed what a 64-bit counter can hold
    #[error("Byte or object count overflows a 64-bit counter")]
    CountOverflow,

    /// A cost amount could not be parsed as a decimal
    #[error("Invalid cost amount: '{0}'")]
    InvalidAmount(String),

    /// Invalid timezone
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Malformed export data with file context
    #[error("Invalid export data in {path}: {error}")]
    Provider {
        /// The file or directory that caused the error
        path: PathBuf,
        /// The error message
        error: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CloudspendError {
    /// Wrap a collaborator failure raised while listing storage
    pub fn enumeration(container: Option<ContainerName>, source: CloudspendError) -> Self {
        Self::EnumerationFailed {
            container,
            source: Box::new(source),
        }
    }

    /// Wrap a collaborator failure raised by the billing query
    pub fn cost_query(source: CloudspendError) -> Self {
        Self::CostQueryFailed {
            source: Box::new(source),
        }
    }
}

fn enumeration_target(container: &Option<ContainerName>) -> String {
    match container {
        Some(name) => format!("container '{name}'"),
        None => "containers".to_string(),
    }
}

/// Convenience type alias for Results in cloudspend
///
/// # Example
///
/// ```
/// use cloudspend_core::Result;
///
/// fn process_data() -> Result<String> {
///     Ok("Processed successfully".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, CloudspendError>;
