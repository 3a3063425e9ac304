//! Core types, traits, and utilities for cloudspend
//!
//! This crate provides the foundational types, error handling, date range
//! resolution, timezone configuration, size formatting, and the collaborator
//! traits used by all other cloudspend crates.

pub mod date_range;
pub mod error;
pub mod provider;
pub mod report_types;
pub mod rounding;
pub mod size_format;
pub mod timezone;
pub mod types;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use date_range::DateRange;
pub use error::{CloudspendError, Result};
pub use types::{ContainerName, Granularity, ObjectPage, ObjectRecord};
