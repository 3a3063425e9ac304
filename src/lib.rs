//! cloudspend - Summarize cloud storage usage and spend
//!
//! This library provides functionality to:
//! - Aggregate object listings into per-bucket usage with a grand total
//! - Estimate the monthly storage cost of the grand total from a tiered price table
//! - Reduce billing query results into a rounded total or a per-service breakdown
//! - Render reports in table and JSON formats
//!
//! Listing and billing data are consumed through the [`provider`] traits, so
//! the aggregators work with any backend. The `cloudspend-provider-local`
//! crate reads an exported snapshot from disk.
//!
//! # Examples
//!
//! ```no_run
//! use cloudspend::{
//!     billing::{CostReportAggregator, CostRequest},
//!     timezone::TimezoneConfig,
//!     types::{Granularity, ReportMode},
//! };
//! use cloudspend_provider_local::BillingExport;
//!
//! #[tokio::main]
//! async fn main() -> cloudspend::Result<()> {
//!     let query = BillingExport::new("/var/lib/cloudspend");
//!     let aggregator = CostReportAggregator::new(TimezoneConfig::utc());
//!
//!     let request = CostRequest::new(ReportMode::Breakdown, Granularity::Monthly)
//!         .with_start("2025-01-01");
//!     let report = aggregator.report(&query, &request).await?;
//!     println!("{:?}", report.summary);
//!
//!     Ok(())
//! }
//! ```

pub mod aggregation;
pub mod billing;
pub mod cli;
pub mod output;

pub use cloudspend_core::{
    date_range, error, provider, report_types, rounding, size_format, timezone, types,
};
pub use cloudspend_pricing::cost_calculator;

// Re-export commonly used types
pub use cloudspend_core::{CloudspendError, ContainerName, DateRange, Granularity, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
