//! CLI interface for cloudspend
//!
//! This module defines the command-line interface using clap. Two reports
//! are available: `storage` scans bucket listings, `billing` reduces billing
//! line items over a date range.
//!
//! # Example
//!
//! ```bash
//! # Storage usage with an estimated monthly cost
//! cloudspend storage --data-dir ./export
//!
//! # Per-service costs for March 2025
//! cloudspend billing --since 2025-03-01 --until 2025-04-01 --by-service
//!
//! # Total cost for the last 30 days as JSON
//! cloudspend billing --json
//! ```

use crate::billing::CostRequest;
use crate::types::{Granularity, ReportMode};
use clap::{Args, Parser, Subcommand};
use cloudspend_provider_local::DATA_DIR_ENV;
use std::path::PathBuf;

/// Summarize cloud storage usage and spend
#[derive(Parser, Debug, Clone)]
#[command(name = "cloudspend")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Show informational output (default is quiet mode with only warnings and errors)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Directory holding the exported account data
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    pub data_dir: Option<PathBuf>,

    /// Timezone used to decide what "today" is (e.g. "America/New_York", "UTC")
    /// If not specified, uses the system's local timezone
    #[arg(long, short = 'z', global = true)]
    pub timezone: Option<String>,

    /// Use UTC to decide what "today" is (overrides --timezone)
    #[arg(long, global = true)]
    pub utc: bool,

    /// Report to produce
    #[command(subcommand)]
    pub command: Command,
}

/// Available reports
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show object counts and sizes per bucket with an estimated monthly cost
    Storage,

    /// Show spend over a date range
    Billing(BillingArgs),
}

/// Arguments for the billing report
#[derive(Args, Debug, Clone, PartialEq)]
pub struct BillingArgs {
    /// First day of the range (YYYY-MM-DD), defaults to 30 days before --until
    #[arg(long)]
    pub since: Option<String>,

    /// Day after the last day of the range (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub until: Option<String>,

    /// Bucket size for the cost query
    #[arg(long, short = 'g', default_value_t = Granularity::Daily)]
    pub granularity: Granularity,

    /// Break costs down by service instead of reporting one total
    #[arg(long)]
    pub by_service: bool,
}

impl BillingArgs {
    /// Report mode selected by the flags
    pub fn mode(&self) -> ReportMode {
        if self.by_service {
            ReportMode::Breakdown
        } else {
            ReportMode::Total
        }
    }

    /// Convert the arguments into a report request
    pub fn to_request(&self) -> CostRequest {
        CostRequest {
            start: self.since.clone(),
            end: self.until.clone(),
            mode: self.mode(),
            granularity: self.granularity,
        }
    }
}
