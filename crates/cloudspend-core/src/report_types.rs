//! Report data types for cloudspend
//!
//! Pure data structures produced by the aggregators and consumed by the
//! output formatters. Ordered collections keep discovery order: containers in
//! the order they were listed, categories in the order they were first seen.

use crate::date_range::DateRange;
use crate::rounding::round_to;
use crate::types::{ContainerName, Granularity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Decimal places kept for the storage cost estimate
pub const ESTIMATE_DIGITS: usize = 6;

/// Decimal places kept for a billing total
pub const TOTAL_DIGITS: usize = 2;

/// Decimal places kept for a per-category billing amount
pub const CATEGORY_DIGITS: usize = 4;

/// Usage of a single storage container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerUsage {
    /// Container name, unique within a report
    pub name: ContainerName,
    /// Number of objects in the container
    pub object_count: u64,
    /// Sum of object sizes in bytes
    pub size_bytes: u64,
    /// `size_bytes` formatted for display
    pub size_human: String,
}

/// Storage usage across all containers of an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageReport {
    /// Per-container usage in discovery order
    pub containers: Vec<ContainerUsage>,
    /// Total number of objects
    pub total_objects: u64,
    /// Total size in bytes
    pub total_size_bytes: u64,
    /// `total_size_bytes` formatted for display
    pub total_size_human: String,
    /// Estimated monthly storage cost, rounded to six decimal places
    pub estimated_monthly_cost: f64,
}

impl UsageReport {
    /// Look up a container's usage by name
    pub fn get(&self, name: &str) -> Option<&ContainerUsage> {
        self.containers.iter().find(|c| c.name.as_str() == name)
    }
}

/// Final amount for one billing category
///
/// Serializes as a bare number except for [`CategoryAmount::Negligible`],
/// which keeps the unrounded value next to the rounded zero.
///
/// # Examples
/// ```
/// use cloudspend_core::report_types::CategoryAmount;
///
/// assert_eq!(CategoryAmount::from_sum(12.0).to_string(), "12");
/// assert_eq!(CategoryAmount::from_sum(12.345).to_string(), "12.3450");
/// assert_eq!(CategoryAmount::from_sum(0.00001).to_string(), "0.0000 (raw 0.00001)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryAmount {
    /// Rounded value with no fractional part
    Whole(i64),
    /// Rounded value with a fractional part
    Fractional(f64),
    /// Non-zero spend that rounds to zero at four decimal places
    Negligible {
        /// The rounded value, always zero
        rounded: f64,
        /// The accumulated value before rounding
        raw: f64,
    },
}

impl CategoryAmount {
    /// Classify an accumulated category sum
    pub fn from_sum(raw: f64) -> Self {
        let rounded = round_to(raw, CATEGORY_DIGITS);
        if rounded == 0.0 {
            Self::Negligible { rounded: 0.0, raw }
        } else if rounded.fract() == 0.0 && rounded.abs() < i64::MAX as f64 {
            Self::Whole(rounded as i64)
        } else {
            Self::Fractional(rounded)
        }
    }

    /// Rounded value as a float
    pub fn value(&self) -> f64 {
        match self {
            Self::Whole(v) => *v as f64,
            Self::Fractional(v) => *v,
            Self::Negligible { rounded, .. } => *rounded,
        }
    }
}

impl fmt::Display for CategoryAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Whole(v) => write!(f, "{v}"),
            Self::Fractional(v) => write!(f, "{v:.4}"),
            Self::Negligible { rounded, raw } => write!(f, "{rounded:.4} (raw {raw})"),
        }
    }
}

/// Spend attributed to one category over the whole range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCost {
    /// Category (service) name
    pub category: String,
    /// Final amount
    pub amount: CategoryAmount,
}

/// Reduced billing figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CostSummary {
    /// Single total, rounded to two decimal places
    Total {
        /// Total spend
        total_cost: f64,
    },
    /// Per-category amounts in first-seen order
    Breakdown {
        /// Categories with spend in the range
        by_category: Vec<CategoryCost>,
    },
}

/// Billing report over a date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostReport {
    /// Reported range
    pub range: DateRange,
    /// Bucketing used for the underlying query
    pub granularity: Granularity,
    /// Currency of the reported amounts, if any amount was seen
    pub currency: Option<String>,
    /// Reduced figures
    #[serde(flatten)]
    pub summary: CostSummary,
}

impl CostReport {
    /// Total spend when the report is in total mode
    pub fn total_cost(&self) -> Option<f64> {
        match &self.summary {
            CostSummary::Total { total_cost } => Some(*total_cost),
            CostSummary::Breakdown { .. } => None,
        }
    }

    /// Amount for `category` when the report is in breakdown mode
    pub fn category(&self, category: &str) -> Option<&CategoryAmount> {
        match &self.summary {
            CostSummary::Total { .. } => None,
            CostSummary::Breakdown { by_category } => by_category
                .iter()
                .find(|c| c.category == category)
                .map(|c| &c.amount),
        }
    }
}
