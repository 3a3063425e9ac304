//! Core domain types for cloudspend
//!
//! This module contains the fundamental types exchanged between the listing
//! and billing collaborators and the aggregators: container names, object
//! pages, billing granularity, and time-bucketed cost results.

use chrono::{DateTime, Datelike, Days, Months, NaiveTime, TimeDelta, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Strongly-typed storage container (bucket) name
///
/// # Examples
/// ```
/// use cloudspend_core::types::ContainerName;
///
/// let bucket = ContainerName::new("access-logs");
/// assert_eq!(bucket.as_str(), "access-logs");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContainerName(String);

impl ContainerName {
    /// Create a new ContainerName from any string-like type
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ContainerName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Metadata for a single stored object
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRecord {
    /// Object size in bytes
    pub size: u64,
}

impl ObjectRecord {
    /// Create a record for an object of `size` bytes
    pub fn new(size: u64) -> Self {
        Self { size }
    }
}

/// One page of an object listing
///
/// Pages may be empty; an empty page does not mean the listing is over.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectPage {
    /// Objects contained in this page
    pub records: Vec<ObjectRecord>,
}

impl ObjectPage {
    /// Create a page from its records
    pub fn new(records: Vec<ObjectRecord>) -> Self {
        Self { records }
    }

    /// Create a page from raw object sizes
    pub fn from_sizes(sizes: impl IntoIterator<Item = u64>) -> Self {
        Self {
            records: sizes.into_iter().map(ObjectRecord::new).collect(),
        }
    }

    /// Number of objects in the page
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the page carries no objects
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of the object sizes in the page, `None` if it overflows `u64`
    pub fn total_size(&self) -> Option<u64> {
        self.records
            .iter()
            .try_fold(0u64, |total, r| total.checked_add(r.size))
    }
}

/// Bucketing of billing results
///
/// # Examples
/// ```
/// use cloudspend_core::types::Granularity;
/// use std::str::FromStr;
///
/// let granularity = Granularity::from_str("monthly").unwrap();
/// assert_eq!(granularity, Granularity::Monthly);
/// assert_eq!(granularity.to_string(), "MONTHLY");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Granularity {
    /// One bucket per hour
    Hourly,
    /// One bucket per calendar day
    #[default]
    Daily,
    /// One bucket per calendar month
    Monthly,
}

impl Granularity {
    /// Start of the bucket containing `timestamp`
    pub fn bucket_start(&self, timestamp: DateTime<Utc>) -> DateTime<Utc> {
        let date = timestamp.date_naive();
        let midnight = date.and_time(NaiveTime::MIN);
        let start = match self {
            Self::Hourly => midnight + TimeDelta::hours(i64::from(timestamp.hour())),
            Self::Daily => midnight,
            Self::Monthly => (date - Days::new(u64::from(date.day0()))).and_time(NaiveTime::MIN),
        };
        start.and_utc()
    }

    /// Start of the bucket following the one starting at `start`
    pub fn next_bucket(&self, start: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Self::Hourly => start + TimeDelta::hours(1),
            Self::Daily => start + TimeDelta::days(1),
            Self::Monthly => start + Months::new(1),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hourly => write!(f, "HOURLY"),
            Self::Daily => write!(f, "DAILY"),
            Self::Monthly => write!(f, "MONTHLY"),
        }
    }
}

impl std::str::FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            "monthly" => Ok(Self::Monthly),
            _ => Err(format!("Invalid granularity: {s}")),
        }
    }
}

/// Half-open interval covered by one billing bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePeriod {
    /// Inclusive start
    pub start: DateTime<Utc>,
    /// Exclusive end
    pub end: DateTime<Utc>,
}

/// A monetary amount as reported by the billing collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostAmount {
    /// Cost before discounts
    pub amount: f64,
    /// Currency code, e.g. "USD"
    pub unit: String,
}

impl CostAmount {
    /// Create a new amount
    pub fn new(amount: f64, unit: impl Into<String>) -> Self {
        Self {
            amount,
            unit: unit.into(),
        }
    }

    /// Parse a decimal amount string such as `"12.345"`
    pub fn parse(amount: &str, unit: impl Into<String>) -> crate::Result<Self> {
        let value = amount
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| crate::CloudspendError::InvalidAmount(amount.to_string()))?;
        Ok(Self::new(value, unit))
    }
}

/// Cost attributed to one category (service) within a bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostGroup {
    /// Category key, compared case-sensitively
    pub category: String,
    /// Cost attributed to the category
    pub cost: CostAmount,
}

/// Amounts carried by a billing bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BucketCosts {
    /// Ungrouped query result: one total
    Total(CostAmount),
    /// Grouped query result: one amount per category
    Grouped(Vec<CostGroup>),
}

/// One granularity-sized slice of a billing query result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBucket {
    /// Interval covered by this bucket
    pub time_period: TimePeriod,
    /// Amounts recorded for the interval
    pub costs: BucketCosts,
}

impl CostBucket {
    /// Sum of the amounts in the bucket, whether grouped or not
    pub fn total_amount(&self) -> f64 {
        match &self.costs {
            BucketCosts::Total(cost) => cost.amount,
            BucketCosts::Grouped(groups) => groups.iter().map(|g| g.cost.amount).sum(),
        }
    }

    /// Currency of the first amount in the bucket
    pub fn unit(&self) -> Option<&str> {
        match &self.costs {
            BucketCosts::Total(cost) => Some(cost.unit.as_str()),
            BucketCosts::Grouped(groups) => groups.first().map(|g| g.cost.unit.as_str()),
        }
    }
}

/// Billing report mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportMode {
    /// A single rounded total
    #[default]
    Total,
    /// Per-category amounts
    Breakdown,
}

impl fmt::Display for ReportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Total => write!(f, "total"),
            Self::Breakdown => write!(f, "breakdown"),
        }
    }
}
