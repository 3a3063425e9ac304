//! Billing queries over exported cost line items
//!
//! Line items live in `billing/*.jsonl`, one JSON object per line:
//!
//! ```json
//! {"usage_start":"2025-03-01T10:00:00Z","service":"S3","unblended_cost":"0.01","currency":"USD"}
//! ```
//!
//! A query keeps the items whose usage date falls in the requested range,
//! sums them into granularity-sized buckets, and emits the buckets in
//! chronological order. Malformed lines fail the query rather than being
//! skipped, since a dropped line would under-report spend.

use crate::export_error;
use chrono::{DateTime, NaiveTime, Utc};
use cloudspend_core::date_range::DateRange;
use cloudspend_core::error::Result;
use cloudspend_core::provider::{CostQuery, ResultStream};
use cloudspend_core::types::{
    BucketCosts, CostAmount, CostBucket, CostGroup, Granularity, TimePeriod,
};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;
use walkdir::WalkDir;

/// Currency assumed when a line item does not name one
pub const DEFAULT_CURRENCY: &str = "USD";

/// Billing provider backed by exported line items
pub struct BillingExport {
    billing_dir: PathBuf,
}

impl BillingExport {
    /// Create a provider reading `<data_dir>/billing`
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            billing_dir: data_dir.as_ref().join("billing"),
        }
    }

    /// Directory the line items are read from
    pub fn billing_dir(&self) -> &Path {
        &self.billing_dir
    }

    fn line_item_files(&self) -> Result<Vec<PathBuf>> {
        if !self.billing_dir.is_dir() {
            return Err(export_error(&self.billing_dir, "billing export not found"));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.billing_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| export_error(&self.billing_dir, e))?;
            let is_jsonl = entry.file_type().is_file()
                && entry.path().extension().is_some_and(|ext| ext == "jsonl");
            if is_jsonl {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}

impl CostQuery for BillingExport {
    fn query_cost(
        &self,
        range: DateRange,
        granularity: Granularity,
        grouped: bool,
    ) -> ResultStream<'_, CostBucket> {
        Box::pin(async_stream::try_stream! {
            let files = self.line_item_files()?;
            let mut buckets: BTreeMap<DateTime<Utc>, BucketAccumulator> = BTreeMap::new();
            let mut matched = 0usize;

            for path in files {
                let file = tokio::fs::File::open(&path)
                    .await
                    .map_err(|e| export_error(&path, e))?;
                let mut lines = BufReader::new(file).lines();
                let mut line_number = 0usize;

                while let Some(line) = lines
                    .next_line()
                    .await
                    .map_err(|e| export_error(&path, e))?
                {
                    line_number += 1;
                    if line.trim().is_empty() {
                        continue;
                    }

                    let item: LineItem = serde_json::from_str(&line)
                        .map_err(|e| export_error(&path, format!("line {line_number}: {e}")))?;
                    if !range.contains(item.usage_start.date_naive()) {
                        continue;
                    }

                    let cost = CostAmount::parse(&item.unblended_cost, item.currency)?;
                    buckets
                        .entry(granularity.bucket_start(item.usage_start))
                        .or_default()
                        .add(item.service, cost);
                    matched += 1;
                }
            }

            debug!(
                "Matched {} line items into {} {} buckets for {}",
                matched,
                buckets.len(),
                granularity,
                range
            );

            for (start, acc) in buckets {
                let time_period = clamp_period(start, granularity, &range);
                yield acc.into_bucket(time_period, grouped);
            }
        })
    }
}

/// Bucket interval clipped to the requested range
fn clamp_period(start: DateTime<Utc>, granularity: Granularity, range: &DateRange) -> TimePeriod {
    let range_start = range.start.and_time(NaiveTime::MIN).and_utc();
    let range_end = range.end.and_time(NaiveTime::MIN).and_utc();
    TimePeriod {
        start: start.max(range_start),
        end: granularity.next_bucket(start).min(range_end),
    }
}

/// Running sums for one bucket
#[derive(Default)]
struct BucketAccumulator {
    total: f64,
    unit: Option<String>,
    groups: Vec<CostGroup>,
    index: HashMap<String, usize>,
}

impl BucketAccumulator {
    fn add(&mut self, service: String, cost: CostAmount) {
        self.total += cost.amount;
        if self.unit.is_none() {
            self.unit = Some(cost.unit.clone());
        }

        match self.index.get(&service) {
            Some(&i) => self.groups[i].cost.amount += cost.amount,
            None => {
                self.index.insert(service.clone(), self.groups.len());
                self.groups.push(CostGroup {
                    category: service,
                    cost,
                });
            }
        }
    }

    fn into_bucket(self, time_period: TimePeriod, grouped: bool) -> CostBucket {
        let costs = if grouped {
            BucketCosts::Grouped(self.groups)
        } else {
            let unit = self.unit.unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
            BucketCosts::Total(CostAmount::new(self.total, unit))
        };
        CostBucket { time_period, costs }
    }
}

// ---------------------------------------------------------------------------
// Line item schema
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct LineItem {
    usage_start: DateTime<Utc>,
    service: String,
    unblended_cost: String,
    #[serde(default = "default_currency")]
    currency: String,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}
