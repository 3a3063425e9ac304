//! Billing report aggregation
//!
//! [`CostReportAggregator`] resolves the reporting range, runs one cost query
//! and reduces the returned buckets. Total mode sums every bucket into a
//! single figure rounded to cents. Breakdown mode sums amounts per category,
//! skipping zero contributions, and keeps categories in first-seen order.

use crate::date_range::DateRange;
use crate::error::{CloudspendError, Result};
use crate::provider::{CostQuery, ResultStream};
use crate::report_types::{CategoryAmount, CategoryCost, CostReport, CostSummary, TOTAL_DIGITS};
use crate::rounding::round_to;
use crate::timezone::TimezoneConfig;
use crate::types::{BucketCosts, CostBucket, Granularity, ReportMode};
use chrono::NaiveDate;
use futures::StreamExt;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Parameters of a billing report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CostRequest {
    /// Inclusive start date, `YYYY-MM-DD`
    pub start: Option<String>,
    /// Exclusive end date, `YYYY-MM-DD`
    pub end: Option<String>,
    /// Single total or per-service breakdown
    pub mode: ReportMode,
    /// Bucket width requested from the cost query
    pub granularity: Granularity,
}

impl CostRequest {
    /// Create a request covering the default lookback window ending today
    pub fn new(mode: ReportMode, granularity: Granularity) -> Self {
        Self {
            start: None,
            end: None,
            mode,
            granularity,
        }
    }

    /// Set the inclusive start date
    pub fn with_start(mut self, start: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self
    }

    /// Set the exclusive end date; today is used when unset
    pub fn with_end(mut self, end: impl Into<String>) -> Self {
        self.end = Some(end.into());
        self
    }
}

/// First currency seen across the reduction
#[derive(Default)]
struct CurrencyTracker {
    currency: Option<String>,
}

impl CurrencyTracker {
    fn observe(&mut self, unit: &str) {
        match &self.currency {
            None => self.currency = Some(unit.to_string()),
            Some(first) if first != unit => {
                warn!("Mixed currencies in cost data: {} and {}", first, unit);
            }
            Some(_) => {}
        }
    }
}

/// Reduces cost query results into a [`CostReport`]
pub struct CostReportAggregator {
    timezone_config: TimezoneConfig,
}

impl CostReportAggregator {
    /// Create an aggregator that determines "today" in `timezone_config`
    pub fn new(timezone_config: TimezoneConfig) -> Self {
        Self { timezone_config }
    }

    /// Build a report, resolving the range against the current date
    pub async fn report<Q>(&self, query: &Q, request: &CostRequest) -> Result<CostReport>
    where
        Q: CostQuery + ?Sized,
    {
        let today = self.timezone_config.today();
        debug!("Today is {} in {}", today, self.timezone_config.display_name());
        self.report_as_of(query, request, today).await
    }

    /// Build a report, resolving the range as if the current date were `today`
    ///
    /// # Errors
    ///
    /// - `InvalidDateFormat`, `FutureStartDate` or `NonPositiveRange` from
    ///   range resolution, before any query is made
    /// - `CostQueryFailed` if the query stream yields an error
    pub async fn report_as_of<Q>(
        &self,
        query: &Q,
        request: &CostRequest,
        today: NaiveDate,
    ) -> Result<CostReport>
    where
        Q: CostQuery + ?Sized,
    {
        let range = DateRange::resolve(request.start.as_deref(), request.end.as_deref(), today)?;
        info!(
            "Querying {} costs for {} at {} granularity",
            request.mode, range, request.granularity
        );

        let grouped = request.mode == ReportMode::Breakdown;
        let buckets = query.query_cost(range, request.granularity, grouped);

        let (summary, currency) = match request.mode {
            ReportMode::Total => reduce_total(buckets).await?,
            ReportMode::Breakdown => reduce_breakdown(buckets).await?,
        };

        Ok(CostReport {
            range,
            granularity: request.granularity,
            currency,
            summary,
        })
    }
}

async fn next_bucket(buckets: &mut ResultStream<'_, CostBucket>) -> Result<Option<CostBucket>> {
    buckets
        .next()
        .await
        .transpose()
        .map_err(CloudspendError::cost_query)
}

async fn reduce_total(
    mut buckets: ResultStream<'_, CostBucket>,
) -> Result<(CostSummary, Option<String>)> {
    let mut total = 0.0;
    let mut count = 0usize;
    let mut currency = CurrencyTracker::default();

    while let Some(bucket) = next_bucket(&mut buckets).await? {
        total += bucket.total_amount();
        if let Some(unit) = bucket.unit() {
            currency.observe(unit);
        }
        count += 1;
    }

    let total_cost = round_to(total, TOTAL_DIGITS);
    debug!("Reduced {} buckets to ${:.2}", count, total_cost);

    Ok((CostSummary::Total { total_cost }, currency.currency))
}

async fn reduce_breakdown(
    mut buckets: ResultStream<'_, CostBucket>,
) -> Result<(CostSummary, Option<String>)> {
    let mut sums: Vec<(String, f64)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut currency = CurrencyTracker::default();

    while let Some(bucket) = next_bucket(&mut buckets).await? {
        let BucketCosts::Grouped(groups) = bucket.costs else {
            return Err(CloudspendError::cost_query(CloudspendError::InvalidArgument(
                "breakdown query returned an ungrouped bucket".to_string(),
            )));
        };

        for group in groups {
            if group.cost.amount == 0.0 {
                continue;
            }
            currency.observe(&group.cost.unit);
            match index.get(&group.category) {
                Some(&i) => sums[i].1 += group.cost.amount,
                None => {
                    index.insert(group.category.clone(), sums.len());
                    sums.push((group.category, group.cost.amount));
                }
            }
        }
    }

    debug!("Reduced cost data to {} categories", sums.len());

    let by_category = sums
        .into_iter()
        .map(|(category, sum)| CategoryCost {
            category,
            amount: CategoryAmount::from_sum(sum),
        })
        .collect();

    Ok((CostSummary::Breakdown { by_category }, currency.currency))
}
