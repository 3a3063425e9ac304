//! Storage usage aggregation
//!
//! This module drains container and object listings into a [`UsageReport`]:
//! per-container object counts and sizes, a grand total, and the estimated
//! monthly cost of the grand total.
//!
//! Containers are processed one at a time in the order they are listed. Each
//! container's page stream is drained to exhaustion before the next container
//! is listed, and only running sums are kept, so arbitrarily long listings
//! never have to fit in memory.
//!
//! # Examples
//!
//! ```no_run
//! use cloudspend::{
//!     aggregation::UsageAggregator,
//!     cost_calculator::TieredCostModel,
//! };
//! use cloudspend_provider_local::StorageExport;
//! use std::sync::Arc;
//!
//! # async fn example() -> cloudspend::Result<()> {
//! let provider = StorageExport::new("/var/lib/cloudspend");
//! let aggregator = UsageAggregator::new(Arc::new(TieredCostModel::default()));
//!
//! let report = aggregator.aggregate(&provider).await?;
//! println!("{} in total", report.total_size_human);
//! # Ok(())
//! # }
//! ```

use crate::cost_calculator::TieredCostModel;
use crate::error::{CloudspendError, Result};
use crate::provider::StorageProvider;
use crate::report_types::{ContainerUsage, UsageReport};
use crate::size_format::format_size;
use crate::types::{ContainerName, ObjectPage};
use futures::stream::{Stream, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Running sums for the container being scanned
#[derive(Default)]
struct ContainerAccumulator {
    object_count: u64,
    size_bytes: u64,
}

impl ContainerAccumulator {
    fn add_page(&mut self, page: &ObjectPage) -> Result<()> {
        let size = page.total_size().ok_or(CloudspendError::CountOverflow)?;
        self.object_count = checked_sum(self.object_count, page.len() as u64)?;
        self.size_bytes = checked_sum(self.size_bytes, size)?;
        Ok(())
    }

    fn into_container_usage(self, name: ContainerName) -> ContainerUsage {
        ContainerUsage {
            name,
            object_count: self.object_count,
            size_bytes: self.size_bytes,
            size_human: format_size(self.size_bytes),
        }
    }
}

fn checked_sum(total: u64, value: u64) -> Result<u64> {
    total.checked_add(value).ok_or(CloudspendError::CountOverflow)
}

/// Storage usage aggregation engine
pub struct UsageAggregator {
    cost_model: Arc<TieredCostModel>,
    show_progress: bool,
}

impl UsageAggregator {
    /// Create a new UsageAggregator
    pub fn new(cost_model: Arc<TieredCostModel>) -> Self {
        Self {
            cost_model,
            show_progress: false,
        }
    }

    /// Enable or disable the progress spinner
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Aggregate every container exposed by `provider`
    pub async fn aggregate<P>(&self, provider: &P) -> Result<UsageReport>
    where
        P: StorageProvider + ?Sized,
    {
        self.aggregate_containers(provider.list_containers(), |container| {
            provider.list_objects(container)
        })
        .await
    }

    /// Aggregate a container stream, listing each container's pages with `list_objects`
    ///
    /// # Errors
    ///
    /// - `EnumerationFailed` if either listing yields an error; the container
    ///   being scanned is attached when known
    /// - `DuplicateContainer` if a container name is listed twice
    /// - `UnsupportedPricingTier` if the grand total has no price
    pub async fn aggregate_containers<C, F, S>(
        &self,
        containers: C,
        mut list_objects: F,
    ) -> Result<UsageReport>
    where
        C: Stream<Item = Result<ContainerName>>,
        F: FnMut(&ContainerName) -> S,
        S: Stream<Item = Result<ObjectPage>>,
    {
        let progress = if self.show_progress {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg} [{elapsed_precise}] {pos} objects scanned")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.set_message("Scanning storage");
            pb.enable_steady_tick(std::time::Duration::from_millis(100));
            Some(pb)
        } else {
            None
        };

        let mut usages: Vec<ContainerUsage> = Vec::new();
        let mut seen: HashSet<ContainerName> = HashSet::new();
        let mut total_objects = 0u64;
        let mut total_size_bytes = 0u64;

        tokio::pin!(containers);
        while let Some(result) = containers.next().await {
            let container = result.map_err(|e| CloudspendError::enumeration(None, e))?;
            if !seen.insert(container.clone()) {
                return Err(CloudspendError::DuplicateContainer(container));
            }

            if let Some(ref pb) = progress {
                pb.set_message(format!("Scanning {container}"));
            }

            let mut acc = ContainerAccumulator::default();
            let pages = list_objects(&container);
            tokio::pin!(pages);
            while let Some(page) = pages.next().await {
                let page =
                    page.map_err(|e| CloudspendError::enumeration(Some(container.clone()), e))?;
                acc.add_page(&page)
                    .map_err(|e| CloudspendError::enumeration(Some(container.clone()), e))?;

                if let Some(ref pb) = progress {
                    pb.inc(page.len() as u64);
                }
            }

            let usage = acc.into_container_usage(container);
            debug!(
                "{}: {} objects, {}",
                usage.name, usage.object_count, usage.size_human
            );

            match (
                total_objects.checked_add(usage.object_count),
                total_size_bytes.checked_add(usage.size_bytes),
            ) {
                (Some(objects), Some(size_bytes)) => {
                    total_objects = objects;
                    total_size_bytes = size_bytes;
                }
                _ => {
                    return Err(CloudspendError::enumeration(
                        Some(usage.name),
                        CloudspendError::CountOverflow,
                    ));
                }
            }
            usages.push(usage);
        }

        if let Some(pb) = progress {
            pb.finish_with_message(format!("Scanned {} containers", usages.len()));
        }

        let estimated_monthly_cost = self.cost_model.estimate(total_size_bytes)?;
        let total_size_human = format_size(total_size_bytes);

        info!(
            "Aggregated {} containers, {} objects, {}",
            usages.len(),
            total_objects,
            total_size_human
        );

        Ok(UsageReport {
            containers: usages,
            total_objects,
            total_size_bytes,
            total_size_human,
            estimated_monthly_cost,
        })
    }
}
