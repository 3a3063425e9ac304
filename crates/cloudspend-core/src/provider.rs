//! Collaborator traits for listing storage and querying billing data
//!
//! The aggregators never talk to a cloud API directly. They consume lazy
//! streams handed out by implementations of these traits, so any backend
//! (an SDK client, an exported snapshot, a test fixture) can be plugged in.

use crate::date_range::DateRange;
use crate::error::Result;
use crate::types::{ContainerName, CostBucket, Granularity, ObjectPage};
use futures::stream::Stream;
use std::pin::Pin;

/// Boxed, fallible stream borrowed from a collaborator
pub type ResultStream<'a, T> = Pin<Box<dyn Stream<Item = Result<T>> + Send + 'a>>;

/// Source of storage containers and their objects.
pub trait StorageProvider: Send + Sync {
    /// Stream the names of every container in the account.
    ///
    /// No ordering is guaranteed; consumers keep whatever order they receive.
    fn list_containers(&self) -> ResultStream<'_, ContainerName>;

    /// Stream the pages of a container's object listing.
    ///
    /// The stream is finite and consumed once. Pages may be empty.
    fn list_objects(&self, container: &ContainerName) -> ResultStream<'_, ObjectPage>;
}

/// Source of time-bucketed billing data.
pub trait CostQuery: Send + Sync {
    /// Stream cost buckets covering `range` at the requested granularity.
    ///
    /// With `grouped` set, each bucket carries per-category amounts;
    /// otherwise it carries a single total.
    fn query_cost(
        &self,
        range: DateRange,
        granularity: Granularity,
        grouped: bool,
    ) -> ResultStream<'_, CostBucket>;
}
