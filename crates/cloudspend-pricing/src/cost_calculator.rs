//! Tiered cost model for storage estimates
//!
//! A [`TieredCostModel`] holds an ordered list of [`PricingTier`]s. The first
//! tier whose bound contains the account's total byte count supplies a flat
//! per-gigabyte price, which is then applied to the whole byte count.
//!
//! The default table mirrors the published standard storage tiers:
//!
//! | Total bytes | USD per GB |
//! |---|---|
//! | up to 50,000,000,000,000 | 0.023 |
//! | up to 450,000,000,000,000 | 0.022 |
//! | from 500,000,000,000,000 | 0.021 |
//!
//! Totals strictly between 450T and 500T bytes match no tier and are
//! rejected with `UnsupportedPricingTier`.
//!
//! # Examples
//!
//! ```
//! use cloudspend_pricing::TieredCostModel;
//!
//! let model = TieredCostModel::default();
//! let cost = model.estimate(1_073_741_824).unwrap();
//! assert_eq!(cost, 0.023);
//! ```

use cloudspend_core::error::{CloudspendError, Result};
use cloudspend_core::report_types::ESTIMATE_DIGITS;
use cloudspend_core::rounding::round_to;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Bytes per gigabyte used to derive the per-byte price
pub const BYTES_PER_GB: f64 = 1_073_741_824.0;

/// Which totals a tier covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TierBound {
    /// Totals up to and including the bound
    AtMost(u64),
    /// Totals at or above the bound
    AtLeast(u64),
}

impl TierBound {
    /// Whether `total_bytes` falls under this bound
    pub fn contains(&self, total_bytes: u64) -> bool {
        match *self {
            Self::AtMost(limit) => total_bytes <= limit,
            Self::AtLeast(limit) => total_bytes >= limit,
        }
    }
}

/// A byte-count band with a flat per-gigabyte price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingTier {
    /// Totals covered by the tier
    pub bound: TierBound,
    /// Price per gigabyte per month in USD
    pub price_per_gb: f64,
}

impl PricingTier {
    /// Tier covering totals up to and including `limit` bytes
    pub const fn at_most(limit: u64, price_per_gb: f64) -> Self {
        Self {
            bound: TierBound::AtMost(limit),
            price_per_gb,
        }
    }

    /// Tier covering totals of at least `limit` bytes
    pub const fn at_least(limit: u64, price_per_gb: f64) -> Self {
        Self {
            bound: TierBound::AtLeast(limit),
            price_per_gb,
        }
    }
}

/// The standard storage price table
pub const STANDARD_TIERS: [PricingTier; 3] = [
    PricingTier::at_most(50_000_000_000_000, 0.023),
    PricingTier::at_most(450_000_000_000_000, 0.022),
    PricingTier::at_least(500_000_000_000_000, 0.021),
];

/// Converts total stored bytes into an estimated monthly cost
#[derive(Debug, Clone, PartialEq)]
pub struct TieredCostModel {
    /// Tiers in evaluation order
    tiers: Vec<PricingTier>,
}

impl Default for TieredCostModel {
    fn default() -> Self {
        Self::new(STANDARD_TIERS.to_vec())
    }
}

impl TieredCostModel {
    /// Create a model from tiers, evaluated first to last
    pub fn new(tiers: Vec<PricingTier>) -> Self {
        Self { tiers }
    }

    /// The tiers in evaluation order
    pub fn tiers(&self) -> &[PricingTier] {
        &self.tiers
    }

    /// Per-gigabyte price applicable to `total_bytes`
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedPricingTier` when no tier covers the total
    pub fn price_per_gb(&self, total_bytes: u64) -> Result<f64> {
        self.tiers
            .iter()
            .find(|tier| tier.bound.contains(total_bytes))
            .map(|tier| tier.price_per_gb)
            .ok_or(CloudspendError::UnsupportedPricingTier { total_bytes })
    }

    /// Estimated monthly cost of storing `total_bytes`
    ///
    /// The tier price is converted to a per-byte price and multiplied by the
    /// total; the result is rounded to six decimal places.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedPricingTier` when no tier covers the total
    pub fn estimate(&self, total_bytes: u64) -> Result<f64> {
        let price_per_gb = self.price_per_gb(total_bytes)?;
        let price_per_byte = price_per_gb / BYTES_PER_GB;
        let cost = round_to(total_bytes as f64 * price_per_byte, ESTIMATE_DIGITS);

        debug!(
            "Estimated ${:.6} for {} bytes at ${}/GB",
            cost, total_bytes, price_per_gb
        );

        Ok(cost)
    }
}
