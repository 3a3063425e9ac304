//! Storage pricing for cloudspend
//!
//! This crate turns a total byte count into an estimated monthly storage
//! cost using a static table of per-gigabyte price tiers.

pub mod cost_calculator;

pub use cost_calculator::{PricingTier, TierBound, TieredCostModel};
