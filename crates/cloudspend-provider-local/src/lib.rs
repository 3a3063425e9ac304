//! Exported-snapshot provider for cloudspend
//!
//! This crate implements the storage and billing collaborator traits on top
//! of account data exported to disk:
//!
//! ```text
//! <data dir>/
//!   storage/buckets.json          ListBuckets response
//!   storage/<bucket>/<page>.json  ListObjectsV2 responses, one per page
//!   billing/*.jsonl               cost line items, one JSON object per line
//! ```

pub mod billing_loader;
pub mod storage_loader;

use cloudspend_core::error::{CloudspendError, Result};
use std::fmt::Display;
use std::path::{Path, PathBuf};

pub use billing_loader::BillingExport;
pub use storage_loader::StorageExport;

/// Environment variable naming the data directory
pub const DATA_DIR_ENV: &str = "CLOUDSPEND_DATA_DIR";

/// Resolve the export directory, falling back to the platform data dir
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(dir) => Ok(dir),
        None => dirs::data_dir()
            .map(|dir| dir.join("cloudspend"))
            .ok_or_else(|| CloudspendError::Config("Cannot determine data directory".into())),
    }
}

pub(crate) fn export_error(path: &Path, error: impl Display) -> CloudspendError {
    CloudspendError::Provider {
        path: path.to_path_buf(),
        error: error.to_string(),
    }
}
