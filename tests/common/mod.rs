//! Common test utilities and helpers for cloudspend tests
//!
//! Builds exported account snapshots in temporary directories so the
//! aggregators can be exercised against the on-disk providers.

#![allow(dead_code)]

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use serde_json::json;
use std::env;
use std::fs;
use tempfile::TempDir;

// Global mutex to serialize environment variable modifications in tests
pub static ENV_MUTEX: Lazy<tokio::sync::Mutex<()>> = Lazy::new(|| tokio::sync::Mutex::new(()));

/// Sets an environment variable and restores the previous value on drop
pub struct ScopedEnv {
    key: String,
    previous: Option<String>,
}

impl ScopedEnv {
    pub fn set(key: &str, value: &str) -> Self {
        let previous = env::var(key).ok();
        // SAFETY: callers hold ENV_MUTEX while the guard is alive
        unsafe {
            env::set_var(key, value);
        }
        Self {
            key: key.to_string(),
            previous,
        }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        // SAFETY: callers hold ENV_MUTEX while the guard is alive
        unsafe {
            match self.previous.take() {
                Some(value) => env::set_var(&self.key, value),
                None => env::remove_var(&self.key),
            }
        }
    }
}

/// Builder for exported account snapshots
pub struct ExportBuilder {
    dir: TempDir,
    buckets: Vec<String>,
    line_items: Vec<String>,
}

impl ExportBuilder {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
            buckets: Vec::new(),
            line_items: Vec::new(),
        }
    }

    /// Add a bucket whose listing consists of `pages`, each a list of object sizes
    pub fn bucket(mut self, name: &str, pages: &[&[u64]]) -> Self {
        let bucket_dir = self.dir.path().join("storage").join(name);
        fs::create_dir_all(&bucket_dir).expect("create bucket dir");

        for (i, sizes) in pages.iter().enumerate() {
            let contents: Vec<_> = sizes
                .iter()
                .enumerate()
                .map(|(j, size)| json!({ "Key": format!("{name}/object-{i}-{j}"), "Size": size }))
                .collect();
            let page = if contents.is_empty() {
                json!({ "KeyCount": 0, "IsTruncated": i + 1 < pages.len() })
            } else {
                json!({
                    "Contents": contents,
                    "KeyCount": sizes.len(),
                    "IsTruncated": i + 1 < pages.len(),
                })
            };
            fs::write(bucket_dir.join(format!("page-{i:05}.json")), page.to_string())
                .expect("write page");
        }

        self.buckets.push(name.to_string());
        self
    }

    /// Add a bucket name to the listing without writing any pages
    pub fn listed_only(mut self, name: &str) -> Self {
        self.buckets.push(name.to_string());
        self
    }

    /// Add a billing line item
    pub fn line_item(mut self, usage_start: &str, service: &str, cost: &str) -> Self {
        self.line_items.push(
            json!({
                "usage_start": usage_start,
                "service": service,
                "unblended_cost": cost,
                "currency": "USD",
            })
            .to_string(),
        );
        self
    }

    /// Add a raw line to the billing export
    pub fn raw_line(mut self, line: &str) -> Self {
        self.line_items.push(line.to_string());
        self
    }

    /// Write the bucket list and billing file, returning the data directory
    pub fn build(self) -> TempDir {
        let storage = self.dir.path().join("storage");
        fs::create_dir_all(&storage).expect("create storage dir");
        let buckets: Vec<_> = self
            .buckets
            .iter()
            .map(|name| json!({ "Name": name, "CreationDate": "2024-01-01T00:00:00.000Z" }))
            .collect();
        fs::write(
            storage.join("buckets.json"),
            json!({ "Buckets": buckets, "Owner": { "ID": "test" } }).to_string(),
        )
        .expect("write bucket list");

        let billing = self.dir.path().join("billing");
        fs::create_dir_all(&billing).expect("create billing dir");
        let mut content = self.line_items.join("\n");
        content.push('\n');
        fs::write(billing.join("line_items.jsonl"), content).expect("write line items");

        self.dir
    }
}

impl Default for ExportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// March 2025 billing data used by several tests
pub fn march_billing() -> ExportBuilder {
    ExportBuilder::new()
        .line_item("2025-02-28T23:00:00Z", "Amazon S3", "40.00")
        .line_item("2025-03-01T10:00:00Z", "Amazon S3", "1.50")
        .line_item("2025-03-01T12:00:00Z", "AWS Lambda", "0.25")
        .line_item("2025-03-02T00:00:00Z", "Amazon S3", "2.00")
        .line_item("2025-03-02T05:00:00Z", "Tax", "0.00002")
        .line_item("2025-03-03T00:00:00Z", "AWS Support", "0")
        .line_item("2025-04-01T00:00:00Z", "Amazon S3", "100.00")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}
