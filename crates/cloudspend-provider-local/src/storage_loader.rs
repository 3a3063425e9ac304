//! Storage listing from exported bucket listings
//!
//! Bucket names come from `storage/buckets.json`, a saved ListBuckets
//! response. Each bucket's objects come from `storage/<bucket>/*.json`, the
//! saved pages of a ListObjectsV2 listing, read in file-name order. A page
//! without a `Contents` array is an empty page.

use crate::export_error;
use cloudspend_core::error::Result;
use cloudspend_core::provider::{ResultStream, StorageProvider};
use cloudspend_core::types::{ContainerName, ObjectPage, ObjectRecord};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// File holding the bucket list, relative to the storage directory
pub const BUCKETS_FILE: &str = "buckets.json";

/// Storage provider backed by an exported snapshot
pub struct StorageExport {
    storage_dir: PathBuf,
}

impl StorageExport {
    /// Create a provider reading `<data_dir>/storage`
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            storage_dir: data_dir.as_ref().join("storage"),
        }
    }

    /// Directory the listings are read from
    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    fn bucket_dir(&self, container: &ContainerName) -> Result<PathBuf> {
        let name = container.as_str();
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(export_error(
                &self.storage_dir,
                format!("invalid bucket name '{name}'"),
            ));
        }
        Ok(self.storage_dir.join(name))
    }
}

/// Page files of a bucket, sorted by file name
fn page_files(bucket_dir: &Path) -> Result<Vec<PathBuf>> {
    if !bucket_dir.is_dir() {
        return Err(export_error(bucket_dir, "bucket listing not found"));
    }

    let mut pages = Vec::new();
    for entry in WalkDir::new(bucket_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| export_error(bucket_dir, e))?;
        let is_page = entry.file_type().is_file()
            && entry.path().extension().is_some_and(|ext| ext == "json");
        if is_page {
            pages.push(entry.into_path());
        }
    }
    Ok(pages)
}

impl StorageProvider for StorageExport {
    fn list_containers(&self) -> ResultStream<'_, ContainerName> {
        Box::pin(async_stream::try_stream! {
            let path = self.storage_dir.join(BUCKETS_FILE);
            let content = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| export_error(&path, e))?;
            let response: ListBucketsResponse =
                serde_json::from_str(&content).map_err(|e| export_error(&path, e))?;

            debug!("Found {} buckets in {}", response.buckets.len(), path.display());

            for bucket in response.buckets {
                yield ContainerName::new(bucket.name);
            }
        })
    }

    fn list_objects(&self, container: &ContainerName) -> ResultStream<'_, ObjectPage> {
        let bucket_dir = self.bucket_dir(container);
        Box::pin(async_stream::try_stream! {
            let bucket_dir = bucket_dir?;
            let pages = page_files(&bucket_dir)?;
            debug!("Reading {} listing pages from {}", pages.len(), bucket_dir.display());

            for path in pages {
                let content = tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|e| export_error(&path, e))?;
                let page: ListObjectsPage =
                    serde_json::from_str(&content).map_err(|e| export_error(&path, e))?;

                trace!("{}: {} objects", path.display(), page.contents.len());

                yield ObjectPage::new(
                    page.contents
                        .into_iter()
                        .map(|object| ObjectRecord::new(object.size))
                        .collect(),
                );
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Listing schema
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListBucketsResponse {
    #[serde(default)]
    buckets: Vec<BucketEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct BucketEntry {
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListObjectsPage {
    #[serde(default)]
    contents: Vec<ObjectEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ObjectEntry {
    size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudspend_core::error::CloudspendError;
    use futures::StreamExt;
    use std::fs;
    use tempfile::TempDir;

    fn write_export(buckets: &[(&str, &[&str])]) -> TempDir {
        let dir = TempDir::new().unwrap();
        let storage = dir.path().join("storage");
        fs::create_dir_all(&storage).unwrap();

        let names: Vec<_> = buckets
            .iter()
            .map(|(name, _)| {
                serde_json::json!({ "Name": name, "CreationDate": "2024-01-01T00:00:00Z" })
            })
            .collect();
        fs::write(
            storage.join(BUCKETS_FILE),
            serde_json::json!({ "Buckets": names }).to_string(),
        )
        .unwrap();

        for (name, pages) in buckets {
            let bucket_dir = storage.join(name);
            fs::create_dir_all(&bucket_dir).unwrap();
            for (i, page) in pages.iter().enumerate() {
                fs::write(bucket_dir.join(format!("page-{i:04}.json")), page).unwrap();
            }
        }
        dir
    }

    #[tokio::test]
    async fn test_lists_buckets_in_file_order() {
        let dir = write_export(&[("zeta", &[]), ("alpha", &[])]);
        let export = StorageExport::new(dir.path());

        let names: Vec<_> = export
            .list_containers()
            .map(|r| r.unwrap().to_string())
            .collect()
            .await;
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[tokio::test]
    async fn test_reads_pages_including_empty_ones() {
        let dir = write_export(&[(
            "logs",
            &[
                concat!(
                    r#"{"Contents":[{"Key":"a","Size":100},{"Key":"b","Size":200}],"#,
                    r#""IsTruncated":true}"#
                ),
                r#"{"KeyCount":0,"IsTruncated":true}"#,
                r#"{"Contents":[{"Key":"c","Size":50}],"IsTruncated":false}"#,
            ],
        )]);
        let export = StorageExport::new(dir.path());

        let pages: Vec<_> = export
            .list_objects(&ContainerName::new("logs"))
            .map(|r| r.unwrap())
            .collect()
            .await;

        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].total_size(), Some(300));
        assert!(pages[1].is_empty());
        assert_eq!(pages[2].records, vec![ObjectRecord::new(50)]);
    }

    #[tokio::test]
    async fn test_missing_bucket_directory_is_an_error() {
        let dir = write_export(&[("logs", &[])]);
        let export = StorageExport::new(dir.path());

        let mut pages = export.list_objects(&ContainerName::new("missing"));
        let first = pages.next().await.unwrap();
        assert!(matches!(first, Err(CloudspendError::Provider { .. })));
    }

    #[tokio::test]
    async fn test_rejects_path_like_bucket_names() {
        let dir = write_export(&[]);
        let export = StorageExport::new(dir.path());

        let mut pages = export.list_objects(&ContainerName::new("../billing"));
        assert!(pages.next().await.unwrap().is_err());
    }

    #[tokio::test]
    async fn test_malformed_page_is_an_error() {
        let dir = write_export(&[("logs", &[r#"{"Contents":[{"Key":"a"}]}"#])]);
        let export = StorageExport::new(dir.path());

        let results: Vec<_> = export
            .list_objects(&ContainerName::new("logs"))
            .collect()
            .await;
        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }

    #[tokio::test]
    async fn test_missing_bucket_list_is_an_error() {
        let dir = TempDir::new().unwrap();
        let export = StorageExport::new(dir.path());

        let results: Vec<_> = export.list_containers().collect().await;
        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }
}
