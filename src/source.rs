//! Where directory records come from.
//!
//! The CLI reads a JSON cache written by an earlier directory query
//! ([`CacheFileSource`]); tests and library users can hand records over
//! directly ([`StaticSource`]). Both return a [`RecordSet`].
//!
//! # Example
//!
//! ```ignore
//! use spraymask::{CacheFileSource, RecordSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = CacheFileSource::new("ldap_cache.json").expect_server("10.10.10.10", 389);
//!     let records = source.fetch().await?;
//!     println!("{} records from {}", records.entries.len(), source.source_name());
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::data::DEFAULT_ATTRIBUTES;
use crate::error::SourceError;
use crate::loader::DirectoryCache;
use crate::record::DirectoryEntry;

/// Records plus the attribute names that were requested for them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    pub entries: Vec<DirectoryEntry>,
    pub attributes: Vec<String>,
}

/// Supplies a full set of directory records in one call.
///
/// `fetch` is async so file-backed sources read through `tokio::fs`.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch every record the source has.
    async fn fetch(&self) -> Result<RecordSet, SourceError>;

    /// Label used in log lines and error messages
    fn source_name(&self) -> &str;
}

/// Reads records from a JSON cache file written by an earlier query.
#[derive(Debug, Clone)]
pub struct CacheFileSource {
    path: PathBuf,
    name: String,
    expected_server: Option<(String, u16)>,
}

impl CacheFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        CacheFileSource {
            name: format!("cache file {}", path.display()),
            path,
            expected_server: None,
        }
    }

    /// Refuse a cache that was built against another server or port.
    pub fn expect_server(mut self, server: &str, port: u16) -> Self {
        self.expected_server = Some((server.to_string(), port));
        self
    }
}

#[async_trait]
impl RecordSource for CacheFileSource {
    async fn fetch(&self) -> Result<RecordSet, SourceError> {
        let content =
            tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|source| SourceError::Read {
                    path: self.path.clone(),
                    source,
                })?;
        let cache = DirectoryCache::from_json(&content, &self.path)?;

        if let Some((server, port)) = &self.expected_server {
            if cache.is_stale_for(server, *port) {
                return Err(SourceError::StaleCache {
                    cached: cache.server_address(),
                    requested: format!("{server}:{port}"),
                });
            }
        }

        info!(
            path = %self.path.display(),
            entries = cache.entries.len(),
            cached_at = %cache.cached_at,
            "loaded directory cache"
        );
        let attributes = if cache.attributes.is_empty() {
            debug!("cache lists no attributes, using defaults");
            DEFAULT_ATTRIBUTES.iter().map(|name| name.to_string()).collect()
        } else {
            cache.attributes
        };
        Ok(RecordSet {
            entries: cache.entries,
            attributes,
        })
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

/// Serves a fixed set of records from memory.
///
/// Useful for testing without a cache file.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: RecordSet,
}

impl StaticSource {
    pub fn new(entries: Vec<DirectoryEntry>) -> Self {
        StaticSource {
            records: RecordSet {
                entries,
                attributes: DEFAULT_ATTRIBUTES.iter().map(|name| name.to_string()).collect(),
            },
        }
    }

    pub fn with_attributes(mut self, attributes: &[&str]) -> Self {
        self.records.attributes = attributes.iter().map(|name| name.to_string()).collect();
        self
    }
}

#[async_trait]
impl RecordSource for StaticSource {
    async fn fetch(&self) -> Result<RecordSet, SourceError> {
        Ok(self.records.clone())
    }

    fn source_name(&self) -> &str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::save_cache_to_file;

    fn write_cache(dir: &Path, attributes: Vec<String>) -> PathBuf {
        let mut entry = DirectoryEntry::new("CN=John Smith");
        entry.with_attribute("sn", "Smith");
        let cache = DirectoryCache::new(vec![entry], attributes).with_server("dc01", 389);
        let path = dir.join("ldap_cache.json");
        save_cache_to_file(&cache, &path).unwrap();
        path
    }

    #[tokio::test]
    async fn test_cache_file_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_cache(dir.path(), vec!["sn".to_string()]);

        let source = CacheFileSource::new(&path);
        let records = source.fetch().await.unwrap();
        assert_eq!(records.entries.len(), 1);
        assert_eq!(records.attributes, vec!["sn".to_string()]);
        assert!(source.source_name().contains("ldap_cache.json"));
    }

    #[tokio::test]
    async fn test_default_attributes_when_cache_has_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_cache(dir.path(), Vec::new());

        let records = CacheFileSource::new(&path).fetch().await.unwrap();
        assert_eq!(records.attributes.len(), DEFAULT_ATTRIBUTES.len());
    }

    #[tokio::test]
    async fn test_stale_cache_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_cache(dir.path(), Vec::new());

        let matching = CacheFileSource::new(&path).expect_server("dc01", 389);
        assert!(matching.fetch().await.is_ok());

        let other = CacheFileSource::new(&path).expect_server("dc02", 389);
        let err = other.fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::StaleCache { .. }));
    }

    #[tokio::test]
    async fn test_missing_cache_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = CacheFileSource::new(dir.path().join("nope.json"));
        assert!(matches!(
            source.fetch().await,
            Err(SourceError::Read { .. })
        ));
    }

    #[tokio::test]
    async fn test_static_source() {
        let source = StaticSource::new(vec![DirectoryEntry::new("CN=a")]).with_attributes(&["sn"]);
        let records = source.fetch().await.unwrap();
        assert_eq!(records.entries.len(), 1);
        assert_eq!(records.attributes, vec!["sn".to_string()]);
        assert_eq!(source.source_name(), "static");
    }
}
