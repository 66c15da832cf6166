//! The JSON directory cache.
//!
//! Directory queries are slow and noisy, so the records of a previous query
//! are kept in a JSON file:
//!
//! ```json
//! {
//!     "entries": [
//!         { "dn": "CN=John Smith,DC=corp,DC=local",
//!           "attributes": { "sn": ["Smith"], "pwdLastSet": ["133549776000000000"] } }
//!     ],
//!     "cached_at": "2024-03-15T12:00:00Z",
//!     "search_base": "DC=corp,DC=local",
//!     "ldap_filter": "(&(objectClass=User)(objectCategory=Person))",
//!     "attributes": ["sn", "pwdLastSet"],
//!     "ldap_server": "10.10.10.10",
//!     "ldap_port": 389
//! }
//! ```

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SourceError;
use crate::record::DirectoryEntry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryCache {
    #[serde(default)]
    pub entries: Vec<DirectoryEntry>,
    pub cached_at: DateTime<Utc>,
    #[serde(default)]
    pub search_base: String,
    #[serde(default)]
    pub ldap_filter: String,
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub ldap_server: String,
    #[serde(default)]
    pub ldap_port: u16,
}

impl DirectoryCache {
    pub fn new(entries: Vec<DirectoryEntry>, attributes: Vec<String>) -> Self {
        DirectoryCache {
            entries,
            cached_at: Utc::now(),
            search_base: String::new(),
            ldap_filter: String::new(),
            attributes,
            ldap_server: String::new(),
            ldap_port: 0,
        }
    }

    pub fn with_server(mut self, server: &str, port: u16) -> Self {
        self.ldap_server = server.to_string();
        self.ldap_port = port;
        self
    }

    pub fn with_query(mut self, search_base: &str, ldap_filter: &str) -> Self {
        self.search_base = search_base.to_string();
        self.ldap_filter = ldap_filter.to_string();
        self
    }

    /// True when the cache was built against a different server or port.
    pub fn is_stale_for(&self, server: &str, port: u16) -> bool {
        self.ldap_server != server || self.ldap_port != port
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.ldap_server, self.ldap_port)
    }

    pub fn from_json(content: &str, path: &Path) -> Result<Self, SourceError> {
        serde_json::from_str(content).map_err(|source| SourceError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_json(&self) -> Result<String, SourceError> {
        serde_json::to_string_pretty(self).map_err(SourceError::Serialize)
    }
}

/// Load a cache file.
///
/// # Errors
/// - File not found or unreadable
/// - Invalid JSON or missing `cached_at`
pub fn load_cache_from_file(path: &Path) -> Result<DirectoryCache, SourceError> {
    let content = fs::read_to_string(path).map_err(|source| SourceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    DirectoryCache::from_json(&content, path)
}

/// Write a cache file, replacing any existing one.
pub fn save_cache_to_file(cache: &DirectoryCache, path: &Path) -> Result<(), SourceError> {
    let json = cache.to_json()?;
    fs::write(path, json).map_err(|source| SourceError::Write {
        path: path.to_path_buf(),
        source,
    })
}
