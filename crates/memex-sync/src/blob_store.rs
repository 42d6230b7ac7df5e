//! The object-store client abstraction (§4.7, §6.4). Grounded on
//! `cortex-cloud::transport::HttpClient`: a thin typed wrapper over
//! `reqwest`, with the blob operations spec.md scopes to "interface only"
//! pulled out as a trait so the replicator can be exercised against an
//! in-memory fake in tests.

use std::time::Duration;

use memex_core::constants::OBJECT_STORE_TIMEOUT_SECONDS;
use memex_core::errors::{MemexResult, ReplicationError};

/// A blob plus its opaque version token, used for optimistic updates.
#[derive(Debug, Clone)]
pub struct Blob {
    pub bytes: Vec<u8>,
    pub version: String,
}

/// Minimal object-store surface the replicator needs (§6.4): get, put with
/// optimistic concurrency, and list-by-prefix.
pub trait BlobStore: Send + Sync {
    fn get(&self, key: &str) -> MemexResult<Option<Blob>>;

    /// Write `bytes` at `key`. `expected_version` carries the version read
    /// by a prior `get`; `None` means "create, key must not already exist".
    /// Returns the new version token.
    fn put(&self, key: &str, bytes: &[u8], expected_version: Option<&str>) -> MemexResult<String>;

    fn list(&self, prefix: &str) -> MemexResult<Vec<String>>;
}

/// HTTPS-backed object store, grounded on `cortex-cloud`'s `HttpClient`
/// (bearer-token-optional request builder over a shared blocking
/// `reqwest::Client`). This protocol carries no auth, so this client is
/// simpler than that: no token, no retries, a single timeout.
pub struct HttpBlobStore {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpBlobStore {
    pub fn new(base_url: String, timeout_seconds: u64) -> MemexResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds.max(1)))
            .build()
            .map_err(|e| ReplicationError::ObjectStore(e.to_string()))?;
        Ok(Self { client, base_url })
    }

    pub fn with_default_timeout(base_url: String) -> MemexResult<Self> {
        Self::new(base_url, OBJECT_STORE_TIMEOUT_SECONDS)
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }
}

impl BlobStore for HttpBlobStore {
    fn get(&self, key: &str) -> MemexResult<Option<Blob>> {
        let resp = self
            .client
            .get(self.url_for(key))
            .send()
            .map_err(|e| ReplicationError::ObjectStore(e.to_string()))?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(ReplicationError::ObjectStore(format!("GET {key}: {}", resp.status())).into());
        }
        let version = resp
            .headers()
            .get("etag")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let bytes = resp.bytes().map_err(|e| ReplicationError::ObjectStore(e.to_string()))?.to_vec();
        Ok(Some(Blob { bytes, version }))
    }

    fn put(&self, key: &str, bytes: &[u8], expected_version: Option<&str>) -> MemexResult<String> {
        let mut req = self.client.put(self.url_for(key)).body(bytes.to_vec());
        if let Some(v) = expected_version {
            req = req.header("if-match", v);
        } else {
            req = req.header("if-none-match", "*");
        }
        let resp = req.send().map_err(|e| ReplicationError::ObjectStore(e.to_string()))?;
        if resp.status() == reqwest::StatusCode::PRECONDITION_FAILED || resp.status() == reqwest::StatusCode::CONFLICT {
            return Err(ReplicationError::VersionConflict { key: key.to_string() }.into());
        }
        if !resp.status().is_success() {
            return Err(ReplicationError::ObjectStore(format!("PUT {key}: {}", resp.status())).into());
        }
        let version = resp
            .headers()
            .get("etag")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        Ok(version)
    }

    fn list(&self, prefix: &str) -> MemexResult<Vec<String>> {
        let resp = self
            .client
            .get(self.url_for(&format!("?prefix={prefix}")))
            .send()
            .map_err(|e| ReplicationError::ObjectStore(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(ReplicationError::ObjectStore(format!("LIST {prefix}: {}", resp.status())).into());
        }
        let keys: Vec<String> = resp.json().map_err(|e| ReplicationError::ObjectStore(e.to_string()))?;
        Ok(keys)
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-process fake used by push/pull/cycle tests, avoiding a real
    /// network dependency.
    #[derive(Default)]
    pub struct InMemoryBlobStore {
        objects: Mutex<HashMap<String, Blob>>,
    }

    impl BlobStore for InMemoryBlobStore {
        fn get(&self, key: &str) -> MemexResult<Option<Blob>> {
            Ok(self.objects.lock().unwrap().get(key).cloned())
        }

        fn put(&self, key: &str, bytes: &[u8], expected_version: Option<&str>) -> MemexResult<String> {
            let mut objects = self.objects.lock().unwrap();
            let current = objects.get(key).map(|b| b.version.clone());
            match (expected_version, &current) {
                (None, None) => {}
                (None, Some(_)) => return Err(ReplicationError::VersionConflict { key: key.to_string() }.into()),
                (Some(expected), Some(actual)) if expected == actual => {}
                _ => return Err(ReplicationError::VersionConflict { key: key.to_string() }.into()),
            }
            let new_version = format!("v{}", current.map(|v| v.trim_start_matches('v').parse::<u64>().unwrap_or(0) + 1).unwrap_or(1));
            objects.insert(
                key.to_string(),
                Blob {
                    bytes: bytes.to_vec(),
                    version: new_version.clone(),
                },
            );
            Ok(new_version)
        }

        fn list(&self, prefix: &str) -> MemexResult<Vec<String>> {
            Ok(self
                .objects
                .lock()
                .unwrap()
                .keys()
                .filter(|k| k.starts_with(prefix))
                .cloned()
                .collect())
        }
    }
}
