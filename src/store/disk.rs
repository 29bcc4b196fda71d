//! Directory-backed cache store
//!
//! # Layout
//!
//! ```text
//! <root>/{hex(cache name)}/
//!   NAME                  # original cache name
//!   {sha256(request)}.body  # raw response body
//!   {sha256(request)}.json  # request URL, status, headers, stored_at
//! ```
//!
//! The `.json` file is written last, so an entry is only visible once its
//! body is on disk.

use super::{CacheHandle, CacheStore};
use crate::error::{OfflineError, OfflineResult};
use crate::fetch::Response;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, warn};

const NAME_FILE: &str = "NAME";

/// Metadata stored next to each response body
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredEntry {
    request: String,
    url: String,
    status: u16,
    #[serde(default)]
    headers: Vec<(String, String)>,
    stored_at: DateTime<Utc>,
}

/// Store rooted at a directory
#[derive(Debug, Clone)]
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn cache_dir(&self, name: &str) -> PathBuf {
        self.root.join(hex::encode(name.as_bytes()))
    }
}

#[async_trait]
impl CacheStore for DiskStore {
    async fn open(&self, name: &str) -> OfflineResult<Arc<dyn CacheHandle>> {
        let dir = self.cache_dir(name);
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| OfflineError::store(format!("creating cache {}", dir.display()), e))?;

        let name_path = dir.join(NAME_FILE);
        if !exists(&name_path).await? {
            fs::write(&name_path, name).await.map_err(|e| {
                OfflineError::store(format!("writing {}", name_path.display()), e)
            })?;
            debug!("Created cache '{}' at {}", name, dir.display());
        }

        Ok(Arc::new(DiskCache { dir }))
    }

    async fn has(&self, name: &str) -> OfflineResult<bool> {
        exists(&self.cache_dir(name).join(NAME_FILE)).await
    }

    async fn keys(&self) -> OfflineResult<Vec<String>> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(OfflineError::store("reading store directory", e)),
        };

        let mut names = vec![];
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| OfflineError::store("reading store entry", e))?
        {
            let path = entry.path().join(NAME_FILE);
            match fs::read_to_string(&path).await {
                Ok(name) => names.push(name),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => warn!("Skipping unreadable cache {}: {}", path.display(), e),
            }
        }

        names.sort();
        Ok(names)
    }

    async fn delete(&self, name: &str) -> OfflineResult<bool> {
        let dir = self.cache_dir(name);
        match fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(OfflineError::store(
                format!("deleting cache {}", dir.display()),
                e,
            )),
        }
    }
}

async fn exists(path: &Path) -> OfflineResult<bool> {
    fs::try_exists(path)
        .await
        .map_err(|e| OfflineError::store(format!("checking {}", path.display()), e))
}

/// One cache directory
#[derive(Debug)]
struct DiskCache {
    dir: PathBuf,
}

impl DiskCache {
    fn entry_stem(request: &str) -> String {
        hex::encode(Sha256::digest(request.as_bytes()))
    }

    fn meta_path(&self, request: &str) -> PathBuf {
        self.dir.join(format!("{}.json", Self::entry_stem(request)))
    }

    fn body_path(&self, request: &str) -> PathBuf {
        self.dir.join(format!("{}.body", Self::entry_stem(request)))
    }
}

#[async_trait]
impl CacheHandle for DiskCache {
    async fn lookup(&self, request: &str) -> OfflineResult<Option<Response>> {
        let meta_path = self.meta_path(request);
        let content = match fs::read_to_string(&meta_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(OfflineError::store(
                    format!("reading {}", meta_path.display()),
                    e,
                ))
            }
        };

        let entry: StoredEntry = serde_json::from_str(&content)?;
        if entry.request != request {
            return Err(OfflineError::StoreOperation(format!(
                "{} holds '{}', expected '{}'",
                meta_path.display(),
                entry.request,
                request
            )));
        }

        let body_path = self.body_path(request);
        let body = fs::read(&body_path)
            .await
            .map_err(|e| OfflineError::store(format!("reading {}", body_path.display()), e))?;

        Ok(Some(Response {
            url: entry.url,
            status: entry.status,
            headers: entry.headers,
            body,
        }))
    }

    async fn put(&self, request: &str, response: &Response) -> OfflineResult<()> {
        let body_path = self.body_path(request);
        fs::write(&body_path, &response.body)
            .await
            .map_err(|e| OfflineError::store(format!("writing {}", body_path.display()), e))?;

        let entry = StoredEntry {
            request: request.to_string(),
            url: response.url.clone(),
            status: response.status,
            headers: response.headers.clone(),
            stored_at: Utc::now(),
        };
        let meta_path = self.meta_path(request);
        fs::write(&meta_path, serde_json::to_string_pretty(&entry)?)
            .await
            .map_err(|e| OfflineError::store(format!("writing {}", meta_path.display()), e))?;

        Ok(())
    }

    async fn entries(&self) -> OfflineResult<Vec<String>> {
        let mut dir = fs::read_dir(&self.dir)
            .await
            .map_err(|e| OfflineError::store(format!("reading {}", self.dir.display()), e))?;

        let mut requests = vec![];
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| OfflineError::store("reading cache entry", e))?
        {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                let content = fs::read_to_string(&path).await.ok();
                if let Some(stored) =
                    content.and_then(|c| serde_json::from_str::<StoredEntry>(&c).ok())
                {
                    requests.push(stored.request);
                }
            }
        }

        requests.sort();
        Ok(requests)
    }
}
