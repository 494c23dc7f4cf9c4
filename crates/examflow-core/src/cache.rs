//! Versioned static asset cache.
//!
//! The app shell (root document, index page, favicon) is pinned under a
//! versioned cache name so the UI opens offline. Bumping [`CACHE_NAME`]
//! and re-priming supersedes the old version; [`purge_stale`] then drops
//! every asset stored under any other version. Reads are cache-first:
//! a miss falls back to the network and the response is served without
//! being stored, so the cache only ever holds deliberately primed
//! assets.
//!
//! [`purge_stale`]: AssetCache::purge_stale

use chrono::Utc;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{CacheError, StoreError};
use crate::storage::{AssetMeta, CachedAsset, Database};

/// Current cache version. Old versions are purged, not migrated.
pub const CACHE_NAME: &str = "examflow-cache-v1.0.0";

/// The fixed asset list that gets primed. Never derived from traffic.
pub const STATIC_ASSETS: [&str; 3] = ["/", "/index.html", "/favicon.ico"];

/// What a priming run stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrimeSummary {
    pub cache_name: String,
    pub cached: Vec<String>,
}

pub struct AssetCache<'a> {
    db: &'a Database,
}

impl<'a> AssetCache<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Fetch every static asset from `origin` and store it under the
    /// current cache version. The first failure aborts the run.
    pub async fn prime(&self, client: &Client, origin: &Url) -> Result<PrimeSummary, CacheError> {
        let mut cached = Vec::new();
        for path in STATIC_ASSETS {
            let (body, content_type) = fetch_asset(client, origin, path).await?;
            self.db
                .asset_put(CACHE_NAME, path, &body, content_type.as_deref())
                .map_err(StoreError::from)?;
            cached.push(path.to_string());
        }
        log::info!("primed {} asset(s) into {CACHE_NAME}", cached.len());
        Ok(PrimeSummary {
            cache_name: CACHE_NAME.to_string(),
            cached,
        })
    }

    /// Read an asset from the current cache version.
    pub fn lookup(&self, path: &str) -> Result<Option<CachedAsset>, StoreError> {
        Ok(self.db.asset_get(CACHE_NAME, path)?)
    }

    /// Cache-first read: serve the stored copy, or fall back to the
    /// network. The network response is returned but never stored.
    pub async fn lookup_or_fetch(
        &self,
        client: &Client,
        origin: &Url,
        path: &str,
    ) -> Result<CachedAsset, CacheError> {
        if let Some(asset) = self.lookup(path)? {
            return Ok(asset);
        }
        log::debug!("cache miss for {path}; fetching from origin");
        let (body, content_type) = fetch_asset(client, origin, path).await?;
        Ok(CachedAsset {
            path: path.to_string(),
            body,
            content_type,
            fetched_at: Utc::now().to_rfc3339(),
        })
    }

    /// Drop every asset stored under a version other than the current
    /// one. Returns the number of assets removed.
    pub fn purge_stale(&self) -> Result<usize, StoreError> {
        let removed = self.db.asset_purge_except(CACHE_NAME)?;
        if removed > 0 {
            log::info!("purged {removed} stale cached asset(s)");
        }
        Ok(removed)
    }

    /// List the assets under the current version.
    pub fn entries(&self) -> Result<Vec<AssetMeta>, StoreError> {
        Ok(self.db.asset_list(CACHE_NAME)?)
    }
}

async fn fetch_asset(
    client: &Client,
    origin: &Url,
    path: &str,
) -> Result<(Vec<u8>, Option<String>), CacheError> {
    let url = origin.join(path).map_err(|e| CacheError::InvalidPath {
        path: path.to_string(),
        message: e.to_string(),
    })?;
    let resp = client
        .get(url)
        .send()
        .await
        .map_err(|e| CacheError::FetchFailed {
            path: path.to_string(),
            message: e.to_string(),
        })?;
    if !resp.status().is_success() {
        return Err(CacheError::BadStatus {
            path: path.to_string(),
            status: resp.status().as_u16(),
        });
    }
    let content_type = resp
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());
    let body = resp
        .bytes()
        .await
        .map_err(|e| CacheError::FetchFailed {
            path: path.to_string(),
            message: e.to_string(),
        })?
        .to_vec();
    Ok((body, content_type))
}
