//! Session-scoped memoization of the selection hierarchy.
//!
//! Option lists are immutable for the lifetime of a session, so entries are
//! populated lazily and never invalidated. Loading goes through `moka`'s
//! `try_get_with`, which coalesces concurrent lookups of the same missing
//! key into a single request ("thundering herd" protection): rapid
//! re-selection before the first response returns cannot issue a duplicate
//! fetch. A failed load caches nothing, so a later selection of the same
//! key retries.

use std::sync::Arc;

use moka::future::Cache;

use crate::error::{ClientError, Result};

/// Synthetic first entry of every message-type list, meaning "let the
/// server infer the type"
pub const AUTO_DETECT: &str = "Auto Detect";

/// Two-level cache of the dependent selection lists
pub struct OptionCache {
    versions: Cache<String, Arc<Vec<String>>>,
    encodings: Cache<(String, String), Arc<Vec<String>>>,
    message_types: Cache<(String, String), Arc<Vec<String>>>,
}

impl Default for OptionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl OptionCache {
    pub fn new() -> Self {
        Self {
            versions: Cache::builder().build(),
            encodings: Cache::builder().build(),
            message_types: Cache::builder().build(),
        }
    }

    /// Versions for a standard: cached list if present, otherwise the
    /// `loader` future runs once and its result is stored and returned.
    pub async fn versions<F, Fut>(&self, standard: &str, loader: F) -> Result<Arc<Vec<String>>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<String>>>,
    {
        self.versions
            .try_get_with(standard.to_string(), async move {
                loader().await.map(Arc::new)
            })
            .await
            .map_err(unwrap_shared)
    }

    /// Encodings for a (standard, version) pair
    pub async fn encodings<F, Fut>(
        &self,
        standard: &str,
        version: &str,
        loader: F,
    ) -> Result<Arc<Vec<String>>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<String>>>,
    {
        self.encodings
            .try_get_with((standard.to_string(), version.to_string()), async move {
                loader().await.map(Arc::new)
            })
            .await
            .map_err(unwrap_shared)
    }

    /// Message types for a (standard, version) pair. "Auto Detect" is
    /// prepended to the raw server list before caching.
    pub async fn message_types<F, Fut>(
        &self,
        standard: &str,
        version: &str,
        loader: F,
    ) -> Result<Arc<Vec<String>>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<String>>>,
    {
        self.message_types
            .try_get_with((standard.to_string(), version.to_string()), async move {
                let mut list = loader().await?;
                list.insert(0, AUTO_DETECT.to_string());
                Ok(Arc::new(list))
            })
            .await
            .map_err(unwrap_shared)
    }
}

/// moka shares a loader failure among concurrent waiters as `Arc<E>`;
/// flatten it back into a plain error.
fn unwrap_shared(e: Arc<ClientError>) -> ClientError {
    ClientError::Cache(e.to_string())
}
