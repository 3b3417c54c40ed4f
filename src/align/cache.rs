//! Report caching in front of an [`Aligner`].
//!
//! Paging through a sequence search re-runs the same query; alignment is by far
//! the most expensive step, so reports are kept in an LRU cache keyed by the
//! (uppercased) sequence. Concurrent requests for the same sequence share a
//! single in-flight run.

use super::{Aligner, AlignmentReport};
use crate::error::Result;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use lru::LruCache;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Type alias for shared alignment futures.
type SharedAlignment = Shared<BoxFuture<'static, std::result::Result<Arc<AlignmentReport>, String>>>;

pub struct CachedAligner<A> {
    inner: Arc<A>,

    /// LRU cache of completed reports
    cache: Mutex<LruCache<String, Arc<AlignmentReport>>>,

    /// In-flight runs (can be awaited by multiple callers)
    in_flight: Mutex<HashMap<String, SharedAlignment>>,
}

impl<A> std::fmt::Debug for CachedAligner<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedAligner")
            .field("cache_size", &self.cache.try_lock().map(|c| c.len()).ok())
            .field("in_flight_count", &self.in_flight.try_lock().map(|m| m.len()).ok())
            .finish_non_exhaustive()
    }
}

impl<A: Aligner> CachedAligner<A> {
    pub fn new(inner: A, capacity: NonZeroUsize) -> Self {
        Self {
            inner: Arc::new(inner),
            cache: Mutex::new(LruCache::new(capacity)),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Check if a report is cached for a sequence.
    pub async fn is_cached(&self, sequence: &str) -> bool {
        self.cache.lock().await.contains(sequence)
    }

    /// Get the report for a sequence, waiting for an in-flight run if needed.
    ///
    /// 1. Checks the LRU cache
    /// 2. Checks for an in-flight run (awaits if found)
    /// 3. Starts a new run otherwise
    ///
    /// Failed runs are not cached.
    pub async fn report(&self, sequence: &str) -> Result<Arc<AlignmentReport>> {
        if let Some(report) = self.cache.lock().await.get(sequence) {
            tracing::debug!("Alignment cache hit");
            return Ok(report.clone());
        }

        let shared = {
            let mut in_flight = self.in_flight.lock().await;
            if let Some(future) = in_flight.get(sequence) {
                tracing::debug!("Awaiting in-flight alignment");
                future.clone()
            } else {
                let inner = self.inner.clone();
                let owned = sequence.to_string();
                let future: BoxFuture<'static, std::result::Result<Arc<AlignmentReport>, String>> =
                    Box::pin(async move {
                        inner
                            .align(&owned)
                            .await
                            .map(Arc::new)
                            .map_err(|e| format!("{:#}", e))
                    });
                let future = future.shared();
                in_flight.insert(sequence.to_string(), future.clone());
                future
            }
        };

        let result = shared.await;

        // Cache before leaving in-flight so a late caller always finds one of them
        if let Ok(report) = &result {
            self.cache
                .lock()
                .await
                .put(sequence.to_string(), report.clone());
        }
        self.in_flight.lock().await.remove(sequence);

        result.map_err(|message| anyhow::anyhow!(message))
    }
}

impl<A: Aligner> Aligner for CachedAligner<A> {
    async fn align(&self, sequence: &str) -> Result<AlignmentReport> {
        Ok(self.report(sequence).await?.as_ref().clone())
    }
}
