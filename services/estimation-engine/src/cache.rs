//! Extraction Result Cache
//!
//! Scored analyses keyed by document content hash, stored through a
//! [`KeyValueStore`] with a TTL. At most one computation runs per key: late
//! callers join the in-flight future instead of starting their own, and the
//! map lock is never held across the computation.

use futures::future::{BoxFuture, FutureExt, Shared};
use lumber_database::KeyValueStore;
use lumber_models::{AnalysisResult, CacheEntry};
use lumber_utils::{log_warn, EstimatorError, EstimatorResult};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, UNIX_EPOCH};
use tokio_util::sync::CancellationToken;

pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

type SharedAnalysis = Shared<BoxFuture<'static, EstimatorResult<Arc<AnalysisResult>>>>;

struct InFlight {
    id: u64,
    future: SharedAnalysis,
}

/// Counters since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub computations: u64,
    pub joins: u64,
    pub stores: u64,
    pub corrupt_entries: u64,
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    computations: AtomicU64,
    joins: AtomicU64,
    stores: AtomicU64,
    corrupt_entries: AtomicU64,
}

pub struct ExtractionResultCache {
    store: Arc<dyn KeyValueStore>,
    ttl: Duration,
    in_flight: Mutex<HashMap<String, InFlight>>,
    next_id: AtomicU64,
    counters: Arc<Counters>,
}

impl ExtractionResultCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            ttl: DEFAULT_TTL,
            in_flight: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            computations: self.counters.computations.load(Ordering::Relaxed),
            joins: self.counters.joins.load(Ordering::Relaxed),
            stores: self.counters.stores.load(Ordering::Relaxed),
            corrupt_entries: self.counters.corrupt_entries.load(Ordering::Relaxed),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, InFlight>> {
        self.in_flight.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Fresh cached analysis for `key`, without computing.
    pub async fn get(&self, key: &str) -> Option<Arc<AnalysisResult>> {
        read_fresh(self.store.as_ref(), key, self.ttl, &self.counters).await
    }

    pub async fn get_or_compute<F, Fut>(&self, key: &str, compute: F) -> EstimatorResult<Arc<AnalysisResult>>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = EstimatorResult<AnalysisResult>> + Send + 'static,
    {
        self.get_or_compute_with_cancel(key, &CancellationToken::new(), compute)
            .await
    }

    /// Like [`get_or_compute`](Self::get_or_compute), but the caller stops
    /// waiting when `cancel` fires. The computation itself is abandoned only
    /// when no other caller is waiting on it.
    pub async fn get_or_compute_with_cancel<F, Fut>(
        &self,
        key: &str,
        cancel: &CancellationToken,
        compute: F,
    ) -> EstimatorResult<Arc<AnalysisResult>>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = EstimatorResult<AnalysisResult>> + Send + 'static,
    {
        if let Some(hit) = self.get(key).await {
            self.counters.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(key = %key, "Cache hit");
            return Ok(hit);
        }

        let (id, future) = {
            let mut in_flight = self.lock();
            match in_flight.get(key) {
                Some(entry) => {
                    self.counters.joins.fetch_add(1, Ordering::Relaxed);
                    tracing::debug!(key = %key, "Joining in-flight computation");
                    (entry.id, entry.future.clone())
                }
                None => {
                    let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                    let future = compute_and_store(
                        Arc::clone(&self.store),
                        key.to_string(),
                        self.ttl,
                        Arc::clone(&self.counters),
                        compute,
                    )
                    .boxed()
                    .shared();
                    in_flight.insert(
                        key.to_string(),
                        InFlight {
                            id,
                            future: future.clone(),
                        },
                    );
                    (id, future)
                }
            }
        };

        let outcome = tokio::select! {
            _ = cancel.cancelled() => None,
            result = future.clone() => Some(result),
        };
        drop(future);

        let mut in_flight = self.lock();
        let ours = in_flight.get(key).map_or(false, |entry| entry.id == id);
        match outcome {
            Some(result) => {
                if ours {
                    in_flight.remove(key);
                }
                result
            }
            None => {
                // Only the map still holds the future: nobody is waiting on it.
                let abandoned = in_flight
                    .get(key)
                    .filter(|_| ours)
                    .map_or(false, |entry| entry.future.strong_count().map_or(true, |n| n <= 1));
                if abandoned {
                    in_flight.remove(key);
                    tracing::info!(key = %key, "Abandoned computation after cancellation");
                }
                Err(EstimatorError::Cancelled)
            }
        }
    }

    pub async fn invalidate(&self, key: &str) -> EstimatorResult<()> {
        self.store
            .delete(key)
            .await
            .map_err(|e| EstimatorError::cache_store(format!("{:#}", e)))
    }

    pub async fn clear(&self) -> EstimatorResult<usize> {
        let removed = self
            .store
            .clear()
            .await
            .map_err(|e| EstimatorError::cache_store(format!("{:#}", e)))?;
        tracing::info!(removed, backend = self.store.backend_name(), "Cache cleared");
        Ok(removed)
    }

    pub fn in_flight_count(&self) -> usize {
        self.lock().len()
    }
}

/// Fresh entry for `key`. Unreadable, corrupt and expired entries are misses;
/// corrupt and expired ones are deleted.
async fn read_fresh(
    store: &dyn KeyValueStore,
    key: &str,
    ttl: Duration,
    counters: &Counters,
) -> Option<Arc<AnalysisResult>> {
    let raw = match store.get(key).await {
        Ok(raw) => raw?,
        Err(e) => {
            log_warn!(format!("{:#}", e), "Cache read failed, treating as miss", key = %key);
            return None;
        }
    };

    let entry = match serde_json::from_str::<CacheEntry>(&raw) {
        Ok(entry) if entry.key == key => entry,
        Ok(entry) => {
            let mismatch = format!("entry belongs to key {}", entry.key);
            discard_corrupt(store, EstimatorError::cache_corruption(key, mismatch), counters).await;
            return None;
        }
        Err(e) => {
            discard_corrupt(store, EstimatorError::cache_corruption(key, e.to_string()), counters).await;
            return None;
        }
    };

    let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::hours(24));
    if !entry.is_fresh(ttl, chrono::Utc::now()) {
        tracing::debug!(key = %key, "Cache entry expired");
        if let Err(e) = store.delete(key).await {
            log_warn!(format!("{:#}", e), "Failed to delete expired cache entry", key = %key);
        }
        return None;
    }

    Some(Arc::new(entry.analysis))
}

async fn discard_corrupt(store: &dyn KeyValueStore, error: EstimatorError, counters: &Counters) {
    counters.corrupt_entries.fetch_add(1, Ordering::Relaxed);
    log_warn!(error, "Discarding corrupt cache entry");
    if let EstimatorError::CacheCorruption { key, .. } = &error {
        if let Err(e) = store.delete(key).await {
            log_warn!(format!("{:#}", e), "Failed to delete corrupt cache entry", key = %key);
        }
    }
}

/// Body of the shared in-flight future. Only successful results are stored.
async fn compute_and_store<F, Fut>(
    store: Arc<dyn KeyValueStore>,
    key: String,
    ttl: Duration,
    counters: Arc<Counters>,
    compute: F,
) -> EstimatorResult<Arc<AnalysisResult>>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = EstimatorResult<AnalysisResult>> + Send + 'static,
{
    // A previous computation may have finished between our miss and insert.
    if let Some(hit) = read_fresh(store.as_ref(), &key, ttl, &counters).await {
        counters.hits.fetch_add(1, Ordering::Relaxed);
        return Ok(hit);
    }

    counters.computations.fetch_add(1, Ordering::Relaxed);
    tracing::debug!(key = %key, "Cache miss, computing");
    let entry = CacheEntry::new(key.clone(), compute().await?);

    match serde_json::to_string(&entry) {
        Ok(json) => match store.put(&key, json, ttl).await {
            Ok(()) => {
                counters.stores.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(key = %key, ttl_secs = ttl.as_secs(), "Stored analysis");
            }
            Err(e) => log_warn!(format!("{:#}", e), "Failed to store analysis", key = %key),
        },
        Err(e) => log_warn!(e, "Failed to serialize analysis", key = %key),
    }

    Ok(Arc::new(entry.analysis))
}

/// SHA-256 hex digest of the document bytes.
pub fn document_hash(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Content hash of a file, falling back to `mtime-<unix seconds>` when the
/// file cannot be read.
pub async fn document_hash_from_path(path: &Path) -> EstimatorResult<String> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(document_hash(&bytes)),
        Err(read_error) => {
            tracing::warn!(path = %path.display(), error = %read_error, "Hashing by modification time");
            let modified = tokio::fs::metadata(path)
                .await
                .and_then(|metadata| metadata.modified())
                .map_err(|e| {
                    EstimatorError::validation("document", format!("{}: {}", path.display(), e))
                })?;
            let seconds = modified
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0);
            Ok(format!("mtime-{}", seconds))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogStore;
    use crate::estimator::{derive_area_spec, QuantityEstimator};
    use crate::scorer::AccuracyScorer;
    use lumber_database::MemoryStore;
    use lumber_utils::validate_document_hash;
    use std::sync::atomic::AtomicUsize;

    fn analysis(name: &str) -> AnalysisResult {
        let estimator = QuantityEstimator::new(Arc::new(CatalogStore::with_seed()));
        let estimate = estimator.estimate_project(name, &derive_area_spec(20.0, 12.0, 8.0).unwrap());
        let metrics = AccuracyScorer::default().score(&estimate);
        AnalysisResult { estimate, metrics }
    }

    fn cache() -> (Arc<MemoryStore>, ExtractionResultCache) {
        let store = Arc::new(MemoryStore::new(16));
        let cache = ExtractionResultCache::new(store.clone());
        (store, cache)
    }

    #[tokio::test]
    async fn test_second_call_is_a_hit() {
        let (_, cache) = cache();
        let calls = Arc::new(AtomicUsize::new(0));

        let mut results = Vec::new();
        for _ in 0..2 {
            let calls = calls.clone();
            let result = cache
                .get_or_compute("abc", move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(analysis("Hit"))
                })
                .await
                .unwrap();
            results.push(result);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*results[0], *results[1]);
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().stores, 1);
        assert_eq!(cache.in_flight_count(), 0);
    }

    #[tokio::test]
    async fn test_failures_are_not_stored() {
        let (store, cache) = cache();

        let err = cache
            .get_or_compute("k", || async { Err(EstimatorError::ExtractionTimeout { seconds: 1 }) })
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "EXTRACTION_TIMEOUT");
        assert!(store.is_empty());

        let ok = cache.get_or_compute("k", || async { Ok(analysis("Retry")) }).await;
        assert!(ok.is_ok());
        assert_eq!(cache.stats().computations, 2);
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_recomputed() {
        let (store, cache) = cache();
        store.put("k", "{not json".to_string(), DEFAULT_TTL).await.unwrap();

        let result = cache.get_or_compute("k", || async { Ok(analysis("Fresh")) }).await.unwrap();
        assert_eq!(result.estimate.project_name, "Fresh");
        assert_eq!(cache.stats().corrupt_entries, 1);
        assert!(cache.get("k").await.is_some());
    }

    #[tokio::test]
    async fn test_expired_entry_is_recomputed() {
        let (store, cache) = cache();
        let mut stale = CacheEntry::new("k", analysis("Stale"));
        stale.cached_at = stale.cached_at - chrono::Duration::hours(25);
        store
            .put("k", serde_json::to_string(&stale).unwrap(), DEFAULT_TTL)
            .await
            .unwrap();

        let result = cache.get_or_compute("k", || async { Ok(analysis("New")) }).await.unwrap();
        assert_eq!(result.estimate.project_name, "New");
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_computation() {
        let (_, cache) = cache();
        let cache = Arc::new(cache);
        let calls = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                let calls = calls.clone();
                tokio::spawn(async move {
                    cache
                        .get_or_compute("same", move || async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(50)).await;
                            Ok(analysis("Shared"))
                        })
                        .await
                })
            })
            .collect();

        let mut results = Vec::new();
        for task in tasks {
            results.push(task.await.unwrap().unwrap());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(results.iter().all(|r| **r == *results[0]));
        assert_eq!(cache.in_flight_count(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_sole_caller_abandons_computation() {
        let (store, cache) = cache();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = cache
            .get_or_compute_with_cancel("k", &cancel, || async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(analysis("Never"))
            })
            .await
            .unwrap_err();

        assert!(matches!(err, EstimatorError::Cancelled));
        assert_eq!(cache.in_flight_count(), 0);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_invalidate_and_clear() {
        let (store, cache) = cache();
        cache.get_or_compute("a", || async { Ok(analysis("A")) }).await.unwrap();
        cache.get_or_compute("b", || async { Ok(analysis("B")) }).await.unwrap();

        cache.invalidate("a").await.unwrap();
        assert!(cache.get("a").await.is_none());
        assert_eq!(cache.clear().await.unwrap(), 1);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_document_hashing() {
        let digest = document_hash(b"floor plan");
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, document_hash(b"floor plan"));
        assert_ne!(digest, document_hash(b"floor plan v2"));
        assert!(validate_document_hash(&digest).is_ok());

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plan.pdf");
        std::fs::write(&file, b"floor plan").unwrap();
        assert_eq!(document_hash_from_path(&file).await.unwrap(), digest);

        // A directory cannot be read as bytes, but it has a modification time.
        let fallback = document_hash_from_path(dir.path()).await.unwrap();
        assert!(fallback.starts_with("mtime-"));
        assert!(validate_document_hash(&fallback).is_ok());

        assert!(document_hash_from_path(&dir.path().join("missing.pdf")).await.is_err());
    }
}
