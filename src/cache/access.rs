//! Read-through access to upstream resources with single-flight fills.

use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use futures::future::{BoxFuture, FutureExt};
use metrics::{counter, histogram};
use tracing::{debug, warn};

use super::config::CacheConfig;
use super::error::CacheError;
use super::flight::{FillGuard, FillOutcome, Flight, InFlightFills};
use super::origin::Origin;
use super::resource::Resource;
use super::store::CacheStore;

const METRIC_CACHE_HIT: &str = "quietfeed_cache_hit_total";
const METRIC_CACHE_MISS: &str = "quietfeed_cache_miss_total";
const METRIC_CACHE_JOINED: &str = "quietfeed_cache_joined_total";
const METRIC_ORIGIN_FETCH: &str = "quietfeed_origin_fetch_total";
const METRIC_ORIGIN_ERROR: &str = "quietfeed_origin_error_total";
const METRIC_ORIGIN_FETCH_MS: &str = "quietfeed_origin_fetch_ms";

/// Cache-access component shared by every request handler.
///
/// A miss starts one fill per key: the fill is spawned on the runtime, so a
/// caller that stops waiting does not cancel it, and every concurrent caller
/// for the same key receives its outcome. Errors from the origin are handed
/// back unchanged and are never stored. A failing store degrades to uncached
/// pass-through.
pub struct AccessCache {
    store: Arc<dyn CacheStore>,
    origin: Arc<dyn Origin>,
    config: CacheConfig,
    fills: InFlightFills,
}

impl AccessCache {
    pub fn new(store: Arc<dyn CacheStore>, origin: Arc<dyn Origin>, config: CacheConfig) -> Self {
        Self {
            store,
            origin,
            config,
            fills: InFlightFills::new(),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Number of keys with a fill currently running.
    pub fn in_flight(&self) -> usize {
        self.fills.len()
    }

    /// Return the aggregate for `resource`, fetching it on a miss.
    ///
    /// `Ok(None)` means the upstream response held nothing to parse; such
    /// results are not cached.
    pub async fn get<R: Resource>(&self, resource: &R) -> Result<Option<R::Output>, CacheError> {
        let key = resource.key();
        let kind = resource.kind();

        if let Some(payload) = lookup(self.store.as_ref(), kind, &key).await {
            counter!(METRIC_CACHE_HIT, "resource" => kind).increment(1);
            debug!(cache = kind, outcome = "hit", key = %key, "serving cached aggregate");
            return resource.decode_cached(&payload).map(Some);
        }

        let flight = self.fills.join_or_start(&key, |guard| {
            self.start_fill(resource.clone(), key.clone(), guard)
        });
        let fill = match flight {
            Flight::Started(fill) => {
                counter!(METRIC_CACHE_MISS, "resource" => kind).increment(1);
                debug!(cache = kind, outcome = "miss", key = %key, "fetching from origin");
                fill
            }
            Flight::Joined(fill) => {
                counter!(METRIC_CACHE_JOINED, "resource" => kind).increment(1);
                debug!(cache = kind, outcome = "joined", key = %key, "waiting on in-flight fetch");
                fill
            }
        };

        match fill.await? {
            Some(payload) => resource.decode_cached(&payload).map(Some),
            None => Ok(None),
        }
    }

    fn start_fill<R: Resource>(
        &self,
        resource: R,
        key: String,
        guard: FillGuard,
    ) -> BoxFuture<'static, FillOutcome> {
        let store = Arc::clone(&self.store);
        let origin = Arc::clone(&self.origin);
        let ttl = resource.ttl(&self.config);
        let kind = resource.kind();

        let task = tokio::spawn(async move {
            let outcome = fill(&resource, &key, store.as_ref(), origin.as_ref(), ttl).await;
            drop(guard);
            outcome
        });

        async move {
            task.await.unwrap_or_else(|err| {
                warn!(
                    op = "cache.fill",
                    cache = kind,
                    error = %err,
                    "shared fetch task did not complete"
                );
                Err(CacheError::Aborted)
            })
        }
        .boxed()
    }
}

/// Fetch, parse and store one resource; the body of a shared fill.
async fn fill<R: Resource>(
    resource: &R,
    key: &str,
    store: &dyn CacheStore,
    origin: &dyn Origin,
    ttl: Duration,
) -> FillOutcome {
    let kind = resource.kind();

    // A fill that finished between the caller's lookup and registration.
    if let Some(payload) = lookup(store, kind, key).await {
        debug!(cache = kind, outcome = "hit", key, stage = "recheck", "filled concurrently");
        return Ok(Some(payload));
    }

    counter!(METRIC_ORIGIN_FETCH, "resource" => kind).increment(1);
    let started_at = Instant::now();
    let fetched = resource.fetch(origin).await;
    histogram!(METRIC_ORIGIN_FETCH_MS, "resource" => kind)
        .record(started_at.elapsed().as_secs_f64() * 1000.0);

    let raw = match fetched {
        Ok(raw) => raw,
        Err(err) => {
            counter!(METRIC_ORIGIN_ERROR, "resource" => kind).increment(1);
            debug!(cache = kind, key, error = %err, "origin fetch failed");
            return Err(err.into());
        }
    };

    let Some(aggregate) = resource.parse(&raw) else {
        debug!(cache = kind, outcome = "absent", key, "response held nothing to cache");
        return Ok(None);
    };

    let payload = Bytes::from(resource.encode(&aggregate)?);
    match store.set(key, payload.clone(), ttl).await {
        Ok(()) => debug!(cache = kind, key, ttl_secs = ttl.as_secs(), "stored aggregate"),
        Err(err) => warn!(
            op = "cache.store.set",
            result = "store_write_error",
            cache = kind,
            key,
            error = %err,
            "serving uncached aggregate"
        ),
    }

    Ok(Some(payload))
}

/// Store lookup where an unavailable store reads as a miss.
async fn lookup(store: &dyn CacheStore, kind: &'static str, key: &str) -> Option<Bytes> {
    store.get(key).await.unwrap_or_else(|err| {
        warn!(
            op = "cache.store.get",
            result = "store_read_error",
            cache = kind,
            key,
            error = %err,
            "treating lookup as a miss"
        );
        None
    })
}
