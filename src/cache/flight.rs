//! Registry of cache fills currently in flight, one per key.

use std::sync::Arc;

use bytes::Bytes;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::future::{BoxFuture, FutureExt, Shared};

use super::error::CacheError;

/// Serialized aggregate, or `None` when the response parsed to nothing.
pub(crate) type FillOutcome = Result<Option<Bytes>, CacheError>;

pub(crate) type SharedFill = Shared<BoxFuture<'static, FillOutcome>>;

pub(crate) enum Flight {
    /// This caller registered the fill.
    Started(SharedFill),
    /// A fill for the key was already running.
    Joined(SharedFill),
}

#[derive(Default, Clone)]
pub(crate) struct InFlightFills {
    fills: Arc<DashMap<String, SharedFill>>,
}

impl InFlightFills {
    pub(crate) fn new() -> Self {
        Self {
            fills: Arc::new(DashMap::new()),
        }
    }

    /// Join the fill running for `key`, or register the one built by `start`.
    ///
    /// `start` receives the guard that unregisters the key; the fill must drop
    /// it once its outcome is final.
    pub(crate) fn join_or_start<F>(&self, key: &str, start: F) -> Flight
    where
        F: FnOnce(FillGuard) -> BoxFuture<'static, FillOutcome>,
    {
        match self.fills.entry(key.to_string()) {
            Entry::Occupied(occupied) => Flight::Joined(occupied.get().clone()),
            Entry::Vacant(vacant) => {
                let guard = FillGuard {
                    key: key.to_string(),
                    fills: Arc::clone(&self.fills),
                };
                let fill = start(guard).shared();
                vacant.insert(fill.clone());
                Flight::Started(fill)
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.fills.len()
    }
}

pub(crate) struct FillGuard {
    key: String,
    fills: Arc<DashMap<String, SharedFill>>,
}

impl Drop for FillGuard {
    fn drop(&mut self) {
        self.fills.remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[tokio::test]
    async fn second_caller_joins_the_running_fill() {
        let fills = InFlightFills::new();
        let parked = Arc::new(Mutex::new(None));

        let slot = Arc::clone(&parked);
        let first = fills.join_or_start("blog:staff", move |guard| {
            *slot.lock().expect("slot") = Some(guard);
            async { Ok(Some(Bytes::from_static(b"{}"))) }.boxed()
        });
        let second = fills.join_or_start("blog:staff", |_guard| {
            unreachable!("a second fill must not start")
        });

        assert!(matches!(first, Flight::Started(_)));
        let Flight::Joined(joined) = second else {
            panic!("expected to join the running fill");
        };
        assert_eq!(fills.len(), 1);
        assert_eq!(
            joined.await.expect("outcome"),
            Some(Bytes::from_static(b"{}"))
        );

        drop(parked.lock().expect("slot").take());
        assert_eq!(fills.len(), 0);
    }

    #[tokio::test]
    async fn distinct_keys_do_not_share_fills() {
        let fills = InFlightFills::new();
        let mut guards = Vec::new();

        for key in ["blog:a", "blog:b"] {
            let flight = fills.join_or_start(key, |guard| {
                guards.push(guard);
                async { Ok(None) }.boxed()
            });
            assert!(matches!(flight, Flight::Started(_)));
        }

        assert_eq!(fills.len(), 2);
        guards.clear();
        assert_eq!(fills.len(), 0);
    }
}
