//! Cache configuration derived from [`CacheSettings`](crate::config::CacheSettings).

use std::num::NonZeroUsize;
use std::time::Duration;

const DEFAULT_BLOG_FEED_TTL: Duration = Duration::from_secs(3600);
const DEFAULT_BLOG_POST_TTL: Duration = Duration::from_secs(3600);
const DEFAULT_STORE_CAPACITY: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Lifetime of blog feed and blog search pages.
    pub blog_feed_ttl: Duration,
    /// Lifetime of single-post lookups.
    pub blog_post_ttl: Duration,
    /// Maximum entries held by [`MemoryStore`](super::MemoryStore).
    pub store_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            blog_feed_ttl: DEFAULT_BLOG_FEED_TTL,
            blog_post_ttl: DEFAULT_BLOG_POST_TTL,
            store_capacity: DEFAULT_STORE_CAPACITY,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            blog_feed_ttl: Duration::from_secs(settings.blog_feed_ttl_seconds.get()),
            blog_post_ttl: Duration::from_secs(settings.blog_post_ttl_seconds.get()),
            store_capacity: settings.store_capacity,
        }
    }
}

impl CacheConfig {
    /// Returns the store capacity as NonZeroUsize, clamping to 1 if zero.
    pub fn store_capacity_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.store_capacity).unwrap_or(NonZeroUsize::MIN)
    }
}
