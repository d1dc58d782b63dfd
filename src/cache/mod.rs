//! Cache-access layer for upstream blog resources.
//!
//! Each [`Resource`] describes one request kind: its key, TTL, origin call and
//! parser. [`AccessCache`] serves stored aggregates from a [`CacheStore`] and,
//! on a miss, runs a single fill per key no matter how many callers ask for it
//! at once.
//!
//! ## Configuration
//!
//! Lifetimes and store capacity come from the `[cache]` section:
//!
//! ```toml
//! [cache]
//! blog_feed_ttl_seconds = 3600
//! blog_post_ttl_seconds = 3600
//! store_capacity = 1000
//! ```

mod access;
mod config;
mod error;
mod flight;
mod keys;
mod lock;
mod origin;
mod resource;
mod resources;
mod store;

pub use access::AccessCache;
pub use config::CacheConfig;
pub use error::{CacheError, OriginError, StoreError};
pub use keys::{KeyBuilder, KeyParam};
pub use origin::{BlogPostFilters, Origin};
pub use resource::Resource;
pub use resources::{
    BlogPost, BlogPosts, BlogSearch, get_blog_post, get_blog_posts, get_blog_search_results,
};
pub use store::{CacheStore, MemoryStore};
