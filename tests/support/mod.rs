#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use quietfeed::cache::{
    AccessCache, BlogPostFilters, CacheConfig, CacheStore, MemoryStore, Origin, OriginError,
    StoreError,
};
use quietfeed::domain::Cursor;
use serde_json::{Value, json};

pub const BASE_TIMESTAMP: i64 = 1_700_000_000;

pub fn blog_json(name: &str) -> Value {
    json!({
        "name": name,
        "title": format!("{name} title"),
        "url": format!("https://{name}.example/"),
        "avatar": [{"url": format!("https://media.example/{name}/64.png"), "width": 64, "height": 64}]
    })
}

/// A text post as it appears in timelines and blog feeds.
pub fn text_post(id: &str, offset_secs: i64) -> Value {
    json!({
        "objectType": "post",
        "id": id,
        "timestamp": BASE_TIMESTAMP + offset_secs,
        "blog": blog_json("staff"),
        "content": [{"type": "text", "text": format!("post {id}")}],
        "layout": [],
        "tags": ["news"],
        "noteCount": 3
    })
}

/// A post element missing the fields every post needs.
pub fn malformed_post() -> Value {
    json!({"objectType": "post", "content": [{"type": "text", "text": "orphan"}]})
}

pub fn blog_feed(posts: Vec<Value>) -> Value {
    json!({
        "blog": blog_json("staff"),
        "posts": posts,
        "totalPosts": 40,
        "links": {"next": {"queryParams": {"pageNumber": "2", "timelineType": "blog"}}}
    })
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    BlogPosts {
        blog: String,
        continuation: Option<Cursor>,
        filters: BlogPostFilters,
    },
    BlogPost {
        blog: String,
        post_id: String,
    },
    BlogSearch {
        blog: String,
        query: String,
        continuation: Option<Cursor>,
    },
}

/// Origin answering every request with one scripted outcome.
pub struct ScriptedOrigin {
    response: Mutex<Result<Value, OriginError>>,
    delay: Duration,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedOrigin {
    pub fn responding(response: Value) -> Self {
        Self {
            response: Mutex::new(Ok(response)),
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(err: OriginError) -> Self {
        Self {
            response: Mutex::new(Err(err)),
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn set_response(&self, response: Result<Value, OriginError>) {
        *self.response.lock().expect("response lock") = response;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("calls lock").len()
    }

    async fn respond(&self, call: Call) -> Result<Value, OriginError> {
        self.calls.lock().expect("calls lock").push(call);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.response.lock().expect("response lock").clone()
    }
}

#[async_trait]
impl Origin for ScriptedOrigin {
    async fn blog_posts(
        &self,
        blog: &str,
        continuation: Option<&Cursor>,
        filters: &BlogPostFilters,
    ) -> Result<Value, OriginError> {
        self.respond(Call::BlogPosts {
            blog: blog.to_string(),
            continuation: continuation.cloned(),
            filters: filters.clone(),
        })
        .await
    }

    async fn blog_post(&self, blog: &str, post_id: &str) -> Result<Value, OriginError> {
        self.respond(Call::BlogPost {
            blog: blog.to_string(),
            post_id: post_id.to_string(),
        })
        .await
    }

    async fn blog_search(
        &self,
        blog: &str,
        query: &str,
        continuation: Option<&Cursor>,
    ) -> Result<Value, OriginError> {
        self.respond(Call::BlogSearch {
            blog: blog.to_string(),
            query: query.to_string(),
            continuation: continuation.cloned(),
        })
        .await
    }
}

pub fn access_cache(origin: Arc<ScriptedOrigin>, config: CacheConfig) -> AccessCache {
    let store = Arc::new(MemoryStore::new(&config));
    AccessCache::new(store, origin, config)
}

/// Store backend that is down: every lookup and write fails.
pub struct UnavailableStore;

#[async_trait]
impl CacheStore for UnavailableStore {
    async fn get(&self, _key: &str) -> Result<Option<Bytes>, StoreError> {
        Err(StoreError::unavailable("store offline"))
    }

    async fn set(&self, _key: &str, _payload: Bytes, _ttl: Duration) -> Result<(), StoreError> {
        Err(StoreError::unavailable("store offline"))
    }
}
