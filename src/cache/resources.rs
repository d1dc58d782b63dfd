//! The cached blog resources and their convenience accessors.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::pagination::Cursor;
use crate::domain::timelines::{BlogTimeline, Timeline};
use crate::extract::{parse_blog_timeline, parse_timeline};

use super::access::AccessCache;
use super::config::CacheConfig;
use super::error::{CacheError, OriginError};
use super::keys::KeyBuilder;
use super::origin::{BlogPostFilters, Origin};
use super::resource::Resource;

/// One page of a blog's feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogPosts {
    pub blog: String,
    pub continuation: Option<Cursor>,
    pub filters: BlogPostFilters,
}

#[async_trait]
impl Resource for BlogPosts {
    type Output = BlogTimeline;

    fn kind(&self) -> &'static str {
        "blog_posts"
    }

    fn key(&self) -> String {
        KeyBuilder::new("blog")
            .segment(&self.blog)
            .param("before_id", &self.filters.before_id)
            .param("tag", &self.filters.tag)
            .param("continuation", &self.continuation)
            .build()
    }

    fn ttl(&self, config: &CacheConfig) -> Duration {
        config.blog_feed_ttl
    }

    async fn fetch(&self, origin: &dyn Origin) -> Result<Value, OriginError> {
        origin
            .blog_posts(&self.blog, self.continuation.as_ref(), &self.filters)
            .await
    }

    fn parse(&self, raw: &Value) -> Option<BlogTimeline> {
        parse_blog_timeline(raw, false)
    }
}

/// A single post of a blog, delivered as a timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogPost {
    pub blog: String,
    pub post_id: String,
}

#[async_trait]
impl Resource for BlogPost {
    type Output = Timeline;

    fn kind(&self) -> &'static str {
        "blog_post"
    }

    fn key(&self) -> String {
        KeyBuilder::new("blog")
            .segment(&self.blog)
            .segment("post")
            .segment(&self.post_id)
            .build()
    }

    fn ttl(&self, config: &CacheConfig) -> Duration {
        config.blog_post_ttl
    }

    async fn fetch(&self, origin: &dyn Origin) -> Result<Value, OriginError> {
        origin.blog_post(&self.blog, &self.post_id).await
    }

    fn parse(&self, raw: &Value) -> Option<Timeline> {
        parse_timeline(raw)
    }
}

/// One page of search results within a blog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogSearch {
    pub blog: String,
    pub query: String,
    pub continuation: Option<Cursor>,
}

#[async_trait]
impl Resource for BlogSearch {
    type Output = BlogTimeline;

    fn kind(&self) -> &'static str {
        "blog_search"
    }

    fn key(&self) -> String {
        KeyBuilder::new("blog")
            .segment(&self.blog)
            .segment("search")
            .segment(&self.query)
            .param("continuation", &self.continuation)
            .build()
    }

    fn ttl(&self, config: &CacheConfig) -> Duration {
        config.blog_feed_ttl
    }

    async fn fetch(&self, origin: &dyn Origin) -> Result<Value, OriginError> {
        origin
            .blog_search(&self.blog, &self.query, self.continuation.as_ref())
            .await
    }

    fn parse(&self, raw: &Value) -> Option<BlogTimeline> {
        parse_blog_timeline(raw, true)
    }
}

pub async fn get_blog_posts(
    cache: &AccessCache,
    blog: &str,
    continuation: Option<Cursor>,
    filters: BlogPostFilters,
) -> Result<Option<BlogTimeline>, CacheError> {
    let resource = BlogPosts {
        blog: blog.to_string(),
        continuation,
        filters,
    };
    cache.get(&resource).await
}

pub async fn get_blog_post(
    cache: &AccessCache,
    blog: &str,
    post_id: &str,
) -> Result<Option<Timeline>, CacheError> {
    let resource = BlogPost {
        blog: blog.to_string(),
        post_id: post_id.to_string(),
    };
    cache.get(&resource).await
}

pub async fn get_blog_search_results(
    cache: &AccessCache,
    blog: &str,
    query: &str,
    continuation: Option<Cursor>,
) -> Result<Option<BlogTimeline>, CacheError> {
    let resource = BlogSearch {
        blog: blog.to_string(),
        query: query.to_string(),
        continuation,
    };
    cache.get(&resource).await
}
