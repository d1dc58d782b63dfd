//! The upstream content API, as seen by the cache layer.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::pagination::Cursor;

use super::error::OriginError;

/// Optional filters narrowing a blog feed request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogPostFilters {
    /// Only posts published before this post id.
    pub before_id: Option<String>,
    /// Only posts carrying this tag.
    pub tag: Option<String>,
}

/// Supplier of raw upstream responses.
///
/// Implementations surface not-found, login-required and restricted-content
/// conditions as [`OriginError::Upstream`]; everything else that keeps a
/// response from arriving is [`OriginError::Transport`].
#[async_trait]
pub trait Origin: Send + Sync {
    async fn blog_posts(
        &self,
        blog: &str,
        continuation: Option<&Cursor>,
        filters: &BlogPostFilters,
    ) -> Result<Value, OriginError>;

    async fn blog_post(&self, blog: &str, post_id: &str) -> Result<Value, OriginError>;

    async fn blog_search(
        &self,
        blog: &str,
        query: &str,
        continuation: Option<&Cursor>,
    ) -> Result<Value, OriginError>;
}
