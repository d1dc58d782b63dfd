use thiserror::Error;

/// Errors the upstream API reports about the requested resource itself.
///
/// Raised by origin implementations and handed back to callers untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    #[error("blog `{blog}` not found")]
    BlogNotFound { blog: String },
    #[error("login required to view `{resource}`")]
    LoginRequired { resource: String },
    #[error("content restricted under `{tag}`")]
    RestrictedContent { tag: String },
}

impl UpstreamError {
    pub fn blog_not_found(blog: impl Into<String>) -> Self {
        Self::BlogNotFound { blog: blog.into() }
    }

    pub fn login_required(resource: impl Into<String>) -> Self {
        Self::LoginRequired {
            resource: resource.into(),
        }
    }

    pub fn restricted_content(tag: impl Into<String>) -> Self {
        Self::RestrictedContent { tag: tag.into() }
    }
}
