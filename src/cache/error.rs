use thiserror::Error;

use crate::domain::error::UpstreamError;

/// Failure of an origin fetch.
///
/// Cloneable so one in-flight outcome can be handed to every waiter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OriginError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error("origin transport error: {message}")]
    Transport { message: String },
}

impl OriginError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}

/// Failure reported by a cache store backend.
///
/// Logged by the access layer, never returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("cache store unavailable: {message}")]
    Unavailable { message: String },
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    #[error(transparent)]
    Origin(#[from] OriginError),
    #[error("cached payload codec error: {message}")]
    Codec { message: String },
    #[error("shared fetch task aborted")]
    Aborted,
}

impl CacheError {
    pub fn codec(message: impl Into<String>) -> Self {
        Self::Codec {
            message: message.into(),
        }
    }

    /// The upstream domain error carried by this failure, if any.
    pub fn upstream(&self) -> Option<&UpstreamError> {
        match self {
            Self::Origin(OriginError::Upstream(err)) => Some(err),
            _ => None,
        }
    }
}

impl From<UpstreamError> for CacheError {
    fn from(err: UpstreamError) -> Self {
        Self::Origin(OriginError::Upstream(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_errors_keep_their_kind_and_message() {
        let err = CacheError::from(OriginError::from(UpstreamError::blog_not_found("staff")));
        assert_eq!(err.upstream(), Some(&UpstreamError::blog_not_found("staff")));
        assert_eq!(err.to_string(), "blog `staff` not found");
    }

    #[test]
    fn transport_errors_carry_no_upstream_kind() {
        let err = CacheError::from(OriginError::transport("pool exhausted"));
        assert!(err.upstream().is_none());
        assert_eq!(err.to_string(), "origin transport error: pool exhausted");
    }
}
