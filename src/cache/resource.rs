//! Per-resource parameters of the access layer.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::config::CacheConfig;
use super::error::{CacheError, OriginError};
use super::origin::Origin;

/// One cacheable upstream resource kind.
///
/// A value of the implementing type identifies a single request; the trait
/// supplies its key, lifetime, how to fetch it, and how to turn the raw
/// response into an aggregate.
#[async_trait]
pub trait Resource: Clone + Send + Sync + 'static {
    type Output: Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Label used in logs and metrics.
    fn kind(&self) -> &'static str;

    fn key(&self) -> String;

    fn ttl(&self, config: &CacheConfig) -> Duration;

    async fn fetch(&self, origin: &dyn Origin) -> Result<Value, OriginError>;

    /// `None` when the response holds nothing to build an aggregate from.
    fn parse(&self, raw: &Value) -> Option<Self::Output>;

    fn decode_cached(&self, payload: &[u8]) -> Result<Self::Output, CacheError> {
        serde_json::from_slice(payload).map_err(|err| CacheError::codec(err.to_string()))
    }

    fn encode(&self, aggregate: &Self::Output) -> Result<Vec<u8>, CacheError> {
        serde_json::to_vec(aggregate).map_err(|err| CacheError::codec(err.to_string()))
    }
}
