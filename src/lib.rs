//! Typed parsing and read-through caching for a blog content API.
//!
//! [`extract`] turns raw JSON responses into the immutable aggregates of
//! [`domain`]; [`cache`] serves those aggregates from a store and fetches
//! them from an [`cache::Origin`] on a miss, one fetch per key at a time.

pub mod cache;
pub mod config;
pub mod domain;
pub mod extract;
pub mod infra;
