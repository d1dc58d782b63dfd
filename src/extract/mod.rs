//! Conversion of raw upstream JSON into domain aggregates.
//!
//! Parsing is pure and synchronous: no shared state, no I/O. Expected gaps in
//! a payload surface as `None`, and malformed elements are dropped.

pub mod blocks;
pub mod blogs;
mod collections;
pub mod cursor;
pub mod items;
mod raw;

pub use blocks::{parse_block, parse_content, parse_layout};
pub use blogs::parse_blog;
pub use collections::{parse_blog_timeline, parse_timeline};
pub use items::{ItemSource, Recognizer, parse_item};
