//! Domain layer: immutable aggregates produced by the extractor.

pub mod blocks;
pub mod blogs;
pub mod error;
pub mod pagination;
pub mod posts;
pub mod timelines;
pub mod types;

pub use blocks::{ContentBlock, FormattingKind, FormattingSpan, LayoutEntry, MediaVariant};
pub use blogs::{Blog, BlogTheme};
pub use error::UpstreamError;
pub use pagination::Cursor;
pub use posts::{AnswerPost, Item, Post, ReblogPost, TrailEntry};
pub use timelines::{BlogTimeline, Timeline};
pub use types::ItemKind;
