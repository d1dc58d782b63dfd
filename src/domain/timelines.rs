//! Aggregates returned to consumers: plain timelines and blog feeds.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::blogs::Blog;
use crate::domain::pagination::Cursor;
use crate::domain::posts::Item;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub elements: Vec<Item>,
    pub next: Option<Cursor>,
}

impl Timeline {
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Feed freshness: date of the last element, falling back to now.
    pub fn updated(&self) -> OffsetDateTime {
        last_updated(&self.elements)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogTimeline {
    pub blog_info: Blog,
    pub posts: Vec<Item>,
    /// `None` when the upstream did not report a total.
    pub total_posts: Option<u64>,
    pub next: Option<Cursor>,
}

impl BlogTimeline {
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Feed freshness: date of the last post, falling back to now.
    pub fn updated(&self) -> OffsetDateTime {
        last_updated(&self.posts)
    }
}

fn last_updated(items: &[Item]) -> OffsetDateTime {
    items
        .last()
        .map(Item::date)
        .unwrap_or_else(OffsetDateTime::now_utc)
}
