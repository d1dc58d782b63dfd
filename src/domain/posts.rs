//! Posts and the typed items timelines are made of.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::blocks::{ContentBlock, LayoutEntry};
use crate::domain::blogs::Blog;
use crate::domain::types::ItemKind;

/// Fields shared by every post variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub blog: Blog,
    #[serde(with = "time::serde::timestamp")]
    pub timestamp: OffsetDateTime,
    pub content: Vec<ContentBlock>,
    pub layout: Vec<LayoutEntry>,
    pub tags: Vec<String>,
    pub note_count: Option<u64>,
    pub post_url: Option<String>,
    pub slug: Option<String>,
    pub summary: Option<String>,
    pub original_type: Option<String>,
    pub is_nsfw: bool,
    /// Position of the raw element in its page, counted before any drops.
    pub index: usize,
    /// Number of raw elements in the containing page.
    pub total_in_page: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerPost {
    pub post: Post,
    /// Blog that asked; `None` for anonymous asks.
    pub asker: Option<Blog>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReblogPost {
    pub post: Post,
    pub reblogged_from_id: Option<String>,
    pub reblogged_root_name: Option<String>,
    /// Earlier posts in the chain, oldest first.
    pub trail: Vec<TrailEntry>,
}

/// One earlier post in a reblog chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailEntry {
    pub post_id: Option<String>,
    pub blog: Option<Blog>,
    /// Name of a blog that has since been deleted or suspended.
    pub broken_blog_name: Option<String>,
    pub content: Vec<ContentBlock>,
    pub layout: Vec<LayoutEntry>,
}

impl TrailEntry {
    pub fn blog_name(&self) -> Option<&str> {
        self.blog
            .as_ref()
            .map(|blog| blog.name.as_str())
            .or(self.broken_blog_name.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Item {
    Text(Post),
    Photo(Post),
    Video(Post),
    Audio(Post),
    Link(Post),
    Quote(Post),
    Chat(Post),
    Answer(AnswerPost),
    Reblog(ReblogPost),
}

impl Item {
    pub fn kind(&self) -> ItemKind {
        match self {
            Item::Text(_) => ItemKind::Text,
            Item::Photo(_) => ItemKind::Photo,
            Item::Video(_) => ItemKind::Video,
            Item::Audio(_) => ItemKind::Audio,
            Item::Link(_) => ItemKind::Link,
            Item::Quote(_) => ItemKind::Quote,
            Item::Chat(_) => ItemKind::Chat,
            Item::Answer(_) => ItemKind::Answer,
            Item::Reblog(_) => ItemKind::Reblog,
        }
    }

    pub fn post(&self) -> &Post {
        match self {
            Item::Text(post)
            | Item::Photo(post)
            | Item::Video(post)
            | Item::Audio(post)
            | Item::Link(post)
            | Item::Quote(post)
            | Item::Chat(post) => post,
            Item::Answer(answer) => &answer.post,
            Item::Reblog(reblog) => &reblog.post,
        }
    }

    pub fn id(&self) -> &str {
        &self.post().id
    }

    pub fn blog(&self) -> &Blog {
        &self.post().blog
    }

    /// Publication time; stable across cache round trips.
    pub fn date(&self) -> OffsetDateTime {
        self.post().timestamp
    }

    pub fn content(&self) -> &[ContentBlock] {
        &self.post().content
    }

    pub fn layout(&self) -> &[LayoutEntry] {
        &self.post().layout
    }

    pub fn index(&self) -> usize {
        self.post().index
    }

    pub fn total_in_page(&self) -> usize {
        self.post().total_in_page
    }

    /// Whether this item came from the final raw element of its page.
    pub fn is_last_in_page(&self) -> bool {
        self.total_in_page() > 0 && self.index() + 1 == self.total_in_page()
    }

    pub fn trail(&self) -> &[TrailEntry] {
        match self {
            Item::Reblog(reblog) => &reblog.trail,
            _ => &[],
        }
    }
}
