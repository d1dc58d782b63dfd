//! Ordered content blocks making up a post body.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use crate::domain::blogs::Blog;

/// One resolution variant of an image, poster, or avatar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaVariant {
    pub url: String,
    pub mime_type: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub has_original_dimensions: bool,
    pub cropped: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
        subtype: Option<String>,
        indent_level: Option<u32>,
        formatting: Vec<FormattingSpan>,
    },
    Image {
        media: Vec<MediaVariant>,
        alt_text: Option<String>,
        caption: Option<String>,
        colors: Vec<String>,
    },
    Link {
        url: String,
        title: Option<String>,
        description: Option<String>,
        author: Option<String>,
        site_name: Option<String>,
        display_url: Option<String>,
        poster: Vec<MediaVariant>,
    },
    Audio {
        url: Option<String>,
        media: Option<MediaVariant>,
        provider: Option<String>,
        title: Option<String>,
        artist: Option<String>,
        album: Option<String>,
        poster: Vec<MediaVariant>,
        embed_html: Option<String>,
        embed_url: Option<String>,
    },
    Video {
        url: Option<String>,
        media: Option<MediaVariant>,
        provider: Option<String>,
        poster: Vec<MediaVariant>,
        embed_html: Option<String>,
        embed_url: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
    },
    Poll {
        client_id: Option<String>,
        question: String,
        answers: Vec<PollAnswer>,
        multiple_choice: bool,
        /// Seconds after creation at which voting closes.
        expires_after: Option<u64>,
        #[serde(with = "time::serde::timestamp::option")]
        created_at: Option<OffsetDateTime>,
    },
    /// Block whose type is unknown, or whose payload did not match its type.
    Unsupported { kind: String, payload: Value },
}

impl ContentBlock {
    pub fn kind(&self) -> &str {
        match self {
            ContentBlock::Text { .. } => "text",
            ContentBlock::Image { .. } => "image",
            ContentBlock::Link { .. } => "link",
            ContentBlock::Audio { .. } => "audio",
            ContentBlock::Video { .. } => "video",
            ContentBlock::Poll { .. } => "poll",
            ContentBlock::Unsupported { kind, .. } => kind,
        }
    }

    /// Closing time of a poll block, when both halves are known.
    pub fn poll_expires_at(&self) -> Option<OffsetDateTime> {
        match self {
            ContentBlock::Poll {
                expires_after: Some(after),
                created_at: Some(created),
                ..
            } => i64::try_from(*after)
                .ok()
                .and_then(|after| created.checked_add(time::Duration::seconds(after))),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollAnswer {
    pub client_id: Option<String>,
    pub text: String,
}

/// A formatting range over a text block.
///
/// Spans may overlap and are kept in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattingSpan {
    pub start: usize,
    pub end: usize,
    pub kind: FormattingKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum FormattingKind {
    Bold,
    Italic,
    Strikethrough,
    Small,
    Link { url: String },
    Mention { blog_name: String, blog_url: Option<String> },
    Color { hex: String },
    Other { kind: String },
}

/// Presentation hints sent alongside the content array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayoutEntry {
    Rows {
        rows: Vec<Vec<usize>>,
        truncate_after: Option<usize>,
    },
    Ask {
        blocks: Vec<usize>,
        attribution: Option<Blog>,
    },
    Condensed {
        blocks: Vec<usize>,
    },
    Unsupported {
        kind: String,
    },
}
