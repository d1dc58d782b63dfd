//! Content block and layout parsing.
//!
//! Blocks are never dropped: layout entries address blocks by position, so an
//! entry that cannot be read still occupies its slot as
//! [`ContentBlock::Unsupported`].

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use time::OffsetDateTime;
use tracing::debug;

use crate::domain::blocks::{
    ContentBlock, FormattingKind, FormattingSpan, LayoutEntry, MediaVariant, PollAnswer,
};

use super::blogs::{media_variants, parse_blog};
use super::raw::{RawMedia, lenient, lenient_int, lenient_seq};

/// Parse an ordered content array.
pub fn parse_content(raw: &[Value]) -> Vec<ContentBlock> {
    raw.iter().map(parse_block).collect()
}

/// Parse a single content entry by its `type` discriminator.
pub fn parse_block(raw: &Value) -> ContentBlock {
    let kind = raw.get("type").and_then(Value::as_str).unwrap_or_default();
    let parsed = match kind {
        "text" => typed::<RawText>(raw).and_then(RawText::into_block),
        "image" => typed::<RawImage>(raw).map(RawImage::into_block),
        "link" => typed::<RawLink>(raw).and_then(RawLink::into_block),
        "audio" => typed::<RawAudio>(raw).map(RawAudio::into_block),
        "video" => typed::<RawVideo>(raw).map(RawVideo::into_block),
        "poll" => typed::<RawPoll>(raw).and_then(RawPoll::into_block),
        _ => None,
    };

    parsed.unwrap_or_else(|| {
        debug!(op = "blocks.parse", kind, "passing block through as unsupported");
        ContentBlock::Unsupported {
            kind: kind.to_string(),
            payload: raw.clone(),
        }
    })
}

/// Parse the layout array that accompanies a content array.
pub fn parse_layout(raw: &[Value]) -> Vec<LayoutEntry> {
    raw.iter().filter_map(parse_layout_entry).collect()
}

fn parse_layout_entry(raw: &Value) -> Option<LayoutEntry> {
    let kind = raw.get("type").and_then(Value::as_str)?;
    let entry = match kind {
        "rows" => {
            let layout = typed::<RawRowsLayout>(raw)?;
            LayoutEntry::Rows {
                rows: layout.display.into_iter().map(|row| row.blocks).collect(),
                truncate_after: layout.truncate_after,
            }
        }
        "ask" => {
            let layout = typed::<RawAskLayout>(raw)?;
            LayoutEntry::Ask {
                blocks: layout.blocks,
                attribution: layout
                    .attribution
                    .as_ref()
                    .and_then(|attribution| attribution.get("blog"))
                    .and_then(parse_blog),
            }
        }
        "condensed" => {
            let layout = typed::<RawCondensedLayout>(raw)?;
            LayoutEntry::Condensed {
                blocks: layout.blocks,
            }
        }
        other => LayoutEntry::Unsupported {
            kind: other.to_string(),
        },
    };
    Some(entry)
}

fn typed<T: DeserializeOwned>(raw: &Value) -> Option<T> {
    T::deserialize(raw).ok()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawText {
    #[serde(default, deserialize_with = "lenient")]
    text: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    subtype: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    indent_level: Option<u32>,
    #[serde(default, deserialize_with = "lenient_seq")]
    formatting: Vec<Value>,
}

impl RawText {
    fn into_block(self) -> Option<ContentBlock> {
        Some(ContentBlock::Text {
            text: self.text?,
            subtype: self.subtype,
            indent_level: self.indent_level,
            formatting: self.formatting.iter().filter_map(parse_span).collect(),
        })
    }
}

#[derive(Deserialize)]
struct RawSpan {
    start: usize,
    end: usize,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, deserialize_with = "lenient")]
    url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    hex: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    blog: Option<RawSpanBlog>,
}

#[derive(Deserialize)]
struct RawSpanBlog {
    name: String,
    #[serde(default, deserialize_with = "lenient")]
    url: Option<String>,
}

/// Spans are taken as-is; overlap is left for rendering to resolve.
fn parse_span(raw: &Value) -> Option<FormattingSpan> {
    let Some(span) = typed::<RawSpan>(raw) else {
        debug!(op = "blocks.parse_span", "dropping malformed formatting span");
        return None;
    };

    let kind = match (span.kind.as_str(), span.url, span.hex, span.blog) {
        ("bold", ..) => FormattingKind::Bold,
        ("italic", ..) => FormattingKind::Italic,
        ("strikethrough", ..) => FormattingKind::Strikethrough,
        ("small", ..) => FormattingKind::Small,
        ("link", Some(url), ..) => FormattingKind::Link { url },
        ("color", _, Some(hex), _) => FormattingKind::Color { hex },
        ("mention", _, _, Some(blog)) => FormattingKind::Mention {
            blog_name: blog.name,
            blog_url: blog.url,
        },
        (other, ..) => FormattingKind::Other {
            kind: other.to_string(),
        },
    };

    Some(FormattingSpan {
        start: span.start,
        end: span.end,
        kind,
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawImage {
    #[serde(default, deserialize_with = "lenient_seq")]
    media: Vec<RawMedia>,
    #[serde(default, deserialize_with = "lenient")]
    alt_text: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    caption: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    colors: Option<Map<String, Value>>,
}

impl RawImage {
    fn into_block(self) -> ContentBlock {
        ContentBlock::Image {
            media: media_variants(self.media),
            alt_text: self.alt_text,
            caption: self.caption,
            colors: self
                .colors
                .map(|colors| {
                    colors
                        .into_iter()
                        .filter_map(|(_, value)| value.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLink {
    #[serde(default, deserialize_with = "lenient")]
    url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    author: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    site_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    display_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_seq")]
    poster: Vec<RawMedia>,
}

impl RawLink {
    fn into_block(self) -> Option<ContentBlock> {
        Some(ContentBlock::Link {
            url: self.url.filter(|url| !url.is_empty())?,
            title: self.title,
            description: self.description,
            author: self.author,
            site_name: self.site_name,
            display_url: self.display_url,
            poster: media_variants(self.poster),
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAudio {
    #[serde(default, deserialize_with = "lenient")]
    url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    media: Option<RawMedia>,
    #[serde(default, deserialize_with = "lenient")]
    provider: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    artist: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    album: Option<String>,
    #[serde(default, deserialize_with = "lenient_seq")]
    poster: Vec<RawMedia>,
    #[serde(default, deserialize_with = "lenient")]
    embed_html: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    embed_url: Option<String>,
}

impl RawAudio {
    fn into_block(self) -> ContentBlock {
        ContentBlock::Audio {
            url: self.url,
            media: self.media.and_then(RawMedia::into_variant),
            provider: self.provider,
            title: self.title,
            artist: self.artist,
            album: self.album,
            poster: media_variants(self.poster),
            embed_html: self.embed_html,
            embed_url: self.embed_url,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVideo {
    #[serde(default, deserialize_with = "lenient")]
    url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    media: Option<RawMedia>,
    #[serde(default, deserialize_with = "lenient")]
    provider: Option<String>,
    #[serde(default, deserialize_with = "lenient_seq")]
    poster: Vec<RawMedia>,
    #[serde(default, deserialize_with = "lenient")]
    embed_html: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    embed_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    embed_iframe: Option<RawMedia>,
}

impl RawVideo {
    fn into_block(self) -> ContentBlock {
        let media: Option<MediaVariant> = self.media.and_then(RawMedia::into_variant);
        let iframe = self.embed_iframe.unwrap_or_default();
        let width = media.as_ref().and_then(|m| m.width).or(iframe.width);
        let height = media.as_ref().and_then(|m| m.height).or(iframe.height);

        ContentBlock::Video {
            url: self.url,
            media,
            provider: self.provider,
            poster: media_variants(self.poster),
            embed_html: self.embed_html,
            embed_url: self.embed_url.or(iframe.url),
            width,
            height,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPoll {
    #[serde(default, deserialize_with = "lenient")]
    client_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    question: Option<String>,
    #[serde(default, deserialize_with = "lenient_seq")]
    answers: Vec<RawPollAnswer>,
    #[serde(default, deserialize_with = "lenient")]
    settings: Option<RawPollSettings>,
    #[serde(default, deserialize_with = "lenient_int")]
    timestamp: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPollAnswer {
    #[serde(default, deserialize_with = "lenient")]
    client_id: Option<String>,
    answer_text: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPollSettings {
    #[serde(default, deserialize_with = "lenient")]
    multiple_choice: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    expire_after: Option<u64>,
}

impl RawPoll {
    fn into_block(self) -> Option<ContentBlock> {
        let settings = self.settings;
        Some(ContentBlock::Poll {
            client_id: self.client_id,
            question: self.question?,
            answers: self
                .answers
                .into_iter()
                .map(|answer| PollAnswer {
                    client_id: answer.client_id,
                    text: answer.answer_text,
                })
                .collect(),
            multiple_choice: settings
                .as_ref()
                .and_then(|s| s.multiple_choice)
                .unwrap_or(false),
            expires_after: settings.as_ref().and_then(|s| s.expire_after),
            created_at: self
                .timestamp
                .and_then(|ts| OffsetDateTime::from_unix_timestamp(ts).ok()),
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRowsLayout {
    #[serde(default, deserialize_with = "lenient_seq")]
    display: Vec<RawRow>,
    #[serde(default, deserialize_with = "lenient")]
    truncate_after: Option<usize>,
}

#[derive(Deserialize)]
struct RawRow {
    blocks: Vec<usize>,
}

#[derive(Deserialize)]
struct RawAskLayout {
    #[serde(default, deserialize_with = "lenient_seq")]
    blocks: Vec<usize>,
    #[serde(default)]
    attribution: Option<Value>,
}

#[derive(Deserialize)]
struct RawCondensedLayout {
    #[serde(default, deserialize_with = "lenient_seq")]
    blocks: Vec<usize>,
}
