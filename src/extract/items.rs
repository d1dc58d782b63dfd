//! Dispatch of raw timeline and blog elements onto typed [`Item`]s.
//!
//! Each [`ItemSource`] owns a fixed, ordered list of recognizers. The first
//! recognizer whose predicates all hold decides the variant. Elements no
//! recognizer accepts, and accepted elements missing a required field, are
//! dropped rather than failing the page.

use serde::Deserialize;
use serde_json::Value;
use time::OffsetDateTime;
use tracing::debug;

use crate::domain::blogs::Blog;
use crate::domain::posts::{AnswerPost, Item, Post, ReblogPost, TrailEntry};
use crate::domain::types::ItemKind;

use super::blocks::{parse_content, parse_layout};
use super::blogs::parse_blog;
use super::raw::{RawBlog, RawPost, lenient, lenient_scalar, lenient_seq};

type Predicate = fn(&RawPost) -> bool;

/// A variant recognizer: all predicates must hold for `kind` to be chosen.
pub struct Recognizer {
    pub kind: ItemKind,
    matches: &'static [Predicate],
}

impl Recognizer {
    fn accepts(&self, raw: &RawPost) -> bool {
        self.matches.iter().all(|predicate| predicate(raw))
    }
}

/// Which kind of payload an element was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemSource {
    /// `timeline.elements`; interleaves posts with titles, carousels and ads.
    Timeline,
    /// `posts` of a blog feed or blog search; every entry is meant to be a post.
    BlogPosts,
}

impl ItemSource {
    pub fn recognizers(self) -> &'static [Recognizer] {
        match self {
            ItemSource::Timeline => &TIMELINE_RECOGNIZERS,
            ItemSource::BlogPosts => &BLOG_POST_RECOGNIZERS,
        }
    }

    fn recognize(self, raw: &RawPost) -> Option<ItemKind> {
        self.recognizers()
            .iter()
            .find(|recognizer| recognizer.accepts(raw))
            .map(|recognizer| recognizer.kind)
    }
}

static TIMELINE_RECOGNIZERS: [Recognizer; 9] = [
    Recognizer { kind: ItemKind::Reblog, matches: &[is_post_object, is_reblog] },
    Recognizer { kind: ItemKind::Answer, matches: &[is_post_object, is_answer] },
    Recognizer { kind: ItemKind::Photo, matches: &[is_post_object, is_photo] },
    Recognizer { kind: ItemKind::Video, matches: &[is_post_object, is_video] },
    Recognizer { kind: ItemKind::Audio, matches: &[is_post_object, is_audio] },
    Recognizer { kind: ItemKind::Link, matches: &[is_post_object, is_link] },
    Recognizer { kind: ItemKind::Quote, matches: &[is_post_object, is_quote] },
    Recognizer { kind: ItemKind::Chat, matches: &[is_post_object, is_chat] },
    Recognizer { kind: ItemKind::Text, matches: &[is_post_object] },
];

static BLOG_POST_RECOGNIZERS: [Recognizer; 9] = [
    Recognizer { kind: ItemKind::Reblog, matches: &[may_be_post, is_reblog] },
    Recognizer { kind: ItemKind::Answer, matches: &[may_be_post, is_answer] },
    Recognizer { kind: ItemKind::Photo, matches: &[may_be_post, is_photo] },
    Recognizer { kind: ItemKind::Video, matches: &[may_be_post, is_video] },
    Recognizer { kind: ItemKind::Audio, matches: &[may_be_post, is_audio] },
    Recognizer { kind: ItemKind::Link, matches: &[may_be_post, is_link] },
    Recognizer { kind: ItemKind::Quote, matches: &[may_be_post, is_quote] },
    Recognizer { kind: ItemKind::Chat, matches: &[may_be_post, is_chat] },
    Recognizer { kind: ItemKind::Text, matches: &[may_be_post] },
];

fn is_post_object(raw: &RawPost) -> bool {
    raw.object_type.as_deref() == Some("post")
}

fn may_be_post(raw: &RawPost) -> bool {
    matches!(raw.object_type.as_deref(), None | Some("post"))
}

fn is_reblog(raw: &RawPost) -> bool {
    !raw.trail.is_empty() || raw.reblogged_from_id.is_some()
}

fn is_answer(raw: &RawPost) -> bool {
    raw.has_layout("ask") || original_kind(raw) == Some(ItemKind::Answer)
}

fn is_photo(raw: &RawPost) -> bool {
    original_kind(raw) == Some(ItemKind::Photo)
}

fn is_video(raw: &RawPost) -> bool {
    original_kind(raw) == Some(ItemKind::Video)
}

fn is_audio(raw: &RawPost) -> bool {
    original_kind(raw) == Some(ItemKind::Audio)
}

fn is_link(raw: &RawPost) -> bool {
    original_kind(raw) == Some(ItemKind::Link)
}

fn is_quote(raw: &RawPost) -> bool {
    original_kind(raw) == Some(ItemKind::Quote)
}

fn is_chat(raw: &RawPost) -> bool {
    original_kind(raw) == Some(ItemKind::Chat)
}

fn original_kind(raw: &RawPost) -> Option<ItemKind> {
    raw.original_type
        .as_deref()
        .and_then(ItemKind::from_original_type)
}

/// Parse one raw element into an [`Item`].
///
/// `index` and `total_in_page` are positions in the raw array, before any
/// element is dropped, and are carried onto the item.
pub fn parse_item(
    element: &Value,
    index: usize,
    total_in_page: usize,
    source: ItemSource,
) -> Option<Item> {
    if !element.is_object() {
        debug!(op = "items.parse", index, reason = "not_an_object", "dropping element");
        return None;
    }

    let Ok(raw) = RawPost::deserialize(element) else {
        debug!(op = "items.parse", index, reason = "undecodable", "dropping element");
        return None;
    };

    let Some(kind) = source.recognize(&raw) else {
        debug!(
            op = "items.parse",
            index,
            object_type = raw.object_type.as_deref().unwrap_or("none"),
            reason = "unrecognized",
            "dropping element"
        );
        return None;
    };

    let Some(post) = build_post(&raw, index, total_in_page) else {
        debug!(
            op = "items.parse",
            index,
            kind = kind.as_str(),
            reason = "malformed",
            "dropping element"
        );
        return None;
    };

    Some(match kind {
        ItemKind::Text => Item::Text(post),
        ItemKind::Photo => Item::Photo(post),
        ItemKind::Video => Item::Video(post),
        ItemKind::Audio => Item::Audio(post),
        ItemKind::Link => Item::Link(post),
        ItemKind::Quote => Item::Quote(post),
        ItemKind::Chat => Item::Chat(post),
        ItemKind::Answer => {
            let asker = ask_attribution(&raw.layout);
            Item::Answer(AnswerPost { post, asker })
        }
        ItemKind::Reblog => Item::Reblog(ReblogPost {
            post,
            reblogged_from_id: raw.reblogged_from_id.clone(),
            reblogged_root_name: raw.reblogged_root_name.clone(),
            trail: raw.trail.iter().filter_map(parse_trail_entry).collect(),
        }),
    })
}

/// Build the shared post body; `None` when a required field is missing.
fn build_post(raw: &RawPost, index: usize, total_in_page: usize) -> Option<Post> {
    let id = raw.post_id()?.to_string();
    let timestamp = OffsetDateTime::from_unix_timestamp(raw.timestamp?).ok()?;
    let blog = owning_blog(raw)?;

    Some(Post {
        id,
        blog,
        timestamp,
        content: parse_content(&raw.content),
        layout: parse_layout(&raw.layout),
        tags: raw.tags.clone(),
        note_count: raw.note_count,
        post_url: raw.post_url.clone(),
        slug: raw.slug.clone(),
        summary: raw.summary.clone(),
        original_type: raw.original_type.clone(),
        is_nsfw: raw.is_nsfw.unwrap_or(false),
        index,
        total_in_page,
    })
}

/// The embedded blog object, or a name-only blog from `blogName`.
fn owning_blog(raw: &RawPost) -> Option<Blog> {
    raw.blog
        .clone()
        .and_then(RawBlog::into_blog)
        .or_else(|| {
            RawBlog {
                name: raw.blog_name.clone(),
                ..Default::default()
            }
            .into_blog()
        })
}

fn ask_attribution(layout: &[Value]) -> Option<Blog> {
    layout
        .iter()
        .find(|entry| entry.get("type").and_then(Value::as_str) == Some("ask"))
        .and_then(|entry| entry.pointer("/attribution/blog"))
        .and_then(parse_blog)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTrailEntry {
    #[serde(default, deserialize_with = "lenient")]
    post: Option<RawTrailPost>,
    #[serde(default)]
    blog: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    broken_blog: Option<RawBlog>,
    #[serde(default, deserialize_with = "lenient_seq")]
    content: Vec<Value>,
    #[serde(default, deserialize_with = "lenient_seq")]
    layout: Vec<Value>,
}

#[derive(Deserialize)]
struct RawTrailPost {
    #[serde(default, deserialize_with = "lenient_scalar")]
    id: Option<String>,
}

fn parse_trail_entry(raw: &Value) -> Option<TrailEntry> {
    let entry = RawTrailEntry::deserialize(raw).ok()?;
    Some(TrailEntry {
        post_id: entry.post.and_then(|post| post.id),
        blog: entry.blog.as_ref().and_then(parse_blog),
        broken_blog_name: entry.broken_blog.and_then(|blog| blog.name),
        content: parse_content(&entry.content),
        layout: parse_layout(&entry.layout),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::blocks::ContentBlock;

    fn post(extra: Value) -> Value {
        let mut base = json!({
            "objectType": "post",
            "id": "7100",
            "blog": {"name": "ferns"},
            "timestamp": 1700000000,
            "content": [{"type": "text", "text": "hi"}],
        });
        if let (Some(base), Some(extra)) = (base.as_object_mut(), extra.as_object()) {
            for (key, value) in extra {
                base.insert(key.clone(), value.clone());
            }
        }
        base
    }

    #[test]
    fn plain_post_becomes_text() {
        let item = parse_item(&post(json!({})), 0, 1, ItemSource::Timeline).expect("item");
        assert_eq!(item.kind(), ItemKind::Text);
        assert_eq!(item.id(), "7100");
        assert_eq!(item.blog().name, "ferns");
        assert_eq!(item.date().unix_timestamp(), 1_700_000_000);
        assert!(item.is_last_in_page());
    }

    #[test]
    fn original_type_selects_variant() {
        let item = parse_item(
            &post(json!({"originalType": "photo"})),
            0,
            2,
            ItemSource::Timeline,
        )
        .expect("item");
        assert_eq!(item.kind(), ItemKind::Photo);
        assert!(!item.is_last_in_page());
    }

    #[test]
    fn trail_wins_over_original_type() {
        let raw = post(json!({
            "originalType": "photo",
            "rebloggedFromId": "6900",
            "trail": [
                {
                    "post": {"id": "6800"},
                    "blog": {"name": "moss"},
                    "content": [{"type": "text", "text": "first"}],
                    "layout": []
                },
                {
                    "post": {"id": "6900"},
                    "brokenBlog": {"name": "gone"},
                    "content": [{"type": "mystery"}]
                }
            ]
        }));

        let item = parse_item(&raw, 3, 10, ItemSource::BlogPosts).expect("item");
        let Item::Reblog(reblog) = &item else {
            panic!("expected reblog");
        };
        assert_eq!(reblog.reblogged_from_id.as_deref(), Some("6900"));
        assert_eq!(reblog.trail.len(), 2);
        assert_eq!(reblog.trail[0].blog_name(), Some("moss"));
        assert_eq!(reblog.trail[1].blog_name(), Some("gone"));
        assert!(matches!(
            reblog.trail[1].content[0],
            ContentBlock::Unsupported { .. }
        ));
        assert_eq!(item.index(), 3);
        assert_eq!(item.total_in_page(), 10);
    }

    #[test]
    fn ask_layout_makes_an_answer() {
        let raw = post(json!({
            "layout": [{"type": "ask", "blocks": [0], "attribution": {"type": "blog", "blog": {"name": "curious"}}}]
        }));

        let item = parse_item(&raw, 0, 1, ItemSource::Timeline).expect("item");
        let Item::Answer(answer) = item else {
            panic!("expected answer");
        };
        assert_eq!(answer.asker.map(|blog| blog.name), Some("curious".to_string()));
    }

    #[test]
    fn timeline_requires_post_object_type() {
        let title = json!({"objectType": "title", "title": "Trending"});
        assert!(parse_item(&title, 0, 2, ItemSource::Timeline).is_none());

        let untyped = post(json!({"objectType": null}));
        assert!(parse_item(&untyped, 0, 1, ItemSource::Timeline).is_none());
        assert!(parse_item(&untyped, 0, 1, ItemSource::BlogPosts).is_some());
    }

    #[test]
    fn missing_required_fields_drop_the_element() {
        assert!(parse_item(&post(json!({"id": null})), 0, 1, ItemSource::Timeline).is_none());
        assert!(parse_item(&post(json!({"timestamp": "soon"})), 0, 1, ItemSource::Timeline).is_none());
        assert!(parse_item(&post(json!({"blog": {}})), 0, 1, ItemSource::Timeline).is_none());
        assert!(parse_item(&json!([1, 2]), 0, 1, ItemSource::Timeline).is_none());
    }

    #[test]
    fn blog_name_backs_up_missing_blog_object() {
        let raw = post(json!({"blog": null, "blogName": "fallback"}));
        let item = parse_item(&raw, 0, 1, ItemSource::BlogPosts).expect("item");
        assert_eq!(item.blog().name, "fallback");
    }

    #[test]
    fn recognizer_lists_end_with_text_catch_all() {
        for source in [ItemSource::Timeline, ItemSource::BlogPosts] {
            let kinds: Vec<_> = source.recognizers().iter().map(|r| r.kind).collect();
            assert_eq!(kinds.first(), Some(&ItemKind::Reblog));
            assert_eq!(kinds.last(), Some(&ItemKind::Text));
            assert_eq!(kinds.len(), 9);
        }
    }
}
