//! Whole-response parsers producing [`Timeline`] and [`BlogTimeline`].

use serde_json::Value;
use tracing::debug;

use crate::domain::posts::Item;
use crate::domain::timelines::{BlogTimeline, Timeline};

use super::blogs::parse_blog;
use super::cursor;
use super::items::{ItemSource, parse_item};
use super::raw::truthy_member;

/// Parse a generic timeline response (`{ "timeline": { "elements": [...] } }`).
///
/// `None` when the response carries no timeline section.
pub fn parse_timeline(response: &Value) -> Option<Timeline> {
    let section = truthy_member(response, "timeline")?;
    let next = cursor::decode(section);
    let elements = parse_elements(section.get("elements"), ItemSource::Timeline);

    Some(Timeline { elements, next })
}

/// Parse a blog feed response (`{ "blog": {...}, "posts": [...] }`).
///
/// Search responses have no `blog` section: with `is_search` the blog is taken
/// from the first parsed post and the total is the number of parsed posts.
/// `None` when there is no blog to attach the posts to.
pub fn parse_blog_timeline(response: &Value, is_search: bool) -> Option<BlogTimeline> {
    if is_search {
        return parse_blog_search_timeline(response);
    }

    let blog_info = parse_blog(truthy_member(response, "blog")?)?;
    let next = cursor::decode(response);
    let posts = parse_elements(response.get("posts"), ItemSource::BlogPosts);
    let total_posts = response.get("totalPosts").and_then(Value::as_u64);

    Some(BlogTimeline {
        blog_info,
        posts,
        total_posts,
        next,
    })
}

fn parse_blog_search_timeline(response: &Value) -> Option<BlogTimeline> {
    let next = cursor::decode(response);
    let posts = parse_elements(response.get("posts"), ItemSource::BlogPosts);

    let Some(first) = posts.first() else {
        debug!(op = "collections.blog_search", "no parsed posts to take blog info from");
        return None;
    };
    let blog_info = first.blog().clone();
    let total_posts = u64::try_from(posts.len()).ok();

    Some(BlogTimeline {
        blog_info,
        posts,
        total_posts,
        next,
    })
}

/// Map raw elements through the dispatcher in order, keeping raw positions.
fn parse_elements(raw: Option<&Value>, source: ItemSource) -> Vec<Item> {
    let Some(elements) = raw.and_then(Value::as_array) else {
        return Vec::new();
    };

    let total = elements.len();
    let items: Vec<Item> = elements
        .iter()
        .enumerate()
        .filter_map(|(index, element)| parse_item(element, index, total, source))
        .collect();

    if items.len() < total {
        debug!(
            op = "collections.parse_elements",
            raw = total,
            parsed = items.len(),
            "dropped elements while parsing page"
        );
    }

    items
}
