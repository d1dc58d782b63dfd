//! Decoding of `links.next.queryParams` into a [`Cursor`].

use serde_json::Value;
use tracing::debug;

use crate::domain::pagination::Cursor;

use super::raw::scalar_to_string;

const NEXT_LINK: &str = "/links/next";

/// Decode the continuation for the next page, if the section links to one.
///
/// `section` is the object carrying `links`: the `timeline` object for
/// timelines, the response root for blog feeds. A missing link means there
/// are no further pages.
pub fn decode(section: &Value) -> Option<Cursor> {
    let next = section.pointer(NEXT_LINK)?;
    let Some(query) = next.get("queryParams").filter(|query| query.is_object()) else {
        debug!(op = "cursor.decode", "next link without query parameters");
        return None;
    };

    Some(Cursor::from_upstream(|name| {
        query.get(name).and_then(scalar_to_string)
    }))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn missing_next_link_is_absent() {
        assert!(decode(&json!({})).is_none());
        assert!(decode(&json!({"links": {}})).is_none());
        assert!(decode(&json!({"links": {"next": {"href": "/v2/x"}}})).is_none());
    }

    #[test]
    fn fields_follow_the_upstream_pairing() {
        let section = json!({
            "links": {"next": {"queryParams": {
                "cursor": "c1",
                "days": "7",
                "query": "cats",
                "mode": "top",
                "timelineType": "post",
                "skipComponent": "related_tags",
                "reblogInfo": "true",
                "postTypeFilter": "photo",
            }}}
        });

        let cursor = decode(&section).expect("cursor");
        assert_eq!(cursor.cursor(), Some("c1"));
        assert_eq!(cursor.limit(), Some("7"));
        assert_eq!(cursor.days(), Some("cats"));
        assert_eq!(cursor.query(), Some("top"));
        assert_eq!(cursor.mode(), Some("post"));
        assert_eq!(cursor.skip_components(), Some("related_tags"));
        assert_eq!(cursor.reblog_info(), Some("true"));
        assert_eq!(cursor.post_type_filter(), Some("photo"));
    }

    #[test]
    fn page_number_stands_in_for_cursor() {
        let section = json!({"links": {"next": {"queryParams": {"cursor": "", "pageNumber": 3}}}});
        let cursor = decode(&section).expect("cursor");
        assert_eq!(cursor.cursor(), Some("3"));
    }

    #[test]
    fn empty_values_survive_except_for_cursor() {
        let section = json!({"links": {"next": {"queryParams": {"cursor": "abc", "days": ""}}}});
        let cursor = decode(&section).expect("cursor");

        assert_eq!(cursor.limit(), Some(""));
        assert_eq!(cursor.to_query_string(), "cursor=abc&days=");
    }

    #[test]
    fn decoded_cursor_survives_a_query_string_trip() {
        let section = json!({"links": {"next": {"queryParams": {
            "pageNumber": 2,
            "timelineType": "blog",
            "reblogInfo": true,
        }}}});
        let cursor = decode(&section).expect("cursor");

        assert_eq!(Cursor::from_query_string(&cursor.to_query_string()), cursor);
    }

    #[test]
    fn re_embedding_restores_upstream_parameters() {
        let query = json!({
            "cursor": "abc",
            "days": "30",
            "query": "ferns",
            "mode": "recent",
            "timelineType": "post",
            "reblogInfo": "false",
        });
        let cursor = decode(&json!({"links": {"next": {"queryParams": query.clone()}}}))
            .expect("cursor");

        let rebuilt: serde_json::Map<String, Value> = cursor
            .query_params()
            .into_iter()
            .map(|(name, value)| (name.to_string(), Value::String(value.to_string())))
            .collect();

        assert_eq!(Value::Object(rebuilt), query);
    }
}
