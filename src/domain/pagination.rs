//! Continuation state carried between pages of a feed.

use serde::{Deserialize, Serialize};

/// Upstream query parameter names found under `links.next.queryParams`.
mod params {
    pub const CURSOR: &str = "cursor";
    pub const PAGE_NUMBER: &str = "pageNumber";
    pub const DAYS: &str = "days";
    pub const QUERY: &str = "query";
    pub const MODE: &str = "mode";
    pub const TIMELINE_TYPE: &str = "timelineType";
    pub const SKIP_COMPONENT: &str = "skipComponent";
    pub const REBLOG_INFO: &str = "reblogInfo";
    pub const POST_TYPE_FILTER: &str = "postTypeFilter";
}

/// Opaque pagination handle for the next page of a feed.
///
/// Field names follow the internal naming; the upstream parameter each one is
/// read from is not always the same-named one (`limit` comes from `days`,
/// `days` from `query`, `query` from `mode`, `mode` from `timelineType`).
/// Continuation requests built elsewhere depend on this exact pairing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub(crate) cursor: Option<String>,
    pub(crate) limit: Option<String>,
    pub(crate) days: Option<String>,
    pub(crate) query: Option<String>,
    pub(crate) mode: Option<String>,
    pub(crate) skip_components: Option<String>,
    pub(crate) reblog_info: Option<String>,
    pub(crate) post_type_filter: Option<String>,
}

impl Cursor {
    /// Build a cursor from upstream parameters looked up by name.
    ///
    /// An empty `cursor` falls back to `pageNumber`; every other field keeps
    /// empty values as given.
    pub(crate) fn from_upstream<F>(param: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            cursor: param(params::CURSOR)
                .filter(|value| !value.is_empty())
                .or_else(|| param(params::PAGE_NUMBER)),
            limit: param(params::DAYS),
            days: param(params::QUERY),
            query: param(params::MODE),
            mode: param(params::TIMELINE_TYPE),
            skip_components: param(params::SKIP_COMPONENT),
            reblog_info: param(params::REBLOG_INFO),
            post_type_filter: param(params::POST_TYPE_FILTER),
        }
    }

    /// Rebuild a cursor from a next-page query string, as rendered by
    /// [`Cursor::to_query_string`] or taken from an upstream link.
    ///
    /// A leading `?` is ignored. When a parameter repeats, the first
    /// occurrence wins.
    pub fn from_query_string(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs: Vec<(String, String)> = url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();

        Self::from_upstream(|name| {
            pairs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.clone())
        })
    }

    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    pub fn limit(&self) -> Option<&str> {
        self.limit.as_deref()
    }

    pub fn days(&self) -> Option<&str> {
        self.days.as_deref()
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn mode(&self) -> Option<&str> {
        self.mode.as_deref()
    }

    pub fn skip_components(&self) -> Option<&str> {
        self.skip_components.as_deref()
    }

    pub fn reblog_info(&self) -> Option<&str> {
        self.reblog_info.as_deref()
    }

    pub fn post_type_filter(&self) -> Option<&str> {
        self.post_type_filter.as_deref()
    }

    /// Upstream query parameters for the next page request, in upstream order.
    ///
    /// Inverse of the decode mapping. Absent fields are omitted and a
    /// `pageNumber` continuation is re-emitted as `cursor`.
    pub fn query_params(&self) -> Vec<(&'static str, &str)> {
        [
            (params::CURSOR, self.cursor()),
            (params::DAYS, self.limit()),
            (params::QUERY, self.days()),
            (params::MODE, self.query()),
            (params::TIMELINE_TYPE, self.mode()),
            (params::SKIP_COMPONENT, self.skip_components()),
            (params::REBLOG_INFO, self.reblog_info()),
            (params::POST_TYPE_FILTER, self.post_type_filter()),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|value| (name, value)))
        .collect()
    }

    /// Form-urlencoded rendering of [`Cursor::query_params`].
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query_params())
            .finish()
    }
}
