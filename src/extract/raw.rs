//! Typed intermediates for upstream payloads.
//!
//! Every field is optional here. Fields of the wrong shape deserialize to
//! `None` (or an empty list) instead of failing the whole element, so the
//! builders decide what is required.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize an optional field, mapping a mistyped value to `None`.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Deserialize a list, keeping only the entries that have the expected shape.
pub(crate) fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(entries) => entries
            .into_iter()
            .filter_map(|entry| serde_json::from_value(entry).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Deserialize a scalar (string, number or bool) as its string form.
pub(crate) fn lenient_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_to_string(&value))
}

/// Deserialize an integer that may also arrive as a numeric string.
pub(crate) fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    })
}

pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Truthiness of a JSON value: null, `false`, `0`, `""`, `[]` and `{}` are falsy.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(entries) => !entries.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Look up a member of `value`, treating falsy members as missing.
pub(crate) fn truthy_member<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|member| is_truthy(member))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawPost {
    #[serde(default, deserialize_with = "lenient")]
    pub object_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub id_string: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub blog: Option<RawBlog>,
    #[serde(default, deserialize_with = "lenient")]
    pub blog_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub timestamp: Option<i64>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub content: Vec<Value>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub layout: Vec<Value>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub trail: Vec<Value>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub note_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub post_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub original_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub is_nsfw: Option<bool>,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub reblogged_from_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub reblogged_root_name: Option<String>,
}

impl RawPost {
    /// `id`, falling back to `idString`.
    pub fn post_id(&self) -> Option<&str> {
        self.id
            .as_deref()
            .filter(|id| !id.is_empty())
            .or(self.id_string.as_deref().filter(|id| !id.is_empty()))
    }

    pub fn has_layout(&self, kind: &str) -> bool {
        self.layout
            .iter()
            .any(|entry| entry.get("type").and_then(Value::as_str) == Some(kind))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawBlog {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub uuid: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub avatar: Vec<RawMedia>,
    #[serde(default, deserialize_with = "lenient")]
    pub theme: Option<RawTheme>,
    #[serde(default, deserialize_with = "lenient")]
    pub is_adult: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawTheme {
    #[serde(default, deserialize_with = "lenient")]
    pub header_image: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub header_image_focused: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub avatar_shape: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub background_color: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title_color: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub link_color: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title_font: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub show_header_image: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawMedia {
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient")]
    pub mime_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub width: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub height: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub has_original_dimensions: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub cropped: Option<bool>,
}
