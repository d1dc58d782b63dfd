//! Deterministic cache key construction.
//!
//! A key is a prefix followed by identifying segments and `name:value` pairs
//! joined with `:`, in the order they were added. Segments and values are
//! form-urlencoded, so a `:` inside a blog name or query cannot forge another
//! key's layout. Falsy values (`""`, `None`, `0`, `false`) are left out, so a
//! request with an empty filter shares its key with one that has no filter at
//! all.

use crate::domain::pagination::Cursor;

const SEPARATOR: char = ':';

/// A value that may take part in a cache key.
pub trait KeyParam {
    /// Rendered value, or `None` when the value is falsy.
    fn key_value(&self) -> Option<String>;
}

impl KeyParam for str {
    fn key_value(&self) -> Option<String> {
        (!self.is_empty()).then(|| self.to_string())
    }
}

impl KeyParam for String {
    fn key_value(&self) -> Option<String> {
        self.as_str().key_value()
    }
}

impl KeyParam for u64 {
    fn key_value(&self) -> Option<String> {
        (*self != 0).then(|| self.to_string())
    }
}

impl KeyParam for bool {
    fn key_value(&self) -> Option<String> {
        self.then(|| "true".to_string())
    }
}

impl KeyParam for Cursor {
    fn key_value(&self) -> Option<String> {
        self.to_query_string().key_value()
    }
}

impl<T: KeyParam + ?Sized> KeyParam for &T {
    fn key_value(&self) -> Option<String> {
        (**self).key_value()
    }
}

impl<T: KeyParam> KeyParam for Option<T> {
    fn key_value(&self) -> Option<String> {
        self.as_ref().and_then(KeyParam::key_value)
    }
}

#[derive(Debug, Clone)]
pub struct KeyBuilder {
    key: String,
}

impl KeyBuilder {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { key: prefix.into() }
    }

    /// Append an identifying segment, kept even when empty.
    pub fn segment(mut self, value: &str) -> Self {
        self.key.push(SEPARATOR);
        self.push_escaped(value);
        self
    }

    /// Append `name:value` unless the value is falsy.
    pub fn param(mut self, name: &str, value: impl KeyParam) -> Self {
        if let Some(value) = value.key_value() {
            self.key.push(SEPARATOR);
            self.key.push_str(name);
            self.key.push(SEPARATOR);
            self.push_escaped(&value);
        }
        self
    }

    fn push_escaped(&mut self, value: &str) {
        self.key.extend(url::form_urlencoded::byte_serialize(value.as_bytes()));
    }

    pub fn build(self) -> String {
        self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_follow_insertion_order() {
        let key = KeyBuilder::new("blog:staff")
            .param("before_id", "123")
            .param("tag", Some("art"))
            .build();
        insta::assert_snapshot!(key, @"blog:staff:before_id:123:tag:art");
    }

    #[test]
    fn falsy_params_are_skipped() {
        let key = KeyBuilder::new("blog:staff")
            .param("before_id", "")
            .param("tag", None::<String>)
            .param("page", 0_u64)
            .param("reblogs", false)
            .build();
        insta::assert_snapshot!(key, @"blog:staff");
    }

    #[test]
    fn identical_inputs_produce_identical_keys() {
        let build = || {
            KeyBuilder::new("blog:staff:search:cats")
                .param("page", 2_u64)
                .param("reblogs", true)
                .build()
        };
        assert_eq!(build(), build());
        insta::assert_snapshot!(build(), @"blog:staff:search:cats:page:2:reblogs:true");
    }

    #[test]
    fn separators_inside_values_are_escaped() {
        let forged = KeyBuilder::new("blog")
            .segment("staff")
            .segment("search")
            .segment("x:continuation:cursor=y")
            .build();
        let paged = KeyBuilder::new("blog")
            .segment("staff")
            .segment("search")
            .segment("x")
            .param("continuation", "cursor=y")
            .build();

        assert_ne!(forged, paged);
        insta::assert_snapshot!(forged, @"blog:staff:search:x%3Acontinuation%3Acursor%3Dy");
        insta::assert_snapshot!(paged, @"blog:staff:search:x:continuation:cursor%3Dy");
    }

    #[test]
    fn empty_cursor_is_skipped() {
        let key = KeyBuilder::new("blog:staff")
            .param("continuation", Cursor::default())
            .build();
        assert_eq!(key, "blog:staff");
    }
}
