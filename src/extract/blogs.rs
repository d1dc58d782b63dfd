//! Blog and media conversion from the raw intermediates.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::blocks::MediaVariant;
use crate::domain::blogs::{Blog, BlogTheme};

use super::raw::{RawBlog, RawMedia, RawTheme};

/// Parse a blog object; `None` when it is not an object or has no name.
pub fn parse_blog(raw: &Value) -> Option<Blog> {
    RawBlog::deserialize(raw).ok().and_then(RawBlog::into_blog)
}

impl RawBlog {
    pub(crate) fn into_blog(self) -> Option<Blog> {
        let name = self.name.filter(|name| !name.is_empty())?;
        Some(Blog {
            name,
            uuid: self.uuid,
            title: self.title,
            description: self.description,
            url: self.url,
            avatar: media_variants(self.avatar),
            theme: self.theme.map(RawTheme::into_theme),
            is_adult: self.is_adult.unwrap_or(false),
        })
    }
}

impl RawTheme {
    fn into_theme(self) -> BlogTheme {
        BlogTheme {
            header_image: self.header_image,
            header_image_focused: self.header_image_focused,
            avatar_shape: self.avatar_shape,
            background_color: self.background_color,
            title_color: self.title_color,
            link_color: self.link_color,
            title_font: self.title_font,
            show_header_image: self.show_header_image.unwrap_or(false),
        }
    }
}

impl RawMedia {
    pub(crate) fn into_variant(self) -> Option<MediaVariant> {
        let url = self.url.filter(|url| !url.is_empty())?;
        Some(MediaVariant {
            url,
            mime_type: self.mime_type,
            width: self.width,
            height: self.height,
            has_original_dimensions: self.has_original_dimensions.unwrap_or(false),
            cropped: self.cropped.unwrap_or(false),
        })
    }
}

/// Convert media entries, skipping those without a URL.
pub(crate) fn media_variants(raw: Vec<RawMedia>) -> Vec<MediaVariant> {
    raw.into_iter().filter_map(RawMedia::into_variant).collect()
}
