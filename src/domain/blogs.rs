//! Blog metadata attached to feeds and posts.

use serde::{Deserialize, Serialize};

use crate::domain::blocks::MediaVariant;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blog {
    pub name: String,
    pub uuid: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub avatar: Vec<MediaVariant>,
    pub theme: Option<BlogTheme>,
    pub is_adult: bool,
}

impl Blog {
    /// Largest avatar variant, if the upstream sent any.
    pub fn largest_avatar(&self) -> Option<&MediaVariant> {
        self.avatar
            .iter()
            .max_by_key(|variant| variant.width.unwrap_or_default())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlogTheme {
    pub header_image: Option<String>,
    pub header_image_focused: Option<String>,
    pub avatar_shape: Option<String>,
    pub background_color: Option<String>,
    pub title_color: Option<String>,
    pub link_color: Option<String>,
    pub title_font: Option<String>,
    pub show_header_image: bool,
}
