//! Shared domain enumerations aligned with upstream post discriminators.

use serde::{Deserialize, Serialize};

/// Kind of a parsed timeline or blog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Text,
    Photo,
    Video,
    Audio,
    Link,
    Quote,
    Chat,
    Answer,
    Reblog,
}

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Text => "text",
            ItemKind::Photo => "photo",
            ItemKind::Video => "video",
            ItemKind::Audio => "audio",
            ItemKind::Link => "link",
            ItemKind::Quote => "quote",
            ItemKind::Chat => "chat",
            ItemKind::Answer => "answer",
            ItemKind::Reblog => "reblog",
        }
    }

    /// Map the upstream `originalType` value onto an item kind.
    ///
    /// Legacy post types are still reported there even though the body is
    /// always block content.
    pub fn from_original_type(value: &str) -> Option<Self> {
        match value {
            "regular" | "text" | "note" => Some(ItemKind::Text),
            "photo" => Some(ItemKind::Photo),
            "video" => Some(ItemKind::Video),
            "audio" => Some(ItemKind::Audio),
            "link" => Some(ItemKind::Link),
            "quote" => Some(ItemKind::Quote),
            "chat" | "conversation" => Some(ItemKind::Chat),
            "answer" => Some(ItemKind::Answer),
            _ => None,
        }
    }
}

impl TryFrom<&str> for ItemKind {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "text" => Ok(ItemKind::Text),
            "photo" => Ok(ItemKind::Photo),
            "video" => Ok(ItemKind::Video),
            "audio" => Ok(ItemKind::Audio),
            "link" => Ok(ItemKind::Link),
            "quote" => Ok(ItemKind::Quote),
            "chat" => Ok(ItemKind::Chat),
            "answer" => Ok(ItemKind::Answer),
            "reblog" => Ok(ItemKind::Reblog),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_str_round_trips_through_try_from() {
        for kind in [
            ItemKind::Text,
            ItemKind::Photo,
            ItemKind::Video,
            ItemKind::Audio,
            ItemKind::Link,
            ItemKind::Quote,
            ItemKind::Chat,
            ItemKind::Answer,
            ItemKind::Reblog,
        ] {
            assert_eq!(ItemKind::try_from(kind.as_str()), Ok(kind));
        }
    }

    #[test]
    fn legacy_original_types_map_to_text() {
        assert_eq!(ItemKind::from_original_type("regular"), Some(ItemKind::Text));
        assert_eq!(ItemKind::from_original_type("conversation"), Some(ItemKind::Chat));
        assert_eq!(ItemKind::from_original_type("blocks"), None);
    }
}
