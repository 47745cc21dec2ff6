//! Resources - uploaded or sample media that elements are created from.
//!
//! Elements copy what they need out of a resource by value. Nothing refers
//! back to the resource, so editing or deleting it never touches placed
//! elements.

use serde::{Deserialize, Serialize};

use crate::config::{EditorConfig, PlacementDefaults};
use crate::element::{AudioContent, Fill, ImageContent, VideoContent};
use crate::{EditorError, EditorResult, Element, ElementKind, Position, ResourceId, Size};

/// Media type of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Still image.
    Image,
    /// Video clip.
    Video,
    /// Audio track.
    Audio,
}

impl ResourceKind {
    /// Infer the kind from a MIME type such as `image/png`.
    #[must_use]
    pub fn from_mime(mime: &str) -> Option<Self> {
        if mime.starts_with("image/") {
            Some(Self::Image)
        } else if mime.starts_with("video/") {
            Some(Self::Video)
        } else if mime.starts_with("audio/") {
            Some(Self::Audio)
        } else {
            None
        }
    }
}

/// Resource panel filter tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceTab {
    /// Every resource.
    #[default]
    All,
    /// Images only.
    Image,
    /// Videos only.
    Video,
    /// Audio only.
    Audio,
}

impl ResourceTab {
    /// Whether a resource of this kind shows under the tab.
    #[must_use]
    pub const fn admits(self, kind: ResourceKind) -> bool {
        matches!(
            (self, kind),
            (Self::All, _)
                | (Self::Image, ResourceKind::Image)
                | (Self::Video, ResourceKind::Video)
                | (Self::Audio, ResourceKind::Audio)
        )
    }
}

/// A media asset in the resource library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Unique identifier.
    pub id: ResourceId,
    /// Media type.
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    /// Display name.
    pub name: String,
    /// Media URL.
    pub src: String,
    /// Preview image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Length in seconds, for time-based media.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl Resource {
    /// Create a resource with a fresh id.
    #[must_use]
    pub fn new(kind: ResourceKind, name: impl Into<String>, src: impl Into<String>) -> Self {
        Self {
            id: ResourceId::generate(),
            kind,
            name: name.into(),
            src: src.into(),
            thumbnail: None,
            duration: None,
        }
    }

    /// Set the id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<ResourceId>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the thumbnail.
    #[must_use]
    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }

    /// Set the duration.
    #[must_use]
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Wrap an uploaded file's local blob URL into a resource.
    ///
    /// Images and videos use the blob itself as their thumbnail.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::UnsupportedMediaType`] unless the MIME type is
    /// image, video or audio.
    pub fn from_upload(
        file_name: &str,
        mime: &str,
        blob_url: impl Into<String>,
        config: &EditorConfig,
    ) -> EditorResult<Self> {
        let kind = ResourceKind::from_mime(mime)
            .ok_or_else(|| EditorError::UnsupportedMediaType(mime.to_string()))?;
        let src = blob_url.into();
        let thumbnail = matches!(kind, ResourceKind::Image | ResourceKind::Video).then(|| src.clone());
        Ok(Self {
            id: ResourceId::generate(),
            kind,
            name: display_name(file_name, config.upload_name_limit),
            src,
            thumbnail,
            duration: None,
        })
    }

    /// Case-insensitive name search combined with the tab filter.
    #[must_use]
    pub fn matches(&self, query: &str, tab: ResourceTab) -> bool {
        tab.admits(self.kind) && self.name.to_lowercase().contains(&query.to_lowercase())
    }

    /// Instantiate a freely positioned element from this resource.
    #[must_use]
    pub fn to_element(&self, position: Position, defaults: &PlacementDefaults) -> Element {
        let (kind, size) = match self.kind {
            ResourceKind::Image => (
                ElementKind::Image(ImageContent {
                    src: self.src.clone(),
                    fill: Fill::Fill,
                }),
                defaults.size,
            ),
            ResourceKind::Video => (
                ElementKind::Video(VideoContent {
                    src: self.src.clone(),
                    volume: defaults.volume,
                    fill: Fill::Fill,
                    thumbnail: self.thumbnail.clone(),
                }),
                defaults.size,
            ),
            ResourceKind::Audio => (
                ElementKind::Audio(AudioContent {
                    src: self.src.clone(),
                    volume: defaults.volume,
                    fade_in: defaults.audio_fade_in,
                    fade_out: defaults.audio_fade_out,
                }),
                Size::default(),
            ),
        };
        Element::new(self.name.clone(), kind)
            .with_frame(position, size)
            .with_timing(
                0.0,
                self.duration
                    .filter(|d| *d > 0.0)
                    .unwrap_or(defaults.duration),
            )
            .with_free_position(true)
    }
}

/// Shorten a file name for the resource grid: names longer than `limit`
/// keep their first `limit - 3` characters followed by `...`.
#[must_use]
pub fn display_name(name: &str, limit: usize) -> String {
    if name.chars().count() > limit {
        let head: String = name.chars().take(limit.saturating_sub(3)).collect();
        format!("{head}...")
    } else {
        name.to_string()
    }
}
