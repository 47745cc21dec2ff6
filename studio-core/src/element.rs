//! Page elements - the media, text and QR items placed on a page.

use serde::{Deserialize, Deserializer, Serialize};

use crate::{EditorError, EditorResult, ElementId};

/// Largest volume an audio-capable element accepts.
pub const MAX_VOLUME: u8 = 100;

/// A point on the unscaled canvas, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Pixels from the left edge.
    pub x: f64,
    /// Pixels from the top edge.
    pub y: f64,
}

impl Position {
    /// Create a position.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Offset this position by a delta on both axes.
    #[must_use]
    pub fn offset(self, delta: Self) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y)
    }
}

/// Width and height on the unscaled canvas, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Size {
    /// Create a size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// How image and video content fills its box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fill {
    /// Cover the box, cropping overflow.
    #[default]
    Fill,
    /// Fit inside the box, letterboxing.
    Fit,
    /// Stretch to the box, ignoring aspect ratio.
    Stretch,
}

/// When an element animation plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationKind {
    /// On entering the page.
    Enter,
    /// While on the page.
    Emphasis,
    /// On leaving the page.
    Exit,
}

/// Animation effects available to elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub enum AnimationEffect {
    FadeIn,
    EnterLeft,
    EnterRight,
    EnterUp,
    EnterDown,
    RotateIn,
    FlipX,
    FlipY,
    Flip,
    ZoomIn,
    RollIn,
    SliceIn,
}

impl AnimationEffect {
    /// Every effect, in menu order.
    pub const ALL: [Self; 12] = [
        Self::FadeIn,
        Self::EnterLeft,
        Self::EnterRight,
        Self::EnterUp,
        Self::EnterDown,
        Self::RotateIn,
        Self::FlipX,
        Self::FlipY,
        Self::Flip,
        Self::ZoomIn,
        Self::RollIn,
        Self::SliceIn,
    ];
}

/// An element animation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    /// When the animation plays.
    #[serde(rename = "type")]
    pub kind: AnimationKind,
    /// Visual effect.
    pub effect: AnimationEffect,
    /// Duration in seconds.
    pub duration: f64,
}

/// Image content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageContent {
    /// Image source URL.
    pub src: String,
    /// Fill mode.
    pub fill: Fill,
}

/// Video content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoContent {
    /// Video source URL.
    pub src: String,
    /// Volume, 0 to 100.
    pub volume: u8,
    /// Fill mode.
    pub fill: Fill,
    /// Poster image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// Audio content. Audio has no visual footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioContent {
    /// Audio source URL.
    pub src: String,
    /// Volume, 0 to 100.
    pub volume: u8,
    /// Fade-in length in seconds.
    pub fade_in: f64,
    /// Fade-out length in seconds.
    pub fade_out: f64,
}

/// Text content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextContent {
    /// The text itself.
    pub content: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// CSS font weight, e.g. `600`.
    pub font_weight: String,
    /// Text color as hex.
    pub color: String,
    /// Band color as hex.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

/// QR code content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCodeContent {
    /// Encoded payload.
    pub data: String,
    /// Caption shown under the code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// The type of content an element contains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    /// A still image.
    Image(ImageContent),
    /// A video clip.
    Video(VideoContent),
    /// An audio track.
    Audio(AudioContent),
    /// A text label.
    Text(TextContent),
    /// A QR code.
    #[serde(rename = "qrcode")]
    QrCode(QrCodeContent),
}

impl ElementKind {
    /// The type tag of this content.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        match self {
            Self::Image(_) => ElementType::Image,
            Self::Video(_) => ElementType::Video,
            Self::Audio(_) => ElementType::Audio,
            Self::Text(_) => ElementType::Text,
            Self::QrCode(_) => ElementType::QrCode,
        }
    }
}

/// Element type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// Image element.
    Image,
    /// Video element.
    Video,
    /// Audio element.
    Audio,
    /// Text element.
    Text,
    /// QR code element.
    #[serde(rename = "qrcode")]
    QrCode,
}

impl ElementType {
    /// Whether elements of this type are drawn on the canvas.
    #[must_use]
    pub const fn is_visual(self) -> bool {
        !matches!(self, Self::Audio)
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Text => "text",
            Self::QrCode => "qrcode",
        }
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An element placed on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Unique identifier.
    pub id: ElementId,
    /// Display name.
    pub name: String,
    /// Top-left corner on the unscaled canvas.
    pub position: Position,
    /// Box size on the unscaled canvas.
    pub size: Size,
    /// Length on the timeline in seconds.
    pub duration: f64,
    /// Offset from the page start in seconds.
    pub start_time: f64,
    /// Whether `position`/`size` are authoritative instead of the page layout.
    pub free_position: bool,
    /// Optional animation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<Animation>,
    /// Variant content, tagged by `type`.
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl Element {
    /// Create a new element with a fresh id and layout-driven placement.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            id: ElementId::generate(),
            name: name.into(),
            position: Position::default(),
            size: Size::new(100.0, 100.0),
            duration: 10.0,
            start_time: 0.0,
            free_position: false,
            animation: None,
            kind,
        }
    }

    /// Set the id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<ElementId>) -> Self {
        self.id = id.into();
        self
    }

    /// Set position and size.
    #[must_use]
    pub fn with_frame(mut self, position: Position, size: Size) -> Self {
        self.position = position;
        self.size = size;
        self
    }

    /// Set start time and duration.
    #[must_use]
    pub fn with_timing(mut self, start_time: f64, duration: f64) -> Self {
        self.start_time = start_time;
        self.duration = duration;
        self
    }

    /// Set whether the element is freely positioned.
    #[must_use]
    pub fn with_free_position(mut self, free_position: bool) -> Self {
        self.free_position = free_position;
        self
    }

    /// Set the animation.
    #[must_use]
    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.animation = Some(animation);
        self
    }

    /// The type tag of this element.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    /// Whether this element is drawn on the canvas.
    #[must_use]
    pub const fn is_visual(&self) -> bool {
        self.element_type().is_visual()
    }

    /// End of the element's timeline window, in seconds.
    #[must_use]
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Whether the timeline cursor falls inside `[start_time, end_time)`.
    #[must_use]
    pub fn is_active_at(&self, seconds: f64) -> bool {
        seconds >= self.start_time && seconds < self.end_time()
    }

    /// Copy this element under a fresh id, suffixing the name and offsetting
    /// the position.
    #[must_use]
    pub fn duplicate(&self, offset: Position) -> Self {
        Self {
            id: ElementId::generate(),
            name: format!("{} (Copy)", self.name),
            position: self.position.offset(offset),
            ..self.clone()
        }
    }

    /// Copy this element under a fresh id, leaving everything else untouched.
    #[must_use]
    pub fn with_fresh_id(&self) -> Self {
        Self {
            id: ElementId::generate(),
            ..self.clone()
        }
    }
}

/// Deserialize a present-but-possibly-null field as `Some(value_or_none)`.
///
/// Combined with `#[serde(default)]`, an absent field stays `None` and an
/// explicit `null` becomes `Some(None)`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Partial update for an element.
///
/// Id and type are not representable, so a patch can never change them.
/// Nullable fields use `Some(None)` to clear the value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[allow(missing_docs)]
pub struct ElementPatch {
    pub name: Option<String>,
    pub position: Option<Position>,
    pub size: Option<Size>,
    pub duration: Option<f64>,
    pub start_time: Option<f64>,
    pub free_position: Option<bool>,
    #[serde(default, deserialize_with = "nullable")]
    pub animation: Option<Option<Animation>>,

    pub src: Option<String>,
    pub fill: Option<Fill>,
    pub volume: Option<u8>,
    #[serde(default, deserialize_with = "nullable")]
    pub thumbnail: Option<Option<String>>,
    pub fade_in: Option<f64>,
    pub fade_out: Option<f64>,
    pub content: Option<String>,
    pub font_size: Option<f64>,
    pub font_weight: Option<String>,
    pub color: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub background_color: Option<Option<String>>,
    pub data: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub title: Option<Option<String>>,
}

impl ElementPatch {
    /// Patch that moves an element.
    #[must_use]
    pub fn position(position: Position) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    /// Variant-specific fields present in this patch.
    fn variant_fields(&self) -> impl Iterator<Item = &'static str> {
        [
            ("src", self.src.is_some()),
            ("fill", self.fill.is_some()),
            ("volume", self.volume.is_some()),
            ("thumbnail", self.thumbnail.is_some()),
            ("fadeIn", self.fade_in.is_some()),
            ("fadeOut", self.fade_out.is_some()),
            ("content", self.content.is_some()),
            ("fontSize", self.font_size.is_some()),
            ("fontWeight", self.font_weight.is_some()),
            ("color", self.color.is_some()),
            ("backgroundColor", self.background_color.is_some()),
            ("data", self.data.is_some()),
            ("title", self.title.is_some()),
        ]
        .into_iter()
        .filter_map(|(field, present)| present.then_some(field))
    }

    /// Check that every field in this patch exists on the given variant.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::FieldNotApplicable`] for the first foreign field.
    pub fn validate_for(&self, kind: ElementType) -> EditorResult<()> {
        let allowed: &[&str] = match kind {
            ElementType::Image => &["src", "fill"],
            ElementType::Video => &["src", "volume", "fill", "thumbnail"],
            ElementType::Audio => &["src", "volume", "fadeIn", "fadeOut"],
            ElementType::Text => &["content", "fontSize", "fontWeight", "color", "backgroundColor"],
            ElementType::QrCode => &["data", "title"],
        };
        match self.variant_fields().find(|field| !allowed.contains(field)) {
            Some(field) => Err(EditorError::FieldNotApplicable { field, kind }),
            None => Ok(()),
        }
    }

    /// Merge this patch into an element.
    ///
    /// Either every field is applied or, on error, none is.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::FieldNotApplicable`] if the patch carries a
    /// field the element's variant lacks.
    pub fn apply_to(&self, element: &mut Element) -> EditorResult<()> {
        self.validate_for(element.element_type())?;
        let patch = self.clone();

        if let Some(name) = patch.name {
            element.name = name;
        }
        if let Some(position) = patch.position {
            element.position = position;
        }
        if let Some(size) = patch.size {
            element.size = size;
        }
        if let Some(duration) = patch.duration {
            element.duration = duration;
        }
        if let Some(start_time) = patch.start_time {
            element.start_time = start_time;
        }
        if let Some(free_position) = patch.free_position {
            element.free_position = free_position;
        }
        if let Some(animation) = patch.animation {
            element.animation = animation;
        }
        let volume = patch.volume.map(|v| v.min(MAX_VOLUME));

        match &mut element.kind {
            ElementKind::Image(image) => {
                set(&mut image.src, patch.src);
                set(&mut image.fill, patch.fill);
            }
            ElementKind::Video(video) => {
                set(&mut video.src, patch.src);
                set(&mut video.volume, volume);
                set(&mut video.fill, patch.fill);
                set(&mut video.thumbnail, patch.thumbnail);
            }
            ElementKind::Audio(audio) => {
                set(&mut audio.src, patch.src);
                set(&mut audio.volume, volume);
                set(&mut audio.fade_in, patch.fade_in);
                set(&mut audio.fade_out, patch.fade_out);
            }
            ElementKind::Text(text) => {
                set(&mut text.content, patch.content);
                set(&mut text.font_size, patch.font_size);
                set(&mut text.font_weight, patch.font_weight);
                set(&mut text.color, patch.color);
                set(&mut text.background_color, patch.background_color);
            }
            ElementKind::QrCode(qr) => {
                set(&mut qr.data, patch.data);
                set(&mut qr.title, patch.title);
            }
        }
        Ok(())
    }
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}
