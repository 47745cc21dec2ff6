//! Selection and navigation protocol.
//!
//! ```text
//!   set_current_page / add_page / delete current ──► Viewing(page)
//!            ▲                                          │
//!            │ delete selected / click empty canvas     │ add_element / click element
//!            │                                          ▼
//!            └──────────────────────────────── Editing(page, element)
//! ```
//!
//! Selection is page-scoped: no transition keeps an element selected across
//! a page switch.

use crate::element::{AudioContent, ImageContent, VideoContent};
use crate::{Element, ElementKind, Page};

/// What the user is currently focused on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection<'a> {
    /// A page with nothing selected.
    Viewing(&'a Page),
    /// A page with one of its elements selected.
    Editing(&'a Page, &'a Element),
}

impl<'a> Selection<'a> {
    /// Resolve a selection from a page and an optional selected element.
    ///
    /// A selected id that does not live on the page resolves to `Viewing`.
    #[must_use]
    pub fn resolve(page: &'a Page, selected: Option<&crate::ElementId>) -> Self {
        match selected.and_then(|id| page.element(id)) {
            Some(element) => Self::Editing(page, element),
            None => Self::Viewing(page),
        }
    }

    /// The page in focus.
    #[must_use]
    pub const fn page(&self) -> &'a Page {
        match *self {
            Self::Viewing(page) | Self::Editing(page, _) => page,
        }
    }

    /// The selected element, if any.
    #[must_use]
    pub const fn element(&self) -> Option<&'a Element> {
        match *self {
            Self::Viewing(_) => None,
            Self::Editing(_, element) => Some(element),
        }
    }

    /// The property form to show for this selection.
    #[must_use]
    pub fn property_panel(&self) -> PropertyPanel<'a> {
        match *self {
            Self::Viewing(page) => PropertyPanel::Page(page),
            Self::Editing(_, element) => match &element.kind {
                ElementKind::Image(image) => PropertyPanel::Image(element, image),
                ElementKind::Video(video) => PropertyPanel::Video(element, video),
                ElementKind::Audio(audio) => PropertyPanel::Audio(element, audio),
                ElementKind::Text(_) | ElementKind::QrCode(_) => PropertyPanel::Default(element),
            },
        }
    }
}

/// Right-hand property form, a pure function of the selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyPanel<'a> {
    /// Layout, background, duration and page animation.
    Page(&'a Page),
    /// Image form.
    Image(&'a Element, &'a ImageContent),
    /// Video form: volume, fill, free position.
    Video(&'a Element, &'a VideoContent),
    /// Audio form: volume and fades.
    Audio(&'a Element, &'a AudioContent),
    /// Generic form for types without a dedicated editor.
    Default(&'a Element),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{QrCodeContent, VideoContent};
    use crate::{ElementId, Fill};

    fn page_with(elements: Vec<Element>) -> Page {
        Page::new("Page 1", 180.0, "#FCFAFF").with_elements(elements)
    }

    #[test]
    fn test_no_selection_shows_page_properties() {
        let page = page_with(vec![]);
        let selection = Selection::resolve(&page, None);
        assert!(matches!(selection.property_panel(), PropertyPanel::Page(_)));
        assert!(selection.element().is_none());
    }

    #[test]
    fn test_foreign_id_resolves_to_viewing() {
        let page = page_with(vec![]);
        let stray = ElementId::from("elsewhere");
        assert!(matches!(Selection::resolve(&page, Some(&stray)), Selection::Viewing(_)));
    }

    #[test]
    fn test_panel_dispatches_on_type_with_default_fallback() {
        let video = Element::new(
            "Video.mp4",
            ElementKind::Video(VideoContent {
                src: "v.mp4".into(),
                volume: 75,
                fill: Fill::Fill,
                thumbnail: None,
            }),
        );
        let qr = Element::new(
            "QR Code",
            ElementKind::QrCode(QrCodeContent {
                data: "x".into(),
                title: Some("Title Goes There".into()),
            }),
        );
        let page = page_with(vec![video.clone(), qr.clone()]);

        let panel = Selection::resolve(&page, Some(&video.id)).property_panel();
        assert!(matches!(panel, PropertyPanel::Video(e, v) if e.id == video.id && v.volume == 75));

        let panel = Selection::resolve(&page, Some(&qr.id)).property_panel();
        assert!(matches!(panel, PropertyPanel::Default(e) if e.id == qr.id));
    }
}
