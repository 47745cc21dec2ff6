//! Pages - timed canvas compositions that own their elements.

use serde::{Deserialize, Serialize};

use crate::element::nullable;
use crate::{Element, ElementId, PageId};

/// Canvas subdivision used to arrange non-free elements.
///
/// Purely a rendering hint: it never reorders or constrains a page's elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layout {
    /// Single pane, horizontal.
    #[default]
    #[serde(rename = "1:1")]
    Single,
    /// Single pane, vertical.
    #[serde(rename = "1:1-v")]
    SingleVertical,
    /// Two panes side by side.
    #[serde(rename = "2:1-h")]
    TwoHorizontal,
    /// Two panes stacked.
    #[serde(rename = "1:2-v")]
    TwoVertical,
    /// Two-to-one, vertical.
    #[serde(rename = "2:1-v")]
    TwoToOneVertical,
    /// Two by two grid.
    #[serde(rename = "2:2")]
    Grid,
}

impl Layout {
    /// Every layout, in menu order.
    pub const ALL: [Self; 6] = [
        Self::Single,
        Self::SingleVertical,
        Self::TwoHorizontal,
        Self::TwoVertical,
        Self::TwoToOneVertical,
        Self::Grid,
    ];

    /// Menu label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Single => "1:1 Horizontal",
            Self::SingleVertical => "1:1 Vertical",
            Self::TwoHorizontal => "2:1 Horizontal",
            Self::TwoVertical => "1:2 Vertical",
            Self::TwoToOneVertical => "2:1 Vertical",
            Self::Grid => "2:2",
        }
    }
}

/// A page-level fade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fade {
    /// Duration in seconds.
    pub duration: f64,
}

/// Page transition settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageAnimation {
    /// Fade applied when the page starts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fade_in: Option<Fade>,
    /// Fade applied when the page ends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fade_out: Option<Fade>,
}

/// A timed canvas composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Unique identifier.
    pub id: PageId,
    /// Display name.
    pub name: String,
    /// Length in seconds.
    pub duration: f64,
    /// Canvas background as hex.
    pub background_color: String,
    /// Arrangement of non-free elements.
    pub layout: Layout,
    /// Elements in display order.
    pub elements: Vec<Element>,
    /// Optional page transitions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<PageAnimation>,
}

impl Page {
    /// Create an empty page with a fresh id.
    #[must_use]
    pub fn new(name: impl Into<String>, duration: f64, background_color: impl Into<String>) -> Self {
        Self {
            id: PageId::generate(),
            name: name.into(),
            duration,
            background_color: background_color.into(),
            layout: Layout::default(),
            elements: Vec::new(),
            animation: None,
        }
    }

    /// Set the id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<PageId>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the layout.
    #[must_use]
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Set the elements.
    #[must_use]
    pub fn with_elements(mut self, elements: Vec<Element>) -> Self {
        self.elements = elements;
        self
    }

    /// Get an element by ID.
    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| &e.id == id)
    }

    /// Get a mutable reference to an element by ID.
    pub fn element_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| &e.id == id)
    }

    /// Check whether an element lives on this page.
    #[must_use]
    pub fn contains(&self, id: &ElementId) -> bool {
        self.element(id).is_some()
    }

    /// Deep copy under a fresh id. Every element gets a fresh id too, so no
    /// element identity is shared across pages.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            id: PageId::generate(),
            name: format!("{} (Copy)", self.name),
            elements: self.elements.iter().map(Element::with_fresh_id).collect(),
            ..self.clone()
        }
    }
}

/// Partial update for a page. Elements are untouched unless supplied.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[allow(missing_docs)]
pub struct PagePatch {
    pub name: Option<String>,
    pub duration: Option<f64>,
    pub background_color: Option<String>,
    pub layout: Option<Layout>,
    pub elements: Option<Vec<Element>>,
    #[serde(default, deserialize_with = "nullable")]
    pub animation: Option<Option<PageAnimation>>,
}

impl PagePatch {
    /// Patch that switches the layout.
    #[must_use]
    pub fn layout(layout: Layout) -> Self {
        Self {
            layout: Some(layout),
            ..Self::default()
        }
    }

    /// Shallow-merge this patch into a page.
    pub fn apply_to(self, page: &mut Page) {
        if let Some(name) = self.name {
            page.name = name;
        }
        if let Some(duration) = self.duration {
            page.duration = duration;
        }
        if let Some(background_color) = self.background_color {
            page.background_color = background_color;
        }
        if let Some(layout) = self.layout {
            page.layout = layout;
        }
        if let Some(elements) = self.elements {
            page.elements = elements;
        }
        if let Some(animation) = self.animation {
            page.animation = animation;
        }
    }
}
