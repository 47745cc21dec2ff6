//! Canvas arrangement - where each element of a page is drawn.
//!
//! Pure function of a page: the store never consults it, so layout changes
//! cannot reorder or drop elements.

use serde::{Deserialize, Serialize};

use crate::{Element, ElementId, ElementKind, Layout, Page, Position, Size};

/// Axis-aligned rectangle on the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Rect {
    /// Create a rectangle from position and size.
    #[must_use]
    pub const fn new(position: Position, size: Size) -> Self {
        Self {
            x: position.x,
            y: position.y,
            width: size.width,
            height: size.height,
        }
    }

    /// Check if a point is within this rectangle.
    #[must_use]
    pub fn contains(&self, point: Position) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    /// Multiply every coordinate by `scale`.
    #[must_use]
    pub fn scaled(&self, scale: f64) -> Self {
        Self {
            x: self.x * scale,
            y: self.y * scale,
            width: self.width * scale,
            height: self.height * scale,
        }
    }
}

impl Layout {
    /// Pane rectangles this layout divides the canvas into.
    ///
    /// Only the two-pane splits subdivide; every other layout draws on a
    /// single full-canvas pane.
    #[must_use]
    pub fn panes(self, canvas: Size) -> Vec<Rect> {
        let half_w = canvas.width / 2.0;
        let half_h = canvas.height / 2.0;
        match self {
            Self::TwoHorizontal => vec![
                Rect::new(Position::new(0.0, 0.0), Size::new(half_w, canvas.height)),
                Rect::new(Position::new(half_w, 0.0), Size::new(half_w, canvas.height)),
            ],
            Self::TwoVertical => vec![
                Rect::new(Position::new(0.0, 0.0), Size::new(canvas.width, half_h)),
                Rect::new(Position::new(0.0, half_h), Size::new(canvas.width, half_h)),
            ],
            Self::Single | Self::SingleVertical | Self::TwoToOneVertical | Self::Grid => {
                vec![Rect::new(Position::default(), canvas)]
            }
        }
    }
}

/// How an element got its rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "slot", content = "index", rename_all = "lowercase")]
pub enum Slot {
    /// Fills the layout pane with this index.
    Pane(usize),
    /// Own position and size.
    Free,
    /// Bottom overlay band.
    Overlay,
}

/// One drawn element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// The element drawn.
    pub element_id: ElementId,
    /// How it was placed.
    pub slot: Slot,
    /// Unscaled rectangle.
    pub rect: Rect,
}

/// The drawable arrangement of one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasArrangement {
    /// Display scale (`zoom / 100`).
    pub scale: f64,
    /// Placements in draw order, last on top.
    pub placements: Vec<Placement>,
    /// Elements a split layout has no pane left for.
    pub unplaced: Vec<ElementId>,
}

impl CanvasArrangement {
    /// Arrange a page on a canvas of the given unscaled size.
    #[must_use]
    pub fn of(page: &Page, canvas: Size, zoom: u32) -> Self {
        let panes = page.layout.panes(canvas);
        let single_pane = panes.len() == 1;
        let mut next_pane = 0;
        let mut placements = Vec::new();
        let mut overlays = Vec::new();
        let mut unplaced = Vec::new();

        for element in page.elements.iter().filter(|e| e.is_visual()) {
            if is_overlay_text(element) {
                let height = element.size.height;
                overlays.push(Placement {
                    element_id: element.id.clone(),
                    slot: Slot::Overlay,
                    rect: Rect::new(
                        Position::new(0.0, canvas.height - height),
                        Size::new(canvas.width, height),
                    ),
                });
            } else if !single_pane {
                // Split layouts show their first two elements, free or not.
                if let Some(rect) = panes.get(next_pane) {
                    placements.push(Placement {
                        element_id: element.id.clone(),
                        slot: Slot::Pane(next_pane),
                        rect: *rect,
                    });
                    next_pane += 1;
                } else {
                    unplaced.push(element.id.clone());
                }
            } else if element.free_position {
                placements.push(Placement {
                    element_id: element.id.clone(),
                    slot: Slot::Free,
                    rect: Rect::new(element.position, element.size),
                });
            } else {
                placements.push(Placement {
                    element_id: element.id.clone(),
                    slot: Slot::Pane(0),
                    rect: panes[0],
                });
            }
        }
        placements.extend(overlays);

        Self {
            scale: f64::from(zoom) / 100.0,
            placements,
            unplaced,
        }
    }

    /// Topmost element under a point in unscaled canvas coordinates.
    #[must_use]
    pub fn hit_test(&self, point: Position) -> Option<&ElementId> {
        self.placements
            .iter()
            .rev()
            .find(|p| p.rect.contains(point))
            .map(|p| &p.element_id)
    }

    /// Placement of a specific element.
    #[must_use]
    pub fn placement(&self, id: &ElementId) -> Option<&Placement> {
        self.placements.iter().find(|p| &p.element_id == id)
    }
}

/// Text that is not freely positioned renders as the bottom band.
#[must_use]
pub fn is_overlay_text(element: &Element) -> bool {
    matches!(element.kind, ElementKind::Text(_)) && !element.free_position
}
