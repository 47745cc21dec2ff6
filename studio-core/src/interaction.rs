//! Canvas pointer interaction.
//!
//! Acquire-move-release: a press on a free-positioned element captures the
//! pointer offset inside it, every move while dragging issues one
//! `update_element`, and release or leave ends the drag. Pointer coordinates
//! are screen pixels; element positions are unscaled canvas units.

use crate::store::EditorStore;
use crate::{EditorError, EditorResult, ElementId, ElementPatch, PageId, Position};

/// Drag state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum DragState {
    /// No drag in progress.
    Idle,
    /// Dragging a free element.
    Dragging {
        /// Page holding the element.
        page_id: PageId,
        /// Element being moved.
        element_id: ElementId,
        /// Pointer offset from the element's top-left corner, screen pixels.
        offset: Position,
    },
}

/// Drives element selection and repositioning from pointer events.
#[derive(Debug, Clone)]
pub struct DragController {
    store: EditorStore,
    canvas_origin: Position,
    state: DragState,
}

impl DragController {
    /// Create a controller for a canvas whose top-left corner sits at
    /// `canvas_origin` on screen.
    #[must_use]
    pub fn new(store: EditorStore, canvas_origin: Position) -> Self {
        Self {
            store,
            canvas_origin,
            state: DragState::Idle,
        }
    }

    /// Current drag state.
    #[must_use]
    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Move the canvas on screen (scroll, resize).
    pub fn set_canvas_origin(&mut self, origin: Position) {
        self.canvas_origin = origin;
    }

    /// Pointer down on an element whose box starts at `element_origin` on
    /// screen. Selects it; free-positioned elements also start a drag.
    ///
    /// # Errors
    ///
    /// Propagates the selection error for an element not on the current page.
    pub fn press(
        &mut self,
        element_id: &ElementId,
        pointer: Position,
        element_origin: Position,
    ) -> EditorResult<()> {
        self.store.set_selected_element(Some(element_id))?;
        let state = self.store.snapshot();
        let free = state
            .current_page()
            .and_then(|p| p.element(element_id))
            .is_some_and(|e| e.free_position);
        if free {
            self.state = DragState::Dragging {
                page_id: state.current_page_id().clone(),
                element_id: element_id.clone(),
                offset: Position::new(pointer.x - element_origin.x, pointer.y - element_origin.y),
            };
            tracing::debug!(element_id = %element_id, "Drag started");
        }
        Ok(())
    }

    /// Pointer down anywhere on the canvas.
    ///
    /// Hits the topmost drawn element under the pointer and presses it; a
    /// press on empty canvas clears the selection. Returns the element hit.
    pub fn press_at(&mut self, pointer: Position) -> Option<ElementId> {
        let state = self.store.snapshot();
        let arrangement = state.canvas_arrangement(self.store.config().canvas_size)?;
        let scale = arrangement.scale;
        let local = self.to_canvas(pointer, scale);

        let Some(placement) = arrangement
            .hit_test(local)
            .and_then(|id| arrangement.placement(id))
        else {
            self.click_empty();
            return None;
        };
        let rect = placement.rect.scaled(scale);
        let origin = Position::new(self.canvas_origin.x + rect.x, self.canvas_origin.y + rect.y);
        let id = placement.element_id.clone();
        match self.press(&id, pointer, origin) {
            Ok(()) => Some(id),
            Err(e) => {
                tracing::debug!(element_id = %id, error = %e, "Press ignored");
                None
            }
        }
    }

    /// Pointer moved. While dragging, moves the element under the pointer
    /// and returns its new position.
    pub fn move_to(&mut self, pointer: Position) -> Option<Position> {
        let DragState::Dragging {
            page_id,
            element_id,
            offset,
        } = &self.state
        else {
            return None;
        };
        let scale = self.store.snapshot().scale();
        let position = Position::new(
            ((pointer.x - self.canvas_origin.x - offset.x) / scale).max(0.0),
            ((pointer.y - self.canvas_origin.y - offset.y) / scale).max(0.0),
        );
        match self
            .store
            .update_element(page_id, element_id, ElementPatch::position(position))
        {
            Ok(()) => Some(position),
            Err(e) => {
                // The element went away underneath the drag.
                tracing::debug!(error = %e, "Drag target lost");
                if matches!(e, EditorError::ElementNotFound(_) | EditorError::PageNotFound(_)) {
                    self.state = DragState::Idle;
                }
                None
            }
        }
    }

    /// Pointer released.
    pub fn release(&mut self) {
        if self.is_dragging() {
            tracing::debug!("Drag ended");
        }
        self.state = DragState::Idle;
    }

    /// Pointer left the canvas. Ends any drag like [`DragController::release`].
    pub fn leave(&mut self) {
        self.release();
    }

    /// Click on empty canvas: back to viewing the page.
    pub fn click_empty(&mut self) {
        self.state = DragState::Idle;
        if let Err(e) = self.store.set_selected_element(None) {
            tracing::debug!(error = %e, "Clear selection failed");
        }
    }

    fn to_canvas(&self, pointer: Position, scale: f64) -> Position {
        Position::new(
            (pointer.x - self.canvas_origin.x) / scale,
            (pointer.y - self.canvas_origin.y) / scale,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: Position = Position::new(40.0, 80.0);

    fn controller() -> (EditorStore, DragController) {
        let store = EditorStore::sample();
        (store.clone(), DragController::new(store, ORIGIN))
    }

    #[test]
    fn test_press_free_element_starts_drag() {
        let (store, mut drag) = controller();
        let qr = ElementId::from("el-1-2");
        // QR code at (350, 50), zoom 60 -> screen (40 + 210, 80 + 30).
        drag.press(&qr, Position::new(260.0, 120.0), Position::new(250.0, 110.0))
            .expect("press");
        assert!(drag.is_dragging());
        assert_eq!(store.snapshot().selected_element_id(), Some(&qr));
    }

    #[test]
    fn test_press_layout_element_selects_without_drag() {
        let (store, mut drag) = controller();
        let video = ElementId::from("el-1-1");
        drag.press(&video, Position::new(50.0, 90.0), ORIGIN).expect("press");
        assert!(!drag.is_dragging());
        assert_eq!(store.snapshot().selected_element_id(), Some(&video));
        assert_eq!(drag.move_to(Position::new(300.0, 300.0)), None);
    }

    #[test]
    fn test_move_converts_to_unscaled_and_clamps() {
        let (store, mut drag) = controller();
        let qr = ElementId::from("el-1-2");
        drag.press(&qr, Position::new(260.0, 120.0), Position::new(250.0, 110.0))
            .expect("press");

        // (100 - 40 - 10) / 0.6 = 83.33.., (140 - 80 - 10) / 0.6 = 83.33..
        let moved = drag.move_to(Position::new(100.0, 140.0)).expect("moved");
        assert!((moved.x - 50.0 / 0.6).abs() < 1e-9);
        assert!((moved.y - 50.0 / 0.6).abs() < 1e-9);

        let clamped = drag.move_to(Position::new(0.0, 0.0)).expect("moved");
        assert_eq!(clamped, Position::new(0.0, 0.0));
        let state = store.snapshot();
        let element = state.current_page().and_then(|p| p.element(&qr)).expect("qr");
        assert_eq!(element.position, Position::new(0.0, 0.0));

        drag.release();
        assert!(!drag.is_dragging());
        assert_eq!(drag.move_to(Position::new(200.0, 200.0)), None);
    }

    #[test]
    fn test_press_at_hits_overlay_band_then_empty_clears() {
        let (store, mut drag) = controller();
        // Bottom band: canvas y 300..360 at zoom 60 -> screen 80 + 180..216.
        let hit = drag.press_at(Position::new(60.0, 80.0 + 190.0));
        assert_eq!(hit, Some(ElementId::from("el-1-3")));
        assert_eq!(store.snapshot().selected_element_id(), Some(&ElementId::from("el-1-3")));

        drag.click_empty();
        assert!(store.snapshot().selected_element_id().is_none());
    }

    #[test]
    fn test_leave_ends_drag() {
        let (_, mut drag) = controller();
        drag.press(
            &ElementId::from("el-1-2"),
            Position::new(260.0, 120.0),
            Position::new(250.0, 110.0),
        )
        .expect("press");
        drag.leave();
        assert_eq!(drag.state(), &DragState::Idle);
    }
}
