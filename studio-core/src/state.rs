//! The editor state - one project and the UI cursor over it.
//!
//! Fields are private: [`crate::EditorStore`] is the only mutation path and
//! hands out immutable snapshots. Everything a UI surface reads is a derived
//! view computed from the snapshot.

use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::layout::{is_overlay_text, CanvasArrangement};
use crate::playback::{self, TimelineTrack};
use crate::selection::{PropertyPanel, Selection};
use crate::{
    EditorError, EditorResult, Element, ElementId, ElementType, Page, PageId, Resource,
    ResourceTab, Size,
};

/// Duration reported when the current page cannot be resolved.
pub const FALLBACK_DURATION: f64 = 180.0;

/// Left sidebar tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeftTab {
    /// Resource library and uploads.
    #[default]
    Upload,
    /// Element palette.
    Elements,
    /// Live sources.
    Live,
}

/// The complete editor state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct EditorState {
    pub(crate) project_name: String,
    pub(crate) project_date: String,
    pub(crate) pages: Vec<Page>,
    pub(crate) current_page_id: PageId,
    pub(crate) selected_element_id: Option<ElementId>,
    pub(crate) resources: Vec<Resource>,
    pub(crate) zoom: u32,
    pub(crate) timeline_position: f64,
    pub(crate) is_playing: bool,
    pub(crate) is_dark_mode: bool,
    pub(crate) active_left_tab: LeftTab,
    pub(crate) active_resource_tab: ResourceTab,
}

impl EditorState {
    /// Create a project with a single empty page.
    #[must_use]
    pub fn new(
        project_name: impl Into<String>,
        project_date: impl Into<String>,
        config: &EditorConfig,
    ) -> Self {
        let page = Page::new(
            "Page 1",
            config.default_page_duration,
            config.default_background.clone(),
        );
        Self::with_pages(project_name, project_date, vec![page], Vec::new(), config)
    }

    /// Create a project from pages and resources; the first page is current.
    ///
    /// `pages` must not be empty; use [`EditorState::validate`] when the
    /// input is untrusted.
    #[must_use]
    pub fn with_pages(
        project_name: impl Into<String>,
        project_date: impl Into<String>,
        pages: Vec<Page>,
        resources: Vec<Resource>,
        config: &EditorConfig,
    ) -> Self {
        let current_page_id = pages.first().map(|p| p.id.clone()).unwrap_or_else(PageId::generate);
        Self {
            project_name: project_name.into(),
            project_date: project_date.into(),
            pages,
            current_page_id,
            selected_element_id: None,
            resources,
            zoom: config.clamp_zoom(i64::from(config.initial_zoom)),
            timeline_position: 0.0,
            is_playing: false,
            is_dark_mode: false,
            active_left_tab: LeftTab::default(),
            active_resource_tab: ResourceTab::default(),
        }
    }

    /// Check every structural invariant of the project.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidState`] naming the first violation.
    pub fn validate(&self) -> EditorResult<()> {
        let invalid = |msg: String| Err(EditorError::InvalidState(msg));
        if self.pages.is_empty() {
            return invalid("project has no pages".into());
        }
        if self.page(&self.current_page_id).is_none() {
            return invalid(format!("current page {} does not exist", self.current_page_id));
        }
        if let Some(selected) = &self.selected_element_id {
            if self.selected_element().is_none() {
                return invalid(format!("selected element {selected} is not on the current page"));
            }
        }
        let mut seen = std::collections::HashSet::new();
        for page in &self.pages {
            if !seen.insert(page.id.as_str()) {
                return invalid(format!("duplicate page id {}", page.id));
            }
        }
        let mut seen = std::collections::HashSet::new();
        for element in self.pages.iter().flat_map(|p| &p.elements) {
            if !seen.insert(element.id.as_str()) {
                return invalid(format!("duplicate element id {}", element.id));
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Plain fields
    // -----------------------------------------------------------------------

    /// Project name.
    #[must_use]
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// Project date, `YYYY-MM-DD`.
    #[must_use]
    pub fn project_date(&self) -> &str {
        &self.project_date
    }

    /// Pages in display order.
    #[must_use]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// ID of the page being edited.
    #[must_use]
    pub fn current_page_id(&self) -> &PageId {
        &self.current_page_id
    }

    /// ID of the selected element.
    #[must_use]
    pub fn selected_element_id(&self) -> Option<&ElementId> {
        self.selected_element_id.as_ref()
    }

    /// Resource library in insertion order.
    #[must_use]
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// Zoom percentage.
    #[must_use]
    pub const fn zoom(&self) -> u32 {
        self.zoom
    }

    /// Canvas scale factor (`zoom / 100`).
    #[must_use]
    pub fn scale(&self) -> f64 {
        f64::from(self.zoom) / 100.0
    }

    /// Timeline cursor in seconds.
    #[must_use]
    pub const fn timeline_position(&self) -> f64 {
        self.timeline_position
    }

    /// Whether playback is running.
    #[must_use]
    pub const fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Whether the dark theme is active.
    #[must_use]
    pub const fn is_dark_mode(&self) -> bool {
        self.is_dark_mode
    }

    /// Active left sidebar tab.
    #[must_use]
    pub const fn active_left_tab(&self) -> LeftTab {
        self.active_left_tab
    }

    /// Active resource filter tab.
    #[must_use]
    pub const fn active_resource_tab(&self) -> ResourceTab {
        self.active_resource_tab
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    /// Get a page by ID.
    #[must_use]
    pub fn page(&self, id: &PageId) -> Option<&Page> {
        self.pages.iter().find(|p| &p.id == id)
    }

    pub(crate) fn page_mut(&mut self, id: &PageId) -> EditorResult<&mut Page> {
        self.pages
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| EditorError::PageNotFound(id.to_string()))
    }

    pub(crate) fn page_index(&self, id: &PageId) -> EditorResult<usize> {
        self.pages
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| EditorError::PageNotFound(id.to_string()))
    }

    /// Find the page holding an element.
    #[must_use]
    pub fn page_of(&self, element_id: &ElementId) -> Option<&Page> {
        self.pages.iter().find(|p| p.contains(element_id))
    }

    /// Get a resource by ID.
    #[must_use]
    pub fn resource(&self, id: &crate::ResourceId) -> Option<&Resource> {
        self.resources.iter().find(|r| &r.id == id)
    }

    // -----------------------------------------------------------------------
    // Derived views
    // -----------------------------------------------------------------------

    /// The page being edited.
    #[must_use]
    pub fn current_page(&self) -> Option<&Page> {
        self.page(&self.current_page_id)
    }

    /// Elements of the current page in display order.
    #[must_use]
    pub fn current_elements(&self) -> &[Element] {
        self.current_page().map_or(&[], |p| p.elements.as_slice())
    }

    /// Current page elements of one type.
    pub fn elements_of_type(&self, element_type: ElementType) -> impl Iterator<Item = &Element> {
        self.current_elements()
            .iter()
            .filter(move |e| e.element_type() == element_type)
    }

    /// Current page elements that are drawn on the canvas.
    pub fn visual_elements(&self) -> impl Iterator<Item = &Element> {
        self.current_elements().iter().filter(|e| e.is_visual())
    }

    /// Current page elements placed by their own position and size.
    pub fn free_elements(&self) -> impl Iterator<Item = &Element> {
        self.current_elements().iter().filter(|e| e.free_position)
    }

    /// Current page elements arranged by the page layout.
    pub fn layout_elements(&self) -> impl Iterator<Item = &Element> {
        self.current_elements().iter().filter(|e| !e.free_position)
    }

    /// Current page text rendered as the bottom overlay band.
    pub fn overlay_text_elements(&self) -> impl Iterator<Item = &Element> {
        self.current_elements()
            .iter()
            .filter(|e| is_overlay_text(e))
    }

    /// The selected element, resolved against the current page.
    #[must_use]
    pub fn selected_element(&self) -> Option<&Element> {
        self.selection().and_then(|s| s.element())
    }

    /// The selection state machine's current state.
    #[must_use]
    pub fn selection(&self) -> Option<Selection<'_>> {
        self.current_page()
            .map(|page| Selection::resolve(page, self.selected_element_id.as_ref()))
    }

    /// The property form for the current selection.
    #[must_use]
    pub fn property_panel(&self) -> Option<PropertyPanel<'_>> {
        self.selection().map(|s| s.property_panel())
    }

    /// Resources matching a name search under the active resource tab.
    #[must_use]
    pub fn filtered_resources(&self, query: &str) -> Vec<&Resource> {
        self.resources
            .iter()
            .filter(|r| r.matches(query, self.active_resource_tab))
            .collect()
    }

    /// Length of the current page in seconds.
    #[must_use]
    pub fn total_duration(&self) -> f64 {
        self.current_page().map_or(FALLBACK_DURATION, |p| p.duration)
    }

    /// Timeline rows for the current page.
    #[must_use]
    pub fn timeline_tracks(&self) -> Vec<TimelineTrack> {
        self.current_page().map_or_else(Vec::new, |page| {
            playback::timeline_tracks(
                page,
                self.timeline_position,
                self.selected_element_id.as_ref(),
            )
        })
    }

    /// Drawable arrangement of the current page.
    #[must_use]
    pub fn canvas_arrangement(&self, canvas: Size) -> Option<CanvasArrangement> {
        self.current_page()
            .map(|page| CanvasArrangement::of(page, canvas, self.zoom))
    }

    // -----------------------------------------------------------------------
    // Invariant upkeep used by the store
    // -----------------------------------------------------------------------

    /// Switch pages: selection never survives a page switch, and the cursor
    /// is kept inside the new page.
    pub(crate) fn switch_page(&mut self, id: PageId) {
        self.current_page_id = id;
        self.selected_element_id = None;
        self.clamp_timeline();
    }

    /// Drop a selection that no longer resolves on the current page.
    pub(crate) fn reconcile_selection(&mut self) {
        if self.selected_element_id.is_some() && self.selected_element().is_none() {
            self.selected_element_id = None;
        }
    }

    pub(crate) fn clamp_timeline(&mut self) {
        self.timeline_position = playback::clamp_position(self.timeline_position, self.total_duration());
    }
}
