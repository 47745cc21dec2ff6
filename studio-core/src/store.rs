//! Shared editor store.
//!
//! [`EditorStore`] is the single mutation path for an [`EditorState`]. Every
//! action runs against a private copy of the current snapshot; if it succeeds
//! the copy replaces the snapshot and every subscriber is called with it
//! before the action returns. A failed action leaves the snapshot untouched
//! and notifies nobody.
//!
//! Actions are serialized by the store's write lock: there is one logical
//! writer at a time and readers only ever see complete snapshots.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::config::EditorConfig;
use crate::playback::{self, TickOutcome};
use crate::state::LeftTab;
use crate::{
    EditorError, EditorResult, EditorState, Element, ElementId, ElementPatch, Page, PageId,
    PagePatch, Resource, ResourceId, ResourceTab,
};

/// Callback invoked after every successful action with the action name and
/// the new snapshot.
pub type OnChangeCallback = Arc<dyn Fn(&str, &EditorState) + Send + Sync>;

/// Handle returned by [`EditorStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct StoreInner {
    state: RwLock<Arc<EditorState>>,
    subscribers: RwLock<Vec<(SubscriptionId, OnChangeCallback)>>,
    next_subscription: AtomicU64,
    config: EditorConfig,
}

/// Thread-safe editor store. Clones share the same state.
///
/// # Example
///
/// ```
/// use studio_core::EditorStore;
///
/// let store = EditorStore::sample();
/// let page = store.add_page();
/// assert_eq!(store.snapshot().current_page_id(), &page);
/// assert!(store.snapshot().selected_element_id().is_none());
/// ```
#[derive(Clone)]
pub struct EditorStore {
    inner: Arc<StoreInner>,
}

impl std::fmt::Debug for EditorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let subscribers = self
            .inner
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("EditorStore")
            .field("state", &self.snapshot())
            .field("subscribers", &subscribers)
            .finish_non_exhaustive()
    }
}

impl Default for EditorStore {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorStore {
    /// Create a store holding a blank project.
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        let state = EditorState::new("Untitled", "", &config);
        Self::from_parts(state, config)
    }

    /// Create a store holding the template project.
    #[must_use]
    pub fn sample() -> Self {
        let config = EditorConfig::default();
        Self::from_parts(EditorState::sample_with(&config), config)
    }

    /// Create a store around an existing project.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidState`] if the project breaks an editor
    /// invariant (no pages, dangling current page or selection, duplicate ids).
    pub fn with_state(state: EditorState, config: EditorConfig) -> EditorResult<Self> {
        state.validate()?;
        Ok(Self::from_parts(state, config))
    }

    fn from_parts(state: EditorState, config: EditorConfig) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(Arc::new(state)),
                subscribers: RwLock::new(Vec::new()),
                next_subscription: AtomicU64::new(0),
                config,
            }),
        }
    }

    /// The current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<EditorState> {
        let state = self
            .inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&state)
    }

    /// Store configuration.
    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.inner.config
    }

    /// Register a change callback.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&str, &EditorState) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.inner.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.inner
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(callback)));
        id
    }

    /// Remove a change callback. Returns whether it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self
            .inner
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = subscribers.len();
        subscribers.retain(|(sid, _)| *sid != id);
        subscribers.len() != before
    }

    /// Run `f` against a copy of the state and publish the copy on success.
    fn commit<T, F>(&self, action: &'static str, f: F) -> EditorResult<T>
    where
        F: FnOnce(&mut EditorState) -> EditorResult<T>,
    {
        let snapshot = {
            let mut slot = self
                .inner
                .state
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let mut next = EditorState::clone(&slot);
            match f(&mut next) {
                Ok(value) => {
                    let next = Arc::new(next);
                    *slot = Arc::clone(&next);
                    (next, value)
                }
                Err(e) => {
                    tracing::debug!(action, error = %e, "Editor action rejected");
                    return Err(e);
                }
            }
        };
        let (state, value) = snapshot;
        self.notify(action, &state);
        Ok(value)
    }

    /// Infallible variant of [`EditorStore::commit`].
    fn apply<T, F>(&self, action: &'static str, f: F) -> T
    where
        F: FnOnce(&mut EditorState) -> T,
    {
        let (state, value) = {
            let mut slot = self
                .inner
                .state
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let mut next = EditorState::clone(&slot);
            let value = f(&mut next);
            let next = Arc::new(next);
            *slot = Arc::clone(&next);
            (next, value)
        };
        self.notify(action, &state);
        value
    }

    /// Conditional variant of [`EditorStore::apply`]: `None` leaves the
    /// state untouched and notifies nobody.
    fn apply_if<T, F>(&self, action: &'static str, f: F) -> Option<T>
    where
        F: FnOnce(&mut EditorState) -> Option<T>,
    {
        let (state, value) = {
            let mut slot = self
                .inner
                .state
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let mut next = EditorState::clone(&slot);
            let value = f(&mut next)?;
            let next = Arc::new(next);
            *slot = Arc::clone(&next);
            (next, value)
        };
        self.notify(action, &state);
        Some(value)
    }

    fn notify(&self, action: &str, state: &EditorState) {
        let subscribers: Vec<OnChangeCallback> = self
            .inner
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        for callback in subscribers {
            callback(action, state);
        }
    }

    // -----------------------------------------------------------------------
    // Project
    // -----------------------------------------------------------------------

    /// Rename the project.
    pub fn set_project_name(&self, name: impl Into<String>) {
        let name = name.into();
        self.apply("set_project_name", |s| {
            tracing::debug!(name = %name, "Project renamed");
            s.project_name = name;
        });
    }

    /// Set the zoom percentage, clamped to the configured bounds.
    ///
    /// Returns the zoom actually applied.
    pub fn set_zoom(&self, zoom: i64) -> u32 {
        let zoom = self.inner.config.clamp_zoom(zoom);
        self.apply("set_zoom", |s| {
            tracing::debug!(zoom, "Zoom set");
            s.zoom = zoom;
            zoom
        })
    }

    /// Flip the theme. Returns the new value.
    pub fn toggle_dark_mode(&self) -> bool {
        self.apply("toggle_dark_mode", |s| {
            s.is_dark_mode = !s.is_dark_mode;
            s.is_dark_mode
        })
    }

    // -----------------------------------------------------------------------
    // Pages
    // -----------------------------------------------------------------------

    /// Append an empty page and make it current.
    pub fn add_page(&self) -> PageId {
        let config = &self.inner.config;
        self.apply("add_page", |s| {
            let page = Page::new(
                format!("Page {}", s.pages.len() + 1),
                config.default_page_duration,
                config.default_background.clone(),
            );
            let id = page.id.clone();
            s.pages.push(page);
            s.switch_page(id.clone());
            tracing::debug!(page_id = %id, "Page added");
            id
        })
    }

    /// Insert a deep copy right after `page_id` and make it current.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::PageNotFound`] if the page does not exist.
    pub fn duplicate_page(&self, page_id: &PageId) -> EditorResult<PageId> {
        self.commit("duplicate_page", |s| {
            let index = s.page_index(page_id)?;
            let copy = s.pages[index].duplicate();
            let id = copy.id.clone();
            s.pages.insert(index + 1, copy);
            s.switch_page(id.clone());
            tracing::debug!(source = %page_id, page_id = %id, "Page duplicated");
            Ok(id)
        })
    }

    /// Remove a page. The last remaining page is never removed.
    ///
    /// If the removed page was current, the first remaining page becomes
    /// current.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::PageNotFound`] if the page does not exist and
    /// [`EditorError::LastPage`] if it is the only page.
    pub fn delete_page(&self, page_id: &PageId) -> EditorResult<()> {
        self.commit("delete_page", |s| {
            let index = s.page_index(page_id)?;
            if s.pages.len() == 1 {
                return Err(EditorError::LastPage(page_id.to_string()));
            }
            s.pages.remove(index);
            if &s.current_page_id == page_id {
                let first = s.pages[0].id.clone();
                s.switch_page(first);
            }
            tracing::debug!(page_id = %page_id, remaining = s.pages.len(), "Page deleted");
            Ok(())
        })
    }

    /// Switch the current page. Selection is always cleared.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::PageNotFound`] if the page does not exist.
    pub fn set_current_page(&self, page_id: &PageId) -> EditorResult<()> {
        self.commit("set_current_page", |s| {
            s.page_index(page_id)?;
            s.switch_page(page_id.clone());
            tracing::debug!(page_id = %page_id, "Current page set");
            Ok(())
        })
    }

    /// Merge `patch` into a page.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::PageNotFound`] if the page does not exist and
    /// [`EditorError::DuplicateElementId`] if replacement elements reuse an
    /// id held by another page or by each other.
    pub fn update_page(&self, page_id: &PageId, patch: PagePatch) -> EditorResult<()> {
        self.commit("update_page", |s| {
            s.page_index(page_id)?;
            if let Some(elements) = &patch.elements {
                let mut seen = std::collections::HashSet::new();
                for element in elements {
                    let elsewhere = s
                        .pages
                        .iter()
                        .any(|p| &p.id != page_id && p.contains(&element.id));
                    if elsewhere || !seen.insert(element.id.as_str()) {
                        return Err(EditorError::DuplicateElementId(element.id.to_string()));
                    }
                }
            }
            patch.apply_to(s.page_mut(page_id)?);
            if &s.current_page_id == page_id {
                s.reconcile_selection();
                s.clamp_timeline();
            }
            tracing::debug!(page_id = %page_id, "Page updated");
            Ok(())
        })
    }

    // -----------------------------------------------------------------------
    // Elements
    // -----------------------------------------------------------------------

    /// Append an element to a page and select it.
    ///
    /// Adding to a page other than the current one switches to that page
    /// first, so the new selection always lives on the current page.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::PageNotFound`] if the page does not exist and
    /// [`EditorError::DuplicateElementId`] if the element id is already used.
    pub fn add_element(&self, page_id: &PageId, element: Element) -> EditorResult<ElementId> {
        self.commit("add_element", |s| insert_element(s, page_id, element))
    }

    /// Merge `patch` into an element.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::PageNotFound`] or
    /// [`EditorError::ElementNotFound`] for unknown ids, and
    /// [`EditorError::FieldNotApplicable`] if the patch carries a field the
    /// element's type lacks. Nothing is applied on error.
    pub fn update_element(
        &self,
        page_id: &PageId,
        element_id: &ElementId,
        patch: ElementPatch,
    ) -> EditorResult<()> {
        self.commit("update_element", |s| {
            let element = s
                .page_mut(page_id)?
                .element_mut(element_id)
                .ok_or_else(|| EditorError::ElementNotFound(element_id.to_string()))?;
            patch.apply_to(element)?;
            tracing::debug!(page_id = %page_id, element_id = %element_id, "Element updated");
            Ok(())
        })
    }

    /// Remove an element, clearing the selection if it was selected.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::PageNotFound`] or
    /// [`EditorError::ElementNotFound`] for unknown ids.
    pub fn delete_element(&self, page_id: &PageId, element_id: &ElementId) -> EditorResult<()> {
        self.commit("delete_element", |s| {
            let page = s.page_mut(page_id)?;
            let index = page
                .elements
                .iter()
                .position(|e| &e.id == element_id)
                .ok_or_else(|| EditorError::ElementNotFound(element_id.to_string()))?;
            page.elements.remove(index);
            if s.selected_element_id.as_ref() == Some(element_id) {
                s.selected_element_id = None;
            }
            tracing::debug!(page_id = %page_id, element_id = %element_id, "Element deleted");
            Ok(())
        })
    }

    /// Select an element of the current page, or clear the selection.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::ElementNotOnCurrentPage`] for an element of
    /// another page and [`EditorError::ElementNotFound`] for an unknown id.
    pub fn set_selected_element(&self, element_id: Option<&ElementId>) -> EditorResult<()> {
        self.commit("set_selected_element", |s| {
            if let Some(id) = element_id {
                if !s.current_page().is_some_and(|p| p.contains(id)) {
                    return Err(if s.page_of(id).is_some() {
                        EditorError::ElementNotOnCurrentPage(id.to_string())
                    } else {
                        EditorError::ElementNotFound(id.to_string())
                    });
                }
            }
            s.selected_element_id = element_id.cloned();
            tracing::debug!(element_id = ?element_id.map(ElementId::as_str), "Selection set");
            Ok(())
        })
    }

    /// Append a copy of an element to the same page and select it.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::PageNotFound`] or
    /// [`EditorError::ElementNotFound`] for unknown ids.
    pub fn duplicate_element(
        &self,
        page_id: &PageId,
        element_id: &ElementId,
    ) -> EditorResult<ElementId> {
        let offset = self.inner.config.duplicate_offset;
        self.commit("duplicate_element", |s| {
            let copy = s
                .page(page_id)
                .ok_or_else(|| EditorError::PageNotFound(page_id.to_string()))?
                .element(element_id)
                .ok_or_else(|| EditorError::ElementNotFound(element_id.to_string()))?
                .duplicate(offset);
            insert_element(s, page_id, copy)
        })
    }

    // -----------------------------------------------------------------------
    // Resources
    // -----------------------------------------------------------------------

    /// Append a resource to the library.
    pub fn add_resource(&self, resource: Resource) -> ResourceId {
        self.apply("add_resource", |s| {
            let id = resource.id.clone();
            tracing::debug!(resource_id = %id, kind = ?resource.kind, "Resource added");
            s.resources.push(resource);
            id
        })
    }

    /// Remove a resource. Elements created from it are unaffected.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::ResourceNotFound`] if it does not exist.
    pub fn delete_resource(&self, resource_id: &ResourceId) -> EditorResult<()> {
        self.commit("delete_resource", |s| {
            let index = s
                .resources
                .iter()
                .position(|r| &r.id == resource_id)
                .ok_or_else(|| EditorError::ResourceNotFound(resource_id.to_string()))?;
            s.resources.remove(index);
            tracing::debug!(resource_id = %resource_id, "Resource deleted");
            Ok(())
        })
    }

    // -----------------------------------------------------------------------
    // Timeline
    // -----------------------------------------------------------------------

    /// Set the cursor directly. Not clamped; see [`EditorStore::scrub_to`].
    pub fn set_timeline_position(&self, seconds: f64) {
        self.apply("set_timeline_position", |s| s.timeline_position = seconds);
    }

    /// Set the cursor from its previous value. Not clamped.
    pub fn update_timeline_position<F>(&self, f: F) -> f64
    where
        F: FnOnce(f64) -> f64,
    {
        self.apply("set_timeline_position", |s| {
            s.timeline_position = f(s.timeline_position);
            s.timeline_position
        })
    }

    /// Flip the playing flag. Returns the new value.
    pub fn toggle_play(&self) -> bool {
        self.apply("toggle_play", |s| {
            s.is_playing = !s.is_playing;
            tracing::debug!(playing = s.is_playing, position = s.timeline_position, "Playback toggled");
            s.is_playing
        })
    }

    /// Advance playback by one tick.
    ///
    /// Returns `None` without touching the state when playback is stopped.
    /// Reaching the end of the page stops playback and rewinds to 0.
    pub fn tick_playback(&self) -> Option<TickOutcome> {
        if !self.snapshot().is_playing {
            return None;
        }
        let quantum = self.inner.config.tick_quantum;
        self.apply_if("tick_playback", |s| {
            if !s.is_playing {
                return None;
            }
            let outcome = playback::advance(s.timeline_position, s.total_duration(), quantum);
            match outcome {
                TickOutcome::Advanced(position) => s.timeline_position = position,
                TickOutcome::Finished => {
                    s.is_playing = false;
                    s.timeline_position = 0.0;
                    tracing::debug!(page_id = %s.current_page_id, "Playback finished");
                }
            }
            Some(outcome)
        })
    }

    /// Move the cursor to `seconds`, clamped to the current page.
    ///
    /// Returns the position applied.
    pub fn scrub_to(&self, seconds: f64) -> f64 {
        self.apply("scrub_to", |s| {
            s.timeline_position = playback::clamp_position(seconds, s.total_duration());
            s.timeline_position
        })
    }

    /// Scrub from a pointer offset on the timeline ruler.
    pub fn scrub_from_pointer(&self, offset_px: f64, scroll_px: f64) -> f64 {
        let seconds =
            playback::pointer_to_seconds(offset_px, scroll_px, self.inner.config.pixels_per_second);
        self.scrub_to(seconds)
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Set the left sidebar tab.
    pub fn set_active_left_tab(&self, tab: LeftTab) {
        self.apply("set_active_left_tab", |s| s.active_left_tab = tab);
    }

    /// Set the resource filter tab.
    pub fn set_active_resource_tab(&self, tab: ResourceTab) {
        self.apply("set_active_resource_tab", |s| s.active_resource_tab = tab);
    }
}

fn insert_element(
    s: &mut EditorState,
    page_id: &PageId,
    element: Element,
) -> EditorResult<ElementId> {
    s.page_index(page_id)?;
    if s.page_of(&element.id).is_some() {
        return Err(EditorError::DuplicateElementId(element.id.to_string()));
    }
    if &s.current_page_id != page_id {
        s.switch_page(page_id.clone());
    }
    let id = element.id.clone();
    s.page_mut(page_id)?.elements.push(element);
    s.selected_element_id = Some(id.clone());
    tracing::debug!(page_id = %page_id, element_id = %id, "Element added");
    Ok(id)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::element::{ImageContent, TextContent};
    use crate::{ElementKind, Fill, Layout, Position};

    fn image() -> Element {
        Element::new(
            "Image.jpg",
            ElementKind::Image(ImageContent {
                src: "a.jpg".into(),
                fill: Fill::Fill,
            }),
        )
    }

    #[test]
    fn test_store_shared_across_clones() {
        let store = EditorStore::sample();
        let other = store.clone();
        store.set_project_name("Renamed");
        assert_eq!(other.snapshot().project_name(), "Renamed");
    }

    #[test]
    fn test_snapshots_are_immutable() {
        let store = EditorStore::sample();
        let before = store.snapshot();
        store.set_zoom(150);
        assert_eq!(before.zoom(), 60);
        assert_eq!(store.snapshot().zoom(), 150);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let store = EditorStore::default();
        assert_eq!(store.set_zoom(5), 10);
        assert_eq!(store.set_zoom(500), 200);
        assert_eq!(store.set_zoom(-40), 10);
    }

    #[test]
    fn test_subscribers_notified_on_success_only() {
        let store = EditorStore::sample();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let id = store.subscribe(move |_, _| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        store.toggle_dark_mode();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let missing = PageId::from("missing");
        assert!(store.set_current_page(&missing).is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert!(store.unsubscribe(id));
        store.toggle_dark_mode();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!store.unsubscribe(id));
    }

    #[test]
    fn test_subscriber_sees_new_state_and_action() {
        let store = EditorStore::sample();
        let seen = Arc::new(RwLock::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.subscribe(move |action, state| {
            sink.write()
                .expect("lock")
                .push((action.to_string(), state.zoom()));
        });
        store.set_zoom(80);
        let seen = seen.read().expect("lock");
        assert_eq!(seen.as_slice(), &[("set_zoom".to_string(), 80)]);
    }

    #[test]
    fn test_add_page_becomes_current_with_defaults() {
        let store = EditorStore::sample();
        let id = store.add_page();
        let state = store.snapshot();
        let page = state.current_page().expect("current page");
        assert_eq!(page.id, id);
        assert_eq!(page.name, "Page 4");
        assert!((page.duration - 180.0).abs() < f64::EPSILON);
        assert_eq!(page.layout, Layout::Single);
        assert!(page.elements.is_empty());
    }

    #[test]
    fn test_duplicate_page_inserts_after_source() {
        let store = EditorStore::sample();
        let source = PageId::from("page-1");
        let copy = store.duplicate_page(&source).expect("duplicate");
        let state = store.snapshot();
        assert_eq!(state.pages()[1].id, copy);
        assert_eq!(state.pages()[1].name, "Page 1 (Copy)");
        assert_eq!(state.current_page_id(), &copy);

        let original = state.page(&source).expect("source");
        for (a, b) in original.elements.iter().zip(&state.pages()[1].elements) {
            assert_ne!(a.id, b.id);
        }
        state.validate().expect("ids stay unique");
    }

    #[test]
    fn test_delete_page_guards() {
        let store = EditorStore::default();
        let only = store.snapshot().current_page_id().clone();
        assert!(matches!(store.delete_page(&only), Err(EditorError::LastPage(_))));
        assert!(matches!(
            store.delete_page(&PageId::from("ghost")),
            Err(EditorError::PageNotFound(_))
        ));
        assert_eq!(store.snapshot().pages().len(), 1);
    }

    #[test]
    fn test_delete_current_page_moves_to_first() {
        let store = EditorStore::sample();
        let third = PageId::from("page-3");
        store.set_current_page(&third).expect("switch");
        store.delete_page(&third).expect("delete");
        assert_eq!(store.snapshot().current_page_id(), &PageId::from("page-1"));
    }

    #[test]
    fn test_update_page_shallow_merge_keeps_elements() {
        let store = EditorStore::sample();
        let page = PageId::from("page-1");
        store
            .update_page(&page, PagePatch::layout(Layout::Grid))
            .expect("update");
        let state = store.snapshot();
        let page = state.page(&page).expect("page");
        assert_eq!(page.layout, Layout::Grid);
        assert_eq!(page.elements.len(), 4);
    }

    #[test]
    fn test_update_page_replacing_elements_drops_stale_selection() {
        let store = EditorStore::sample();
        let page = PageId::from("page-1");
        store
            .set_selected_element(Some(&ElementId::from("el-1-1")))
            .expect("select");
        let patch = PagePatch {
            elements: Some(Vec::new()),
            ..PagePatch::default()
        };
        store.update_page(&page, patch).expect("update");
        assert!(store.snapshot().selected_element_id().is_none());
    }

    #[test]
    fn test_add_element_to_other_page_switches_to_it() {
        let store = EditorStore::sample();
        let page2 = PageId::from("page-2");
        let id = store.add_element(&page2, image()).expect("add");
        let state = store.snapshot();
        assert_eq!(state.current_page_id(), &page2);
        assert_eq!(state.selected_element_id(), Some(&id));
    }

    #[test]
    fn test_add_element_rejects_duplicate_id() {
        let store = EditorStore::sample();
        let clash = image().with_id("el-2-1");
        assert!(matches!(
            store.add_element(&PageId::from("page-1"), clash),
            Err(EditorError::DuplicateElementId(_))
        ));
    }

    #[test]
    fn test_update_element_rejects_foreign_field() {
        let store = EditorStore::sample();
        let before = store.snapshot();
        let patch = ElementPatch {
            content: Some("nope".into()),
            ..ElementPatch::default()
        };
        let result = store.update_element(
            &PageId::from("page-1"),
            &ElementId::from("el-1-1"),
            patch,
        );
        assert!(matches!(result, Err(EditorError::FieldNotApplicable { .. })));
        assert_eq!(*store.snapshot(), *before);
    }

    #[test]
    fn test_update_element_text_content() {
        let store = EditorStore::sample();
        let page = PageId::from("page-1");
        let id = ElementId::from("el-1-3");
        let patch = ElementPatch {
            content: Some("Hello".into()),
            ..ElementPatch::default()
        };
        store.update_element(&page, &id, patch).expect("update");
        let state = store.snapshot();
        let element = state.page(&page).and_then(|p| p.element(&id)).expect("element");
        assert!(matches!(
            &element.kind,
            ElementKind::Text(TextContent { content, .. }) if content == "Hello"
        ));
    }

    #[test]
    fn test_delete_selected_element_clears_selection() {
        let store = EditorStore::sample();
        let page = PageId::from("page-1");
        let id = ElementId::from("el-1-2");
        store.set_selected_element(Some(&id)).expect("select");
        store.delete_element(&page, &id).expect("delete");
        let state = store.snapshot();
        assert!(state.selected_element_id().is_none());
        assert_eq!(state.current_elements().len(), 3);
    }

    #[test]
    fn test_select_validates_page_membership() {
        let store = EditorStore::sample();
        assert!(matches!(
            store.set_selected_element(Some(&ElementId::from("el-2-1"))),
            Err(EditorError::ElementNotOnCurrentPage(_))
        ));
        assert!(matches!(
            store.set_selected_element(Some(&ElementId::from("ghost"))),
            Err(EditorError::ElementNotFound(_))
        ));
        store.set_selected_element(None).expect("clear");
    }

    #[test]
    fn test_duplicate_element_offsets_and_selects() {
        let store = EditorStore::sample();
        let page = PageId::from("page-1");
        let source = ElementId::from("el-1-2");
        let copy = store.duplicate_element(&page, &source).expect("duplicate");

        let state = store.snapshot();
        let elements = state.current_elements();
        let last = elements.last().expect("copy appended");
        assert_eq!(last.id, copy);
        assert_eq!(last.name, "QR Code (Copy)");
        assert_eq!(last.position, Position::new(370.0, 70.0));
        assert_eq!(state.selected_element_id(), Some(&copy));
    }

    #[test]
    fn test_delete_resource_reports_missing() {
        let store = EditorStore::sample();
        store.delete_resource(&ResourceId::from("res-1")).expect("delete");
        assert!(matches!(
            store.delete_resource(&ResourceId::from("res-1")),
            Err(EditorError::ResourceNotFound(_))
        ));
        assert_eq!(store.snapshot().resources().len(), 7);
    }

    #[test]
    fn test_timeline_setters_do_not_clamp() {
        let store = EditorStore::sample();
        store.set_timeline_position(500.0);
        assert!((store.snapshot().timeline_position() - 500.0).abs() < f64::EPSILON);
        let next = store.update_timeline_position(|p| p - 600.0);
        assert!((next + 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_scrub_clamps_to_page() {
        let store = EditorStore::sample();
        assert!((store.scrub_to(200.0) - 180.0).abs() < f64::EPSILON);
        assert!(store.scrub_to(-3.0).abs() < f64::EPSILON);
        assert!((store.scrub_from_pointer(250.0, 50.0) - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tick_only_while_playing() {
        let store = EditorStore::sample();
        assert_eq!(store.tick_playback(), None);
        assert!(store.toggle_play());
        assert!(matches!(store.tick_playback(), Some(TickOutcome::Advanced(_))));
    }

    #[test]
    fn test_tick_while_stopped_is_silent() {
        let store = EditorStore::sample();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        store.subscribe(move |_, _| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        let before = store.snapshot();

        assert_eq!(store.tick_playback(), None);
        assert_eq!(store.apply_if("tick_playback", |_| None::<()>), None);
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert_eq!(store.apply_if("rename", |s| {
            s.project_name = "Renamed".into();
            Some(())
        }), Some(()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_tick_at_end_stops_and_rewinds() {
        let store = EditorStore::sample();
        store.set_timeline_position(180.0 - 0.05);
        store.toggle_play();
        assert_eq!(store.tick_playback(), Some(TickOutcome::Finished));
        let state = store.snapshot();
        assert!(!state.is_playing());
        assert!(state.timeline_position().abs() < f64::EPSILON);
    }

    #[test]
    fn test_with_state_validates() {
        let config = EditorConfig::default();
        let empty = EditorState::with_pages("x", "d", Vec::new(), Vec::new(), &config);
        assert!(EditorStore::with_state(empty, config.clone()).is_err());
        assert!(EditorStore::with_state(EditorState::sample(), config).is_ok());
    }

    #[test]
    fn test_tabs() {
        let store = EditorStore::default();
        store.set_active_left_tab(LeftTab::Elements);
        store.set_active_resource_tab(ResourceTab::Audio);
        let state = store.snapshot();
        assert_eq!(state.active_left_tab(), LeftTab::Elements);
        assert_eq!(state.active_resource_tab(), ResourceTab::Audio);
    }
}
