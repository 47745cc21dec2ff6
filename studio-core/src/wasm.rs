//! WebAssembly bindings for studio-core.
//!
//! Exposes the editor action API to JavaScript. Structured values cross the
//! boundary as JSON strings; failed actions come back as error strings and
//! leave the state untouched.

use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

use crate::transfer;
use crate::{
    EditorConfig, EditorStore, Element, ElementId, ElementPatch, LeftTab, PageId, PagePatch,
    Position, Resource, ResourceId, ResourceTab, TickOutcome,
};

/// Initialize the studio WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();
}

fn parse<T: DeserializeOwned>(json: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| e.to_string())
}

/// Parse a bare enum tag such as `"upload"` or `"video"`.
fn parse_tag<T: DeserializeOwned>(tag: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(tag.to_string())).map_err(|e| e.to_string())
}

/// Editor instance for WASM.
#[wasm_bindgen]
pub struct WasmEditor {
    store: EditorStore,
    listeners: Vec<js_sys::Function>,
}

#[wasm_bindgen]
impl WasmEditor {
    /// Create an editor holding the template project.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Self {
        Self::from_store(EditorStore::sample())
    }

    /// Create an editor holding a blank project, configured from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error string if the configuration is malformed or invalid.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config_json: &str) -> Result<WasmEditor, String> {
        let config: EditorConfig = parse(config_json)?;
        config.validate().map_err(|e| e.to_string())?;
        Ok(Self::from_store(EditorStore::new(config)))
    }

    /// Register a change listener called as `listener(action, stateJson)`.
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&mut self, listener: js_sys::Function) {
        self.listeners.push(listener);
    }

    // -----------------------------------------------------------------------
    // Read views
    // -----------------------------------------------------------------------

    /// Get the full editor state as JSON.
    #[wasm_bindgen(js_name = getStateJson)]
    #[must_use]
    pub fn get_state_json(&self) -> String {
        serde_json::to_string(&*self.store.snapshot()).unwrap_or_default()
    }

    /// Get the current page as JSON.
    #[wasm_bindgen(js_name = getCurrentPageJson)]
    #[must_use]
    pub fn get_current_page_json(&self) -> String {
        serde_json::to_string(&self.store.snapshot().current_page()).unwrap_or_default()
    }

    /// Get the selected element as JSON (`null` when nothing is selected).
    #[wasm_bindgen(js_name = getSelectedElementJson)]
    #[must_use]
    pub fn get_selected_element_json(&self) -> String {
        serde_json::to_string(&self.store.snapshot().selected_element()).unwrap_or_default()
    }

    /// Get the timeline tracks of the current page as JSON.
    #[wasm_bindgen(js_name = getTimelineJson)]
    #[must_use]
    pub fn get_timeline_json(&self) -> String {
        serde_json::to_string(&self.store.snapshot().timeline_tracks()).unwrap_or_default()
    }

    /// Get the canvas arrangement of the current page as JSON.
    #[wasm_bindgen(js_name = getArrangementJson)]
    #[must_use]
    pub fn get_arrangement_json(&self) -> String {
        let canvas = self.store.config().canvas_size;
        serde_json::to_string(&self.store.snapshot().canvas_arrangement(canvas)).unwrap_or_default()
    }

    /// Search the resource library under the active tab.
    #[wasm_bindgen(js_name = getFilteredResourcesJson)]
    #[must_use]
    pub fn get_filtered_resources_json(&self, query: &str) -> String {
        serde_json::to_string(&self.store.snapshot().filtered_resources(query)).unwrap_or_default()
    }

    /// Length of the current page in seconds.
    #[wasm_bindgen(js_name = getTotalDuration)]
    #[must_use]
    pub fn get_total_duration(&self) -> f64 {
        self.store.snapshot().total_duration()
    }

    // -----------------------------------------------------------------------
    // Project
    // -----------------------------------------------------------------------

    /// Rename the project.
    #[wasm_bindgen(js_name = setProjectName)]
    pub fn set_project_name(&self, name: &str) {
        self.store.set_project_name(name);
        self.emit("set_project_name");
    }

    /// Set the zoom percentage; returns the clamped value.
    #[wasm_bindgen(js_name = setZoom)]
    pub fn set_zoom(&self, zoom: f64) -> u32 {
        // Saturating float to int conversion is the intended clamp.
        #[allow(clippy::cast_possible_truncation)]
        let zoom = self.store.set_zoom(zoom.round() as i64);
        self.emit("set_zoom");
        zoom
    }

    /// Flip the theme; returns the new value.
    #[wasm_bindgen(js_name = toggleDarkMode)]
    pub fn toggle_dark_mode(&self) -> bool {
        let dark = self.store.toggle_dark_mode();
        self.emit("toggle_dark_mode");
        dark
    }

    // -----------------------------------------------------------------------
    // Pages
    // -----------------------------------------------------------------------

    /// Append an empty page and switch to it; returns its id.
    #[wasm_bindgen(js_name = addPage)]
    pub fn add_page(&self) -> String {
        let id = self.store.add_page();
        self.emit("add_page");
        id.to_string()
    }

    /// Duplicate a page; returns the copy's id.
    ///
    /// # Errors
    ///
    /// Returns an error string if the page does not exist.
    #[wasm_bindgen(js_name = duplicatePage)]
    pub fn duplicate_page(&self, page_id: &str) -> Result<String, String> {
        let result = self.store.duplicate_page(&PageId::from(page_id));
        self.emit_result("duplicate_page", result).map(|id| id.to_string())
    }

    /// Delete a page.
    ///
    /// # Errors
    ///
    /// Returns an error string if the page does not exist or is the last one.
    #[wasm_bindgen(js_name = deletePage)]
    pub fn delete_page(&self, page_id: &str) -> Result<(), String> {
        let result = self.store.delete_page(&PageId::from(page_id));
        self.emit_result("delete_page", result)
    }

    /// Switch the current page.
    ///
    /// # Errors
    ///
    /// Returns an error string if the page does not exist.
    #[wasm_bindgen(js_name = setCurrentPage)]
    pub fn set_current_page(&self, page_id: &str) -> Result<(), String> {
        let result = self.store.set_current_page(&PageId::from(page_id));
        self.emit_result("set_current_page", result)
    }

    /// Merge a JSON page patch into a page.
    ///
    /// # Errors
    ///
    /// Returns an error string for malformed patches or unknown pages.
    #[wasm_bindgen(js_name = updatePage)]
    pub fn update_page(&self, page_id: &str, patch_json: &str) -> Result<(), String> {
        let patch: PagePatch = parse(patch_json)?;
        let result = self.store.update_page(&PageId::from(page_id), patch);
        self.emit_result("update_page", result)
    }

    // -----------------------------------------------------------------------
    // Elements
    // -----------------------------------------------------------------------

    /// Add a JSON element to a page; returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error string for malformed elements, unknown pages or
    /// duplicate ids.
    #[wasm_bindgen(js_name = addElement)]
    pub fn add_element(&self, page_id: &str, element_json: &str) -> Result<String, String> {
        let element: Element = parse(element_json)?;
        let result = self.store.add_element(&PageId::from(page_id), element);
        self.emit_result("add_element", result).map(|id| id.to_string())
    }

    /// Merge a JSON element patch into an element.
    ///
    /// # Errors
    ///
    /// Returns an error string for malformed patches, unknown ids or fields
    /// the element type lacks.
    #[wasm_bindgen(js_name = updateElement)]
    pub fn update_element(&self, page_id: &str, element_id: &str, patch_json: &str) -> Result<(), String> {
        let patch: ElementPatch = parse(patch_json)?;
        let result =
            self.store
                .update_element(&PageId::from(page_id), &ElementId::from(element_id), patch);
        self.emit_result("update_element", result)
    }

    /// Delete an element.
    ///
    /// # Errors
    ///
    /// Returns an error string for unknown ids.
    #[wasm_bindgen(js_name = deleteElement)]
    pub fn delete_element(&self, page_id: &str, element_id: &str) -> Result<(), String> {
        let result = self
            .store
            .delete_element(&PageId::from(page_id), &ElementId::from(element_id));
        self.emit_result("delete_element", result)
    }

    /// Select an element of the current page, or clear with `undefined`.
    ///
    /// # Errors
    ///
    /// Returns an error string if the element is not on the current page.
    #[wasm_bindgen(js_name = setSelectedElement)]
    pub fn set_selected_element(&self, element_id: Option<String>) -> Result<(), String> {
        let id = element_id.map(ElementId::from);
        let result = self.store.set_selected_element(id.as_ref());
        self.emit_result("set_selected_element", result)
    }

    /// Duplicate an element; returns the copy's id.
    ///
    /// # Errors
    ///
    /// Returns an error string for unknown ids.
    #[wasm_bindgen(js_name = duplicateElement)]
    pub fn duplicate_element(&self, page_id: &str, element_id: &str) -> Result<String, String> {
        let result = self
            .store
            .duplicate_element(&PageId::from(page_id), &ElementId::from(element_id));
        self.emit_result("duplicate_element", result).map(|id| id.to_string())
    }

    // -----------------------------------------------------------------------
    // Resources
    // -----------------------------------------------------------------------

    /// Add a JSON resource to the library; returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error string for malformed resources.
    #[wasm_bindgen(js_name = addResource)]
    pub fn add_resource(&self, resource_json: &str) -> Result<String, String> {
        let resource: Resource = parse(resource_json)?;
        let id = self.store.add_resource(resource);
        self.emit("add_resource");
        Ok(id.to_string())
    }

    /// Delete a library resource.
    ///
    /// # Errors
    ///
    /// Returns an error string if the resource does not exist.
    #[wasm_bindgen(js_name = deleteResource)]
    pub fn delete_resource(&self, resource_id: &str) -> Result<(), String> {
        let result = self.store.delete_resource(&ResourceId::from(resource_id));
        self.emit_result("delete_resource", result)
    }

    /// Wrap an uploaded file; returns the resource id, or `undefined` for
    /// unsupported types.
    #[wasm_bindgen(js_name = uploadResource)]
    pub fn upload_resource(&self, file_name: &str, mime: &str, blob_url: &str) -> Option<String> {
        let id = transfer::upload(&self.store, file_name, mime, blob_url)?;
        self.emit("add_resource");
        Some(id.to_string())
    }

    /// Place a library resource on the current page.
    #[wasm_bindgen(js_name = placeResource)]
    pub fn place_resource(&self, resource_id: &str) -> Option<String> {
        let id = transfer::place_resource(&self.store, &ResourceId::from(resource_id))?;
        self.emit("add_element");
        Some(id.to_string())
    }

    /// Drag payload for a library resource.
    #[wasm_bindgen(js_name = dragPayload)]
    #[must_use]
    pub fn drag_payload(&self, resource_id: &str) -> Option<String> {
        let state = self.store.snapshot();
        let resource = state.resource(&ResourceId::from(resource_id))?;
        transfer::encode_transfer(resource).ok()
    }

    /// Handle a drop on the canvas; returns the new element id.
    #[wasm_bindgen(js_name = dropResource)]
    pub fn drop_resource(
        &self,
        payload: &str,
        drop_x: f64,
        drop_y: f64,
        canvas_x: f64,
        canvas_y: f64,
    ) -> Option<String> {
        let id = transfer::drop_payload(
            &self.store,
            payload,
            Position::new(drop_x, drop_y),
            Position::new(canvas_x, canvas_y),
        )?;
        self.emit("add_element");
        Some(id.to_string())
    }

    // -----------------------------------------------------------------------
    // Timeline
    // -----------------------------------------------------------------------

    /// Set the timeline cursor directly.
    #[wasm_bindgen(js_name = setTimelinePosition)]
    pub fn set_timeline_position(&self, seconds: f64) {
        self.store.set_timeline_position(seconds);
        self.emit("set_timeline_position");
    }

    /// Flip playback; returns whether it is now playing.
    #[wasm_bindgen(js_name = togglePlay)]
    pub fn toggle_play(&self) -> bool {
        let playing = self.store.toggle_play();
        self.emit("toggle_play");
        playing
    }

    /// Advance playback by one tick; returns whether it is still playing.
    ///
    /// Drive this from `setInterval` and clear the interval once it returns
    /// `false`.
    #[wasm_bindgen(js_name = tickPlayback)]
    pub fn tick_playback(&self) -> bool {
        match self.store.tick_playback() {
            Some(TickOutcome::Advanced(_)) => {
                self.emit("tick_playback");
                true
            }
            Some(TickOutcome::Finished) => {
                self.emit("tick_playback");
                false
            }
            None => false,
        }
    }

    /// Scrub to a time; returns the clamped position.
    #[wasm_bindgen(js_name = scrubTo)]
    pub fn scrub_to(&self, seconds: f64) -> f64 {
        let position = self.store.scrub_to(seconds);
        self.emit("scrub_to");
        position
    }

    /// Scrub from a pointer on the ruler; returns the clamped position.
    #[wasm_bindgen(js_name = scrubFromPointer)]
    pub fn scrub_from_pointer(&self, offset_px: f64, scroll_px: f64) -> f64 {
        let position = self.store.scrub_from_pointer(offset_px, scroll_px);
        self.emit("scrub_to");
        position
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Set the left sidebar tab (`upload`, `elements`, `live`).
    ///
    /// # Errors
    ///
    /// Returns an error string for unknown tabs.
    #[wasm_bindgen(js_name = setActiveLeftTab)]
    pub fn set_active_left_tab(&self, tab: &str) -> Result<(), String> {
        let tab: LeftTab = parse_tag(tab)?;
        self.store.set_active_left_tab(tab);
        self.emit("set_active_left_tab");
        Ok(())
    }

    /// Set the resource filter tab (`all`, `image`, `video`, `audio`).
    ///
    /// # Errors
    ///
    /// Returns an error string for unknown tabs.
    #[wasm_bindgen(js_name = setActiveResourceTab)]
    pub fn set_active_resource_tab(&self, tab: &str) -> Result<(), String> {
        let tab: ResourceTab = parse_tag(tab)?;
        self.store.set_active_resource_tab(tab);
        self.emit("set_active_resource_tab");
        Ok(())
    }
}

impl WasmEditor {
    fn from_store(store: EditorStore) -> Self {
        Self {
            store,
            listeners: Vec::new(),
        }
    }

    fn emit(&self, action: &str) {
        if self.listeners.is_empty() {
            return;
        }
        let action = JsValue::from_str(action);
        let state = JsValue::from_str(&self.get_state_json());
        for listener in &self.listeners {
            if let Err(e) = listener.call2(&JsValue::NULL, &action, &state) {
                tracing::warn!(error = ?e, "Change listener threw");
            }
        }
    }

    fn emit_result<T>(&self, action: &str, result: crate::EditorResult<T>) -> Result<T, String> {
        let value = result.map_err(|e| e.to_string())?;
        self.emit(action);
        Ok(value)
    }
}

impl Default for WasmEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wasm_editor_new_opens_template() {
        let editor = WasmEditor::new();
        let state: serde_json::Value =
            serde_json::from_str(&editor.get_state_json()).expect("state json");
        assert_eq!(state["projectName"], "Template 2025-08-29");
        assert_eq!(state["currentPageId"], "page-1");
        assert_eq!(state["pages"].as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn with_config_rejects_invalid_bounds() {
        assert!(WasmEditor::with_config(r#"{"zoomMin": 300, "zoomMax": 200}"#).is_err());
        assert!(WasmEditor::with_config("{ not json").is_err());
        let editor = WasmEditor::with_config("{}").expect("defaults");
        assert!((editor.get_total_duration() - 180.0).abs() < f64::EPSILON);
    }

    #[test]
    fn update_element_accepts_json_patch() {
        let editor = WasmEditor::new();
        editor
            .update_element("page-1", "el-1-2", r#"{"position": {"x": 10.0, "y": 20.0}}"#)
            .expect("update");
        let state: serde_json::Value =
            serde_json::from_str(&editor.get_state_json()).expect("state json");
        assert_eq!(state["pages"][0]["elements"][1]["position"]["x"], 10.0);
    }

    #[test]
    fn update_element_rejects_type_change() {
        let editor = WasmEditor::new();
        let result = editor.update_element("page-1", "el-1-2", r#"{"type": "image"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn tabs_parse_from_tags() {
        let editor = WasmEditor::new();
        editor.set_active_left_tab("elements").expect("left tab");
        editor.set_active_resource_tab("audio").expect("resource tab");
        assert!(editor.set_active_resource_tab("pdf").is_err());
        let filtered: serde_json::Value =
            serde_json::from_str(&editor.get_filtered_resources_json("")).expect("json");
        assert_eq!(filtered.as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn selection_round_trip() {
        let editor = WasmEditor::new();
        editor
            .set_selected_element(Some("el-1-3".to_string()))
            .expect("select");
        assert!(editor.get_selected_element_json().contains("el-1-3"));
        editor.set_selected_element(None).expect("clear");
        assert_eq!(editor.get_selected_element_json(), "null");
    }

    #[test]
    fn drag_and_drop_through_payload() {
        let editor = WasmEditor::new();
        let payload = editor.drag_payload("res-1").expect("payload");
        let id = editor
            .drop_resource(&payload, 100.0, 100.0, 40.0, 40.0)
            .expect("dropped");
        assert!(editor.get_selected_element_json().contains(&id));
        assert!(editor.drop_resource("garbage", 0.0, 0.0, 0.0, 0.0).is_none());
    }

    #[test]
    fn tick_reports_playing() {
        let editor = WasmEditor::new();
        assert!(!editor.tick_playback());
        assert!(editor.toggle_play());
        assert!(editor.tick_playback());
    }
}
