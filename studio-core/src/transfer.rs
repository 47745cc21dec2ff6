//! Resource panel collaborators: uploads, click-to-place and drag-and-drop.
//!
//! These sit on the UI boundary, so they absorb failures: a bad upload or a
//! malformed drop payload is logged and ignored, and the store is left as it
//! was.

use crate::store::EditorStore;
use crate::{EditorResult, ElementId, Position, Resource, ResourceId, ResourceKind};

/// Data-transfer format of a dragged resource.
pub const TRANSFER_FORMAT: &str = "application/json";

/// Serialize a resource for a drag payload.
///
/// # Errors
///
/// Returns [`crate::EditorError::Transfer`] if serialization fails.
pub fn encode_transfer(resource: &Resource) -> EditorResult<String> {
    Ok(serde_json::to_string(resource)?)
}

/// Decode a drag payload back into a resource.
///
/// # Errors
///
/// Returns [`crate::EditorError::Transfer`] for malformed payloads.
pub fn decode_transfer(payload: &str) -> EditorResult<Resource> {
    Ok(serde_json::from_str(payload)?)
}

/// Wrap an uploaded file into a library resource.
///
/// Unsupported MIME types are ignored.
pub fn upload(store: &EditorStore, file_name: &str, mime: &str, blob_url: &str) -> Option<ResourceId> {
    match Resource::from_upload(file_name, mime, blob_url, store.config()) {
        Ok(resource) => Some(store.add_resource(resource)),
        Err(e) => {
            tracing::warn!(file_name, error = %e, "Upload ignored");
            None
        }
    }
}

/// Place a library resource on the current page at the default position.
pub fn place_resource(store: &EditorStore, resource_id: &ResourceId) -> Option<ElementId> {
    let state = store.snapshot();
    let Some(resource) = state.resource(resource_id) else {
        tracing::debug!(resource_id = %resource_id, "Place ignored: unknown resource");
        return None;
    };
    let placement = &store.config().placement;
    let element = resource.to_element(placement.position, placement);
    log_absorbed(store.add_element(state.current_page_id(), element))
}

/// Handle a drop on the canvas.
///
/// `drop_point` and `canvas_origin` are screen pixels; the element lands at
/// the drop point in unscaled canvas units. Only images and videos can be
/// dropped on the canvas.
pub fn drop_payload(
    store: &EditorStore,
    payload: &str,
    drop_point: Position,
    canvas_origin: Position,
) -> Option<ElementId> {
    let resource = match decode_transfer(payload) {
        Ok(resource) => resource,
        Err(e) => {
            tracing::debug!(error = %e, "Drop ignored");
            return None;
        }
    };
    if resource.kind == ResourceKind::Audio {
        tracing::debug!(resource_id = %resource.id, "Drop ignored: audio");
        return None;
    }
    let state = store.snapshot();
    let scale = state.scale();
    let position = Position::new(
        (drop_point.x - canvas_origin.x) / scale,
        (drop_point.y - canvas_origin.y) / scale,
    );
    let element = resource.to_element(position, &store.config().placement);
    log_absorbed(store.add_element(state.current_page_id(), element))
}

fn log_absorbed<T>(result: EditorResult<T>) -> Option<T> {
    result
        .map_err(|e| tracing::debug!(error = %e, "Resource placement ignored"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ElementKind, ElementType};

    #[test]
    fn test_transfer_payload_is_plain_resource_json() {
        let state = crate::EditorState::sample();
        let resource = &state.resources()[0];
        let payload = encode_transfer(resource).expect("encode");
        let value: serde_json::Value = serde_json::from_str(&payload).expect("json");
        assert_eq!(value["id"], "res-1");
        assert_eq!(value["type"], "image");
        assert_eq!(&decode_transfer(&payload).expect("decode"), resource);
    }

    #[test]
    fn test_upload_infers_kind_and_ignores_unknown() {
        let store = EditorStore::sample();
        let id = upload(&store, "holiday-video-final-cut.mp4", "video/mp4", "blob:1").expect("video");
        let state = store.snapshot();
        let resource = state.resource(&id).expect("added");
        assert_eq!(resource.kind, ResourceKind::Video);
        assert_eq!(resource.name, "holiday-video-f...");
        assert_eq!(resource.thumbnail.as_deref(), Some("blob:1"));

        assert!(upload(&store, "notes.pdf", "application/pdf", "blob:2").is_none());
        assert_eq!(store.snapshot().resources().len(), 9);
    }

    #[test]
    fn test_place_audio_resource_uses_its_duration() {
        let store = EditorStore::sample();
        let id = place_resource(&store, &ResourceId::from("res-4")).expect("placed");
        let state = store.snapshot();
        let element = state.selected_element().expect("selected");
        assert_eq!(element.id, id);
        assert_eq!(element.element_type(), ElementType::Audio);
        assert!((element.duration - 120.0).abs() < f64::EPSILON);
        assert!(element.free_position);
        assert!(place_resource(&store, &ResourceId::from("ghost")).is_none());
    }

    #[test]
    fn test_drop_converts_point_by_zoom() {
        let store = EditorStore::sample();
        let payload = encode_transfer(&store.snapshot().resources()[0]).expect("encode");
        let id = drop_payload(
            &store,
            &payload,
            Position::new(100.0, 70.0),
            Position::new(40.0, 10.0),
        )
        .expect("dropped");
        let state = store.snapshot();
        let element = state.selected_element().expect("selected");
        assert_eq!(element.id, id);
        assert!((element.position.x - 100.0).abs() < 1e-9);
        assert!((element.position.y - 100.0).abs() < 1e-9);
        assert!(matches!(element.kind, ElementKind::Image(_)));
    }

    #[test]
    fn test_drop_ignores_garbage_and_audio() {
        let store = EditorStore::sample();
        let before = store.snapshot();
        assert!(drop_payload(&store, "{not json", Position::default(), Position::default()).is_none());
        let audio = encode_transfer(&before.resources()[1]).expect("encode");
        assert!(drop_payload(&store, &audio, Position::default(), Position::default()).is_none());
        assert_eq!(*store.snapshot(), *before);
    }
}
