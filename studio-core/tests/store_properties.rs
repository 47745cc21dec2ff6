//! Store Property Tests
//!
//! Random action sequences against the template project, checking the
//! editor invariants after every step:
//! - the project never loses its last page
//! - the selection always lives on the current page
//! - element ids stay unique across pages
//! - zoom is always clamped into its bounds

use proptest::prelude::*;
use studio_core::element::ImageContent;
use studio_core::{EditorStore, Element, ElementKind, Fill, PageId, Position};

#[derive(Debug, Clone)]
enum Action {
    AddPage,
    DuplicatePage(usize),
    DeletePage(usize),
    SetCurrentPage(usize),
    AddElement(usize),
    SelectElement(usize),
    DeleteElement(usize),
    DuplicateElement(usize),
    ClearSelection,
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        Just(Action::AddPage),
        (0usize..8).prop_map(Action::DuplicatePage),
        (0usize..8).prop_map(Action::DeletePage),
        (0usize..8).prop_map(Action::SetCurrentPage),
        (0usize..8).prop_map(Action::AddElement),
        (0usize..8).prop_map(Action::SelectElement),
        (0usize..8).prop_map(Action::DeleteElement),
        (0usize..8).prop_map(Action::DuplicateElement),
        Just(Action::ClearSelection),
    ]
}

fn image() -> Element {
    Element::new(
        "Image.jpg",
        ElementKind::Image(ImageContent {
            src: "image.jpg".to_string(),
            fill: Fill::Fill,
        }),
    )
    .with_free_position(true)
    .with_frame(Position::new(10.0, 10.0), studio_core::Size::new(50.0, 50.0))
}

fn page_at(store: &EditorStore, index: usize) -> PageId {
    let state = store.snapshot();
    let pages = state.pages();
    pages[index % pages.len()].id.clone()
}

/// Apply an action, ignoring rejections: a rejected action must leave the
/// state valid too.
fn run(store: &EditorStore, action: &Action) {
    match *action {
        Action::AddPage => {
            store.add_page();
        }
        Action::DuplicatePage(i) => {
            let _ = store.duplicate_page(&page_at(store, i));
        }
        Action::DeletePage(i) => {
            let _ = store.delete_page(&page_at(store, i));
        }
        Action::SetCurrentPage(i) => {
            let _ = store.set_current_page(&page_at(store, i));
        }
        Action::AddElement(i) => {
            let _ = store.add_element(&page_at(store, i), image());
        }
        Action::SelectElement(i) => {
            let state = store.snapshot();
            if let Some(element) = state.current_elements().get(i) {
                let _ = store.set_selected_element(Some(&element.id));
            }
        }
        Action::DeleteElement(i) => {
            let state = store.snapshot();
            if let Some(element) = state.current_elements().get(i) {
                let _ = store.delete_element(state.current_page_id(), &element.id);
            }
        }
        Action::DuplicateElement(i) => {
            let state = store.snapshot();
            if let Some(element) = state.current_elements().get(i) {
                let _ = store.duplicate_element(state.current_page_id(), &element.id);
            }
        }
        Action::ClearSelection => {
            let _ = store.set_selected_element(None);
        }
    }
}

proptest! {
    #[test]
    fn prop_action_sequences_preserve_invariants(
        actions in prop::collection::vec(arb_action(), 0..40)
    ) {
        let store = EditorStore::sample();
        for action in &actions {
            run(&store, action);
            let state = store.snapshot();
            prop_assert!(!state.pages().is_empty());
            prop_assert!(state.validate().is_ok(), "invalid after {:?}: {:?}", action, state.validate());
            if let Some(selected) = state.selected_element_id() {
                prop_assert!(state.current_page().is_some_and(|p| p.contains(selected)));
            }
        }
    }

    #[test]
    fn prop_delete_page_never_empties_project(
        deletes in prop::collection::vec(0usize..8, 0..20)
    ) {
        let store = EditorStore::sample();
        for index in deletes {
            let _ = store.delete_page(&page_at(&store, index));
            prop_assert!(!store.snapshot().pages().is_empty());
        }
    }

    #[test]
    fn prop_zoom_is_clamped(zoom in any::<i64>()) {
        let store = EditorStore::sample();
        let applied = store.set_zoom(zoom);
        let expected = zoom.clamp(10, 200);
        prop_assert_eq!(i64::from(applied), expected);
        prop_assert_eq!(store.snapshot().zoom(), applied);
    }

    #[test]
    fn prop_set_current_page_clears_selection(target in 0usize..3) {
        let store = EditorStore::sample();
        let state = store.snapshot();
        let element = state.current_elements()[0].id.clone();
        store.set_selected_element(Some(&element)).expect("select");

        let page = page_at(&store, target);
        store.set_current_page(&page).expect("switch");
        let state = store.snapshot();
        prop_assert!(state.selected_element_id().is_none());
        prop_assert_eq!(state.current_page_id(), &page);
    }

    #[test]
    fn prop_add_element_selects_and_appends(target in 0usize..3, x in 0.0f64..640.0, y in 0.0f64..360.0) {
        let store = EditorStore::sample();
        let page = page_at(&store, target);
        let element = image().with_frame(Position::new(x, y), studio_core::Size::new(20.0, 20.0));
        let id = store.add_element(&page, element).expect("add");

        let state = store.snapshot();
        prop_assert_eq!(state.selected_element_id(), Some(&id));
        let last = state.page(&page).and_then(|p| p.elements.last()).map(|e| e.id.clone());
        prop_assert_eq!(last, Some(id));
    }

    #[test]
    fn prop_duplicate_element_only_changes_identity_name_position(index in 0usize..4) {
        let store = EditorStore::sample();
        let state = store.snapshot();
        let page = state.current_page_id().clone();
        let source = state.current_elements()[index].clone();
        let copy_id = store.duplicate_element(&page, &source.id).expect("duplicate");

        let state = store.snapshot();
        let copy = state.current_elements().last().expect("copy").clone();
        prop_assert_eq!(&copy.id, &copy_id);
        prop_assert_ne!(&copy.id, &source.id);
        prop_assert_eq!(copy.name, format!("{} (Copy)", source.name));
        prop_assert_eq!(copy.position, Position::new(source.position.x + 20.0, source.position.y + 20.0));
        prop_assert_eq!(copy.size, source.size);
        prop_assert_eq!(copy.kind, source.kind);
        prop_assert_eq!(copy.start_time.to_bits(), source.start_time.to_bits());
        prop_assert_eq!(copy.duration.to_bits(), source.duration.to_bits());
        prop_assert_eq!(copy.free_position, source.free_position);
    }
}
