//! Error types for editor operations.
//!
//! A failed action never touches the state: the store keeps its previous
//! snapshot and no subscriber is notified. Callers that want the editor's
//! absorbing behaviour simply log and drop the error.

use thiserror::Error;

use crate::element::ElementType;

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

/// Errors that can occur in editor operations.
#[derive(Debug, Error)]
pub enum EditorError {
    /// Page not found in the project.
    #[error("Page not found: {0}")]
    PageNotFound(String),

    /// Element not found on the given page.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Element exists, but not on the page currently being edited.
    #[error("Element {0} is not on the current page")]
    ElementNotOnCurrentPage(String),

    /// An element with this id already exists in the project.
    #[error("Duplicate element id: {0}")]
    DuplicateElementId(String),

    /// Resource not found in the resource library.
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// The last remaining page cannot be deleted.
    #[error("Cannot delete the last page: {0}")]
    LastPage(String),

    /// A patch carried a field the element variant does not have.
    #[error("Field `{field}` does not apply to {kind} elements")]
    FieldNotApplicable {
        /// Patch field name.
        field: &'static str,
        /// Variant of the target element.
        kind: ElementType,
    },

    /// Uploaded file has a MIME type the editor cannot place.
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// Drag-and-drop transfer payload could not be decoded.
    #[error("Malformed transfer payload: {0}")]
    Transfer(#[from] serde_json::Error),

    /// A supplied project violates an editor invariant.
    #[error("Invalid editor state: {0}")]
    InvalidState(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl EditorError {
    /// Whether this error is a lookup miss (as opposed to a guarded invariant).
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::PageNotFound(_) | Self::ElementNotFound(_) | Self::ResourceNotFound(_)
        )
    }
}
