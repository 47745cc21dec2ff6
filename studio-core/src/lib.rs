//! # Saorsa Studio Core
//!
//! Editor state for timed visual templates: a project is a sequence of
//! pages, each a timed canvas of image, video, audio, text and QR elements,
//! plus a library of media resources. Compiles to WASM for the browser
//! editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              studio-core.wasm               │
//! ├─────────────────────────────────────────────┤
//! │  EditorStore     │  Collaborators           │
//! │  - Actions       │  - DragController        │
//! │  - Snapshots     │  - Upload / drop         │
//! │  - Subscribers   │  - PlaybackDriver        │
//! ├─────────────────────────────────────────────┤
//! │  EditorState     │  Derived views           │
//! │  - Pages         │  - Selection / panel     │
//! │  - Elements      │  - Timeline tracks       │
//! │  - Resources     │  - Canvas arrangement    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! All mutation goes through [`EditorStore`]; everything else reads
//! snapshots.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod element;
pub mod error;
pub mod id;
pub mod interaction;
pub mod layout;
pub mod page;
pub mod playback;
pub mod resource;
mod sample;
pub mod selection;
pub mod state;
pub mod store;
pub mod transfer;

#[cfg(feature = "driver")]
pub mod driver;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::{EditorConfig, PlacementDefaults};
pub use element::{
    Animation, AnimationEffect, AnimationKind, Element, ElementKind, ElementPatch, ElementType,
    Fill, Position, Size,
};
pub use error::{EditorError, EditorResult};
pub use id::{generate_id, ElementId, PageId, ResourceId};
pub use interaction::{DragController, DragState};
pub use layout::{CanvasArrangement, Placement, Rect, Slot};
pub use page::{Fade, Layout, Page, PageAnimation, PagePatch};
pub use playback::{TickOutcome, TimelineClip, TimelineTrack, TrackKind};
pub use resource::{Resource, ResourceKind, ResourceTab};
pub use selection::{PropertyPanel, Selection};
pub use state::{EditorState, LeftTab};
pub use store::{EditorStore, OnChangeCallback, SubscriptionId};

#[cfg(feature = "driver")]
pub use driver::PlaybackDriver;

/// Studio core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
