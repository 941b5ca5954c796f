//! Designboard Core Library
//!
//! Element model, selection, gesture handling, persistence and export for the
//! designboard layout editor. Platform-agnostic: input arrives as abstract
//! pointer and key events and output is polled state plus change
//! notifications.

pub mod config;
pub mod editor;
pub mod element;
pub mod export;
pub mod image;
pub mod input;
pub mod interaction;
pub mod selection;
pub mod snapshot;
pub mod storage;
pub mod store;
pub mod summary;

pub use config::EditorConfig;
pub use editor::{Change, Editor, ImageRequest, PropertyChange, SameBy, SharedProperty, TextEdit};
pub use element::{Element, ElementId, ElementKind};
pub use export::ExportFormat;
pub use input::{InputEvent, Key, Modifiers, PointerEvent};
pub use interaction::{FreehandCapture, Gesture};
pub use selection::{ResizeHandle, Selection};
pub use snapshot::LoadOutcome;
pub use store::{ElementField, ElementStore};
pub use summary::{LayerSummary, PropertiesView, ToolbarState};
