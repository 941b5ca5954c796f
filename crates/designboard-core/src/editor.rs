//! Editor session: the element store, the selection and the active gesture,
//! driven by pointer and keyboard events.
//!
//! Every operation runs to completion synchronously. Operations that commit
//! a change end by autosaving, and every visible change is queued as a
//! [`Change`] for the view layer to drain with [`Editor::take_changes`].

use crate::config::EditorConfig;
use crate::element::{Element, ElementId, ElementKind, PLACEHOLDER_TEXT};
use crate::export::{self, ExportFormat};
use crate::image::{ImageDataError, parse_data_url};
use crate::input::{Key, Modifiers, PointerEvent};
use crate::interaction::{DragState, FreehandCapture, Gesture, ResizeState, drag_origin, resize_frame};
use crate::selection::{Selection, hit_test_handles};
use crate::snapshot::{LoadOutcome, SnapshotError};
use crate::storage::{AutoSaver, MemoryStorage, Storage};
use crate::store::{ElementField, ElementStore};
use crate::summary::{self, LayerSummary, PropertiesView, ToolbarState};
use kurbo::{Point, Vec2};
use std::sync::Arc;

/// Notification for the view layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Everything may have changed; rebuild from scratch.
    FullRebuild,
    /// One element was added or changed.
    Element(ElementId),
    Removed(ElementId),
    /// Selection membership changed.
    Selection,
    /// The in-progress freehand stroke changed, started or ended.
    Stroke,
    /// A text edit session started, ended or changed its buffer.
    TextEdit(ElementId),
}

/// Request for image data on behalf of an element.
///
/// Returned when an image needs a bitmap; hand it back to
/// [`Editor::complete_image_request`] once the data URL is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    id: ElementId,
}

impl ImageRequest {
    pub fn element_id(&self) -> &ElementId {
        &self.id
    }
}

/// An in-place text edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub id: ElementId,
    /// Uncommitted content.
    pub buffer: String,
}

/// Property form write-back for a single selected element.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyChange {
    X(f64),
    Y(f64),
    Width(f64),
    Height(f64),
    Rotation(f64),
    Fill(String),
    Text(String),
    StrokeColor(String),
    StrokeSize(f64),
}

/// Property form write-back for a multi-selection.
#[derive(Debug, Clone, PartialEq)]
pub enum SharedProperty {
    Fill(String),
    Rotation(f64),
}

/// Criterion for "select same".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameBy {
    Kind,
    Fill,
}

const MIN_STROKE_SIZE: f64 = 1.0;
const MAX_STROKE_SIZE: f64 = 50.0;

/// An editing session.
pub struct Editor {
    config: EditorConfig,
    store: ElementStore,
    selection: Selection,
    gesture: Gesture,
    /// Element type placed by the tool picker; freehand arms stroke capture.
    tool: ElementKind,
    text_edit: Option<TextEdit>,
    autosaver: AutoSaver,
    changes: Vec<Change>,
}

impl Editor {
    /// Create an empty session persisting to `storage`.
    pub fn new(config: EditorConfig, storage: Arc<dyn Storage>) -> Self {
        let autosaver = AutoSaver::new(storage, config.storage_key.clone());
        Self {
            config,
            store: ElementStore::new(),
            selection: Selection::new(),
            gesture: Gesture::Idle,
            tool: ElementKind::default(),
            text_edit: None,
            autosaver,
            changes: Vec::new(),
        }
    }

    /// Create a session backed by memory only.
    pub fn in_memory(config: EditorConfig) -> Self {
        Self::new(config, Arc::new(MemoryStorage::new()))
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &ElementStore {
        &self.store
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn active_tool(&self) -> ElementKind {
        self.tool
    }

    pub fn text_edit(&self) -> Option<&TextEdit> {
        self.text_edit.as_ref()
    }

    pub fn autosaver(&self) -> &AutoSaver {
        &self.autosaver
    }

    /// Elements in store order.
    pub fn elements(&self) -> &[Element] {
        self.store.as_slice()
    }

    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.store.get(id)
    }

    /// Selected identities, first-selected first.
    pub fn selected_ids(&self) -> Vec<ElementId> {
        self.selection.to_vec(&self.store)
    }

    /// Stroke being drawn, for live preview.
    pub fn freehand_preview(&self) -> Option<&FreehandCapture> {
        match &self.gesture {
            Gesture::FreehandCapturing(capture) => Some(capture),
            _ => None,
        }
    }

    /// Drain pending view notifications.
    pub fn take_changes(&mut self) -> Vec<Change> {
        std::mem::take(&mut self.changes)
    }

    pub fn selection_label(&self) -> String {
        summary::selection_label(&self.store, &self.selection)
    }

    pub fn toolbar_state(&self) -> ToolbarState {
        summary::toolbar_state(&self.store, &self.selection)
    }

    pub fn layers(&self) -> Vec<LayerSummary> {
        summary::layers(&self.store, &self.selection)
    }

    pub fn properties(&self) -> PropertiesView {
        summary::properties(&self.store, &self.selection)
    }

    // Persistence

    /// Replace the session with the stored snapshot.
    pub fn load(&mut self) -> LoadOutcome {
        self.reset_session();
        let outcome = match self.autosaver.load() {
            Ok(None) => LoadOutcome::Empty,
            Ok(Some(snapshot)) => {
                let count = snapshot.elements.len();
                self.store = ElementStore::from_elements(snapshot.elements);
                self.store.clamp_all(&self.config);
                LoadOutcome::Restored {
                    count,
                    skipped: snapshot.skipped,
                }
            }
            Err(e) => {
                log::warn!("Load failed: {}", e);
                LoadOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };
        log::info!("Loaded layout: {:?}", outcome);
        self.changes.push(Change::FullRebuild);
        outcome
    }

    /// Save now. Returns whether the write succeeded.
    pub fn save(&mut self) -> bool {
        self.autosaver.save(self.store.as_slice())
    }

    /// Remove every element and erase the stored snapshot.
    pub fn clear(&mut self) {
        self.reset_session();
        if let Err(e) = self.autosaver.erase() {
            log::warn!("Failed to erase saved layout: {}", e);
        }
        log::info!("Canvas cleared");
        self.changes.push(Change::FullRebuild);
    }

    fn reset_session(&mut self) {
        self.store.clear();
        self.selection.clear();
        self.gesture = Gesture::Idle;
        self.text_edit = None;
    }

    fn persist(&mut self) {
        self.autosaver.save(self.store.as_slice());
    }

    pub fn export(&self, format: ExportFormat) -> Result<String, SnapshotError> {
        export::export(self.store.as_slice(), self.config.canvas_size, format)
    }

    // Creation

    /// Pick a tool. Shape tools place an element immediately; freehand only
    /// arms stroke capture.
    pub fn select_tool(&mut self, kind: ElementKind) -> Option<ElementId> {
        log::debug!("Tool: {:?}", kind);
        self.tool = kind;
        self.add_element(kind)
    }

    /// Place a new element of `kind` and select it. Freehand strokes can
    /// only be drawn.
    pub fn add_element(&mut self, kind: ElementKind) -> Option<ElementId> {
        if kind == ElementKind::Freehand {
            return None;
        }
        let id = self.store.create(kind, &self.config).id.clone();
        self.changes.push(Change::Element(id.clone()));
        self.select_only(Some(id.clone()));
        self.persist();
        Some(id)
    }

    pub fn add_text(&mut self) -> Option<ElementId> {
        self.add_element(ElementKind::Text)
    }

    // Selection

    fn select_only(&mut self, id: Option<ElementId>) {
        self.selection.select_only(id);
        self.changes.push(Change::Selection);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.changes.push(Change::Selection);
    }

    /// Select from the layer list. Shift toggles membership.
    pub fn click_layer(&mut self, id: &ElementId, modifiers: Modifiers) {
        if !self.store.contains(id) {
            return;
        }
        if modifiers.shift {
            self.selection.toggle(id.clone());
        } else {
            self.selection.select_only(Some(id.clone()));
        }
        self.changes.push(Change::Selection);
    }

    /// Union-add every element matching the primary selection by kind or
    /// fill. Returns the resulting selection size; no-op when nothing is
    /// selected.
    pub fn select_same(&mut self, by: SameBy) -> usize {
        let Some(primary) = self.selection.primary(&self.store) else {
            return 0;
        };
        let matches: Vec<ElementId> = self
            .store
            .iter()
            .filter(|e| match by {
                SameBy::Kind => e.kind == primary.kind,
                SameBy::Fill => e.styles.background == primary.styles.background,
            })
            .map(|e| e.id.clone())
            .collect();
        self.selection.select_many(matches);
        self.changes.push(Change::Selection);
        self.selection.len(&self.store)
    }

    // Pointer input

    /// Feed a pointer event. Returns an image request when the press landed
    /// on an empty image element.
    pub fn pointer(&mut self, event: PointerEvent) -> Option<ImageRequest> {
        match event {
            PointerEvent::Down {
                position,
                modifiers,
            } => self.pointer_down(position, modifiers),
            PointerEvent::Move { position } => {
                self.pointer_move(position);
                None
            }
            PointerEvent::Up { position } => {
                self.pointer_up(position);
                None
            }
        }
    }

    pub fn pointer_down(&mut self, position: Point, modifiers: Modifiers) -> Option<ImageRequest> {
        if !self.gesture.is_idle() {
            log::debug!("Ignoring pointer down while {}", self.gesture.name());
            return None;
        }
        if self.text_edit.is_some() {
            self.commit_text_edit();
        }

        if let Some(element) = self.selection.single(&self.store) {
            if !element.locked {
                if let Some(handle) = hit_test_handles(element, position, self.config.handle_tolerance) {
                    log::debug!("Resize {} from {:?}", element.id, handle);
                    self.gesture = Gesture::Resizing(ResizeState::new(
                        element.id.clone(),
                        handle,
                        position,
                        element.bounds(),
                    ));
                    return None;
                }
            }
        }

        let Some(hit) = self.store.element_at(position) else {
            self.press_background(position);
            return None;
        };
        let id = hit.id.clone();
        let locked = hit.locked;

        if hit.awaits_image() && !locked {
            log::debug!("Image requested for {}", id);
            return Some(ImageRequest { id });
        }

        if modifiers.shift {
            self.selection.toggle(id.clone());
            self.changes.push(Change::Selection);
        } else if !self.selection.contains(&id) {
            self.select_only(Some(id.clone()));
        }

        if !locked && self.selection.contains(&id) {
            let starts = self
                .selection
                .elements(&self.store)
                .filter(|e| !e.locked)
                .map(|e| (e.id.clone(), e.origin()))
                .collect();
            self.gesture = Gesture::Dragging(DragState::new(position, starts));
            log::debug!("Drag started on {}", id);
        }
        None
    }

    fn press_background(&mut self, position: Point) {
        if self.tool == ElementKind::Freehand {
            let id = self.store.allocate_id();
            log::debug!("Stroke {} started", id);
            self.gesture = Gesture::FreehandCapturing(FreehandCapture::begin(id, position, &self.config));
            self.changes.push(Change::Stroke);
        } else {
            self.clear_selection();
        }
    }

    pub fn pointer_move(&mut self, position: Point) {
        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Dragging(drag) => {
                let delta = drag.delta(position);
                for (id, start) in &drag.starts {
                    let Some(size) = self.store.get(id).map(Element::size) else {
                        continue;
                    };
                    let origin = drag_origin(*start, delta, size, self.config.canvas_size);
                    if self.store.set_origin(id, origin, &self.config) {
                        self.changes.push(Change::Element(id.clone()));
                    }
                }
            }
            Gesture::Resizing(resize) => {
                let Some(element) = self.store.get(&resize.id) else {
                    return;
                };
                let frame = resize_frame(
                    element.kind,
                    resize.start,
                    element.bounds(),
                    resize.handle,
                    resize.delta(position),
                    &self.config,
                );
                if self.store.set_frame(&resize.id, frame, &self.config) {
                    self.changes.push(Change::Element(resize.id.clone()));
                }
            }
            Gesture::FreehandCapturing(capture) => {
                if capture.push(position, &self.config) {
                    self.changes.push(Change::Stroke);
                }
            }
        }
    }

    pub fn pointer_up(&mut self, position: Point) {
        let gesture = std::mem::take(&mut self.gesture);
        log::debug!("Pointer up at ({}, {}) ending {}", position.x, position.y, gesture.name());
        match gesture {
            Gesture::Idle => {}
            Gesture::Dragging(_) | Gesture::Resizing(_) => self.persist(),
            Gesture::FreehandCapturing(capture) => {
                self.changes.push(Change::Stroke);
                match capture.finish(&self.config) {
                    Some(stroke) => {
                        let id = self.store.push_top(stroke).id.clone();
                        log::debug!("Stroke {} committed", id);
                        self.changes.push(Change::Element(id.clone()));
                        self.select_only(Some(id));
                        self.persist();
                    }
                    None => log::debug!("Stroke discarded"),
                }
            }
        }
    }

    // Keyboard

    /// Feed a key press. Returns whether the key was handled.
    pub fn key(&mut self, key: &Key) -> bool {
        if self.text_edit.is_some() {
            return match key {
                Key::Enter => {
                    self.commit_text_edit();
                    true
                }
                Key::Escape => {
                    self.cancel_text_edit();
                    true
                }
                _ => false,
            };
        }
        if !self.gesture.is_idle() || self.selection.is_empty(&self.store) {
            return false;
        }
        if key.is_delete() {
            self.delete_selected();
            return true;
        }
        if let Some((dx, dy)) = key.arrow_direction() {
            let step = self.config.nudge_step;
            self.nudge(Vec2::new(dx * step, dy * step));
            return true;
        }
        false
    }

    /// Move unlocked selected elements by `delta`, clamped to the canvas.
    /// Returns how many moved.
    pub fn nudge(&mut self, delta: Vec2) -> usize {
        let targets: Vec<(ElementId, Point)> = self
            .selection
            .elements(&self.store)
            .filter(|e| !e.locked)
            .map(|e| (e.id.clone(), e.origin() + delta))
            .collect();
        let mut moved = 0;
        for (id, origin) in targets {
            if self.store.set_origin(&id, origin, &self.config) {
                self.changes.push(Change::Element(id));
                moved += 1;
            }
        }
        if moved > 0 {
            self.persist();
        }
        moved
    }

    /// Remove every selected element, locked ones included. Returns how many
    /// were removed.
    pub fn delete_selected(&mut self) -> usize {
        let ids = self.selection.to_vec(&self.store);
        if ids.is_empty() {
            return 0;
        }
        let before = self.z_orders();
        let removed = self.store.delete(&ids);
        self.selection.clear();
        for element in &removed {
            self.changes.push(Change::Removed(element.id.clone()));
        }
        self.push_z_changes(before);
        self.changes.push(Change::Selection);
        log::debug!("Deleted {} elements", removed.len());
        self.persist();
        removed.len()
    }

    fn z_orders(&self) -> Vec<(ElementId, u32)> {
        self.store.iter().map(|e| (e.id.clone(), e.z_index)).collect()
    }

    fn push_z_changes(&mut self, before: Vec<(ElementId, u32)>) {
        for (id, z) in before {
            if self.store.get(&id).is_some_and(|e| e.z_index != z) {
                self.changes.push(Change::Element(id));
            }
        }
    }

    // Layering

    /// Raise the single selected element one step.
    pub fn move_up(&mut self) -> bool {
        self.reorder(ElementStore::move_up)
    }

    /// Lower the single selected element one step.
    pub fn move_down(&mut self) -> bool {
        self.reorder(ElementStore::move_down)
    }

    fn reorder(&mut self, step: fn(&mut ElementStore, &ElementId) -> bool) -> bool {
        let Some(id) = self.selection.single(&self.store).map(|e| e.id.clone()) else {
            return false;
        };
        let before = self.z_orders();
        if !step(&mut self.store, &id) {
            return false;
        }
        self.push_z_changes(before);
        self.persist();
        true
    }

    // Lock

    /// Flip the lock flag of every selected element. Returns how many were
    /// toggled.
    pub fn toggle_lock(&mut self) -> usize {
        let targets: Vec<(ElementId, bool)> = self
            .selection
            .elements(&self.store)
            .map(|e| (e.id.clone(), !e.locked))
            .collect();
        for (id, locked) in &targets {
            self.store.set_locked(id, *locked);
            self.changes.push(Change::Element(id.clone()));
        }
        if !targets.is_empty() {
            self.persist();
        }
        targets.len()
    }

    // Properties

    /// Apply a form edit to the single selected element.
    pub fn set_property(&mut self, change: PropertyChange) -> bool {
        let Some(element) = self.selection.single(&self.store) else {
            return false;
        };
        let id = element.id.clone();
        let field = match change {
            PropertyChange::X(x) => ElementField::X(x),
            PropertyChange::Y(y) => ElementField::Y(y),
            PropertyChange::Width(w) => ElementField::Width(w),
            PropertyChange::Height(h) => ElementField::Height(h),
            PropertyChange::Rotation(r) => ElementField::Rotation(r),
            PropertyChange::Fill(fill) => ElementField::Fill(fill),
            PropertyChange::Text(text) => ElementField::Text(text_or_placeholder(&text)),
            PropertyChange::StrokeColor(color) => ElementField::DrawColor(color),
            PropertyChange::StrokeSize(size) => {
                ElementField::DrawSize(size.clamp(MIN_STROKE_SIZE, MAX_STROKE_SIZE))
            }
        };
        self.mutate(&id, field)
    }

    /// Apply a form edit to every unlocked selected element it applies to.
    /// Returns how many changed.
    pub fn set_shared_property(&mut self, change: SharedProperty) -> usize {
        let ids: Vec<ElementId> = self
            .selection
            .elements(&self.store)
            .filter(|e| !e.locked)
            .filter(|e| match change {
                SharedProperty::Fill(_) => e.kind.has_editable_fill(),
                SharedProperty::Rotation(_) => true,
            })
            .map(|e| e.id.clone())
            .collect();
        let mut changed = 0;
        for id in &ids {
            let field = match &change {
                SharedProperty::Fill(fill) => ElementField::Fill(fill.clone()),
                SharedProperty::Rotation(r) => ElementField::Rotation(*r),
            };
            if self.store.mutate(id, field, &self.config) {
                self.changes.push(Change::Element(id.clone()));
                changed += 1;
            }
        }
        if changed > 0 {
            self.persist();
        }
        changed
    }

    /// Apply one field change through the store and persist.
    pub fn mutate(&mut self, id: &ElementId, field: ElementField) -> bool {
        if !self.store.mutate(id, field, &self.config) {
            return false;
        }
        self.changes.push(Change::Element(id.clone()));
        self.persist();
        true
    }

    // Replace and images

    /// Replace the content of the single selected text element.
    pub fn replace_text(&mut self, text: &str) -> bool {
        match self.replace_target(ElementKind::Text) {
            Some(id) => self.mutate(&id, ElementField::Text(text_or_placeholder(text))),
            None => false,
        }
    }

    /// Ask for a new bitmap for the single selected image element.
    pub fn replace_image(&mut self) -> Option<ImageRequest> {
        self.replace_target(ElementKind::Image)
            .map(|id| ImageRequest { id })
    }

    fn replace_target(&self, kind: ElementKind) -> Option<ElementId> {
        self.selection
            .single(&self.store)
            .filter(|e| e.kind == kind && summary::can_replace(e))
            .map(|e| e.id.clone())
    }

    /// Deliver image data for an earlier request. Invalid data URLs are
    /// rejected; a request whose element is gone or locked is dropped.
    pub fn complete_image_request(
        &mut self,
        request: ImageRequest,
        data_url: &str,
    ) -> Result<(), ImageDataError> {
        let image = parse_data_url(data_url).inspect_err(|e| {
            log::warn!("Rejected image for {}: {}", request.id, e);
        })?;
        log::debug!("Image {} ({} bytes) for {}", image.mime, image.byte_len, request.id);
        if !self.mutate(&request.id, ElementField::ImageSrc(data_url.to_string())) {
            log::debug!("Image request for {} dropped", request.id);
        }
        Ok(())
    }

    // Text edit

    /// Double-click: start editing an unlocked text element under `position`.
    pub fn double_click(&mut self, position: Point) -> bool {
        if !self.gesture.is_idle() {
            return false;
        }
        match self.store.element_at(position).map(|e| e.id.clone()) {
            Some(id) => self.begin_text_edit(&id),
            None => false,
        }
    }

    /// Start editing a text element, seeding the buffer with its content.
    pub fn begin_text_edit(&mut self, id: &ElementId) -> bool {
        let editable = self
            .store
            .get(id)
            .is_some_and(|e| e.kind == ElementKind::Text && !e.locked);
        if !editable {
            return false;
        }
        if self.text_edit.is_some() {
            self.commit_text_edit();
        }
        let buffer = self.store.get(id).map(|e| e.text.clone()).unwrap_or_default();
        self.text_edit = Some(TextEdit {
            id: id.clone(),
            buffer,
        });
        self.changes.push(Change::TextEdit(id.clone()));
        true
    }

    /// Replace the uncommitted text.
    pub fn set_text_edit_buffer(&mut self, text: &str) -> bool {
        match &mut self.text_edit {
            Some(edit) => {
                edit.buffer = text.to_string();
                self.changes.push(Change::TextEdit(edit.id.clone()));
                true
            }
            None => false,
        }
    }

    /// Commit the text edit. Content is trimmed; empty content falls back to
    /// the placeholder.
    pub fn commit_text_edit(&mut self) -> bool {
        let Some(edit) = self.text_edit.take() else {
            return false;
        };
        self.changes.push(Change::TextEdit(edit.id.clone()));
        self.mutate(&edit.id, ElementField::Text(text_or_placeholder(edit.buffer.trim())))
    }

    /// Drop the text edit without changing the element.
    pub fn cancel_text_edit(&mut self) -> bool {
        match self.text_edit.take() {
            Some(edit) => {
                self.changes.push(Change::TextEdit(edit.id));
                true
            }
            None => false,
        }
    }
}

fn text_or_placeholder(text: &str) -> String {
    if text.is_empty() {
        PLACEHOLDER_TEXT.to_string()
    } else {
        text.to_string()
    }
}
