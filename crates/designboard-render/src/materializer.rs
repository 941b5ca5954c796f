//! Keeps a [`ViewTree`] in step with an editor session.
//!
//! A full rebuild regenerates every visual and is used after bulk loads and
//! clears. Everything else is an incremental patch of the affected visuals,
//! which leaves an in-progress text edit untouched.

use crate::visual::{SelectionStyle, StrokeOverlay, ViewTree, Visual};
use designboard_core::{Change, Editor, ElementId};
use kurbo::Size;

/// Work done by a materializer, for diagnostics and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaterializeStats {
    pub rebuilds: usize,
    pub patches: usize,
    pub removals: usize,
}

pub struct ViewMaterializer {
    tree: ViewTree,
    stats: MaterializeStats,
}

impl ViewMaterializer {
    pub fn new(canvas_size: Size) -> Self {
        Self {
            tree: ViewTree::new(canvas_size),
            stats: MaterializeStats::default(),
        }
    }

    /// Create a materializer already showing `editor`.
    pub fn for_editor(editor: &Editor) -> Self {
        let mut materializer = Self::new(editor.config().canvas_size);
        materializer.rebuild(editor);
        materializer
    }

    pub fn tree(&self) -> &ViewTree {
        &self.tree
    }

    pub fn stats(&self) -> MaterializeStats {
        self.stats
    }

    /// Drain the editor's pending changes and apply them.
    pub fn sync(&mut self, editor: &mut Editor) -> usize {
        let changes = editor.take_changes();
        self.apply(editor, &changes);
        changes.len()
    }

    /// Apply a batch of changes. A full rebuild anywhere in the batch
    /// supersedes the rest of it.
    pub fn apply(&mut self, editor: &Editor, changes: &[Change]) {
        if changes.contains(&Change::FullRebuild) {
            self.rebuild(editor);
            return;
        }
        for change in changes {
            match change {
                Change::FullRebuild => {}
                Change::Element(id) | Change::TextEdit(id) => {
                    self.update_element(editor, id);
                }
                Change::Removed(id) => self.remove_element(id),
                Change::Selection => self.restyle_selection(editor),
                Change::Stroke => self.refresh_stroke(editor),
            }
        }
    }

    /// Discard every visual and regenerate from the store.
    pub fn rebuild(&mut self, editor: &Editor) {
        self.tree.clear();
        self.tree.set_canvas_size(editor.config().canvas_size);
        for element in editor.elements() {
            let visual = Visual::from_element(element, selection_style(editor, &element.id), edit_buffer(editor, &element.id));
            self.tree.upsert(visual);
        }
        self.refresh_stroke(editor);
        self.stats.rebuilds += 1;
        log::debug!("View rebuilt with {} visuals", self.tree.len());
    }

    /// Patch the visual of one element. An element that no longer exists
    /// is removed. Returns whether a visual is present afterwards.
    pub fn update_element(&mut self, editor: &Editor, id: &ElementId) -> bool {
        let Some(element) = editor.element(id) else {
            self.remove_element(id);
            return false;
        };
        let visual = Visual::from_element(element, selection_style(editor, id), edit_buffer(editor, id));
        self.tree.upsert(visual);
        self.stats.patches += 1;
        true
    }

    pub fn remove_element(&mut self, id: &ElementId) {
        if self.tree.remove(id).is_some() {
            self.stats.removals += 1;
        }
    }

    /// Recompute the selection outline of every visual.
    pub fn restyle_selection(&mut self, editor: &Editor) {
        let multi = editor.selection().is_multi(editor.store());
        let selection = editor.selection();
        for visual in self.tree.visuals_mut() {
            visual.selection = SelectionStyle::for_membership(selection.contains(&visual.id), multi);
        }
    }

    /// Mirror the in-progress freehand stroke, if any.
    pub fn refresh_stroke(&mut self, editor: &Editor) {
        self.tree
            .set_overlay(editor.freehand_preview().map(StrokeOverlay::from_capture));
    }
}

fn selection_style(editor: &Editor, id: &ElementId) -> SelectionStyle {
    let selection = editor.selection();
    SelectionStyle::for_membership(selection.contains(id), selection.is_multi(editor.store()))
}

fn edit_buffer<'a>(editor: &'a Editor, id: &ElementId) -> Option<&'a str> {
    editor
        .text_edit()
        .filter(|edit| &edit.id == id)
        .map(|edit| edit.buffer.as_str())
}
