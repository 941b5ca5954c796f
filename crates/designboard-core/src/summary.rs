//! Read-only views of the session for panels: selection label, toolbar
//! state, layer list and properties form.

use crate::element::{Element, ElementId, ElementKind};
use crate::selection::Selection;
use crate::store::ElementStore;
use serde::Serialize;

/// One row of the layer list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSummary {
    pub id: ElementId,
    pub kind: ElementKind,
    pub icon: &'static str,
    pub name: String,
    /// Rounded pixel size, e.g. `160 × 110`.
    pub dimensions: String,
    pub z_index: u32,
    pub locked: bool,
    pub selected: bool,
    /// Selected as part of a multi-selection.
    pub multi: bool,
}

/// Enabled state of selection-dependent toolbar actions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ToolbarState {
    pub selection_count: usize,
    /// Replace is offered for a single unlocked text or image element.
    pub replace_enabled: bool,
    pub lock_enabled: bool,
    /// Lock icon state; only a single locked selection shows as locked.
    pub primary_locked: bool,
}

/// Editable fields of a single selected element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyFields {
    pub id: ElementId,
    pub kind: ElementKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    /// Present when the type has an editable fill.
    pub fill: Option<String>,
    /// Present for text elements.
    pub text: Option<String>,
    /// Present for freehand strokes.
    pub stroke: Option<(String, f64)>,
}

/// What the properties form should show.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PropertiesView {
    None,
    Locked { kind: ElementKind },
    Single(PropertyFields),
    /// Shared fill and rotation editing.
    Multi { count: usize },
}

/// Status line describing the selection.
pub fn selection_label(store: &ElementStore, selection: &Selection) -> String {
    match selection.len(store) {
        0 => "No selection".to_string(),
        1 => match selection.primary(store) {
            Some(element) => format!("{} selected", element.kind.label()),
            None => "Selected".to_string(),
        },
        n => format!("{} elements selected", n),
    }
}

pub fn toolbar_state(store: &ElementStore, selection: &Selection) -> ToolbarState {
    let count = selection.len(store);
    let single = selection.single(store);
    ToolbarState {
        selection_count: count,
        replace_enabled: single.is_some_and(can_replace),
        lock_enabled: count > 0,
        primary_locked: single.is_some_and(|e| e.locked),
    }
}

/// Whether replace applies to `element`.
pub fn can_replace(element: &Element) -> bool {
    !element.locked && matches!(element.kind, ElementKind::Text | ElementKind::Image)
}

/// Layer list, topmost first.
pub fn layers(store: &ElementStore, selection: &Selection) -> Vec<LayerSummary> {
    let multi = selection.is_multi(store);
    store
        .by_z_descending()
        .into_iter()
        .map(|element| {
            let selected = selection.contains(&element.id);
            LayerSummary {
                id: element.id.clone(),
                kind: element.kind,
                icon: element.kind.icon(),
                name: element.display_name(),
                dimensions: format!("{} × {}", element.width.round(), element.height.round()),
                z_index: element.z_index,
                locked: element.locked,
                selected,
                multi: selected && multi,
            }
        })
        .collect()
}

pub fn properties(store: &ElementStore, selection: &Selection) -> PropertiesView {
    let count = selection.len(store);
    if count > 1 {
        return PropertiesView::Multi { count };
    }
    let Some(element) = selection.primary(store) else {
        return PropertiesView::None;
    };
    if element.locked {
        return PropertiesView::Locked { kind: element.kind };
    }
    PropertiesView::Single(PropertyFields {
        id: element.id.clone(),
        kind: element.kind,
        x: element.x.round(),
        y: element.y.round(),
        width: element.width,
        height: element.height,
        rotation: element.rotation,
        fill: element
            .kind
            .has_editable_fill()
            .then(|| element.styles.background.clone()),
        text: (element.kind == ElementKind::Text).then(|| element.text.clone()),
        stroke: (element.kind == ElementKind::Freehand)
            .then(|| (element.draw_color.clone(), element.draw_size)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;

    fn setup() -> (ElementStore, Vec<ElementId>) {
        let config = EditorConfig::default();
        let mut store = ElementStore::new();
        let ids = [ElementKind::Rect, ElementKind::Text, ElementKind::Image]
            .into_iter()
            .map(|kind| store.create(kind, &config).id.clone())
            .collect();
        (store, ids)
    }

    #[test]
    fn test_selection_label() {
        let (store, ids) = setup();
        let mut selection = Selection::new();
        assert_eq!(selection_label(&store, &selection), "No selection");
        selection.select_only(Some(ids[0].clone()));
        assert_eq!(selection_label(&store, &selection), "Rectangle selected");
        selection.toggle(ids[1].clone());
        assert_eq!(selection_label(&store, &selection), "2 elements selected");
    }

    #[test]
    fn test_toolbar_replace_rules() {
        let (mut store, ids) = setup();
        let mut selection = Selection::new();

        selection.select_only(Some(ids[0].clone()));
        assert!(!toolbar_state(&store, &selection).replace_enabled);

        selection.select_only(Some(ids[1].clone()));
        let state = toolbar_state(&store, &selection);
        assert!(state.replace_enabled && state.lock_enabled);

        store.set_locked(&ids[1], true);
        let state = toolbar_state(&store, &selection);
        assert!(!state.replace_enabled);
        assert!(state.primary_locked);

        selection.select_many([ids[2].clone()]);
        let state = toolbar_state(&store, &selection);
        assert!(!state.replace_enabled);
        assert!(!state.primary_locked);
        assert_eq!(state.selection_count, 2);
    }

    #[test]
    fn test_layers_descending() {
        let (store, ids) = setup();
        let mut selection = Selection::new();
        selection.select_many([ids[0].clone(), ids[2].clone()]);
        let rows = layers(&store, &selection);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].id, ids[2]);
        assert_eq!(rows[2].id, ids[0]);
        assert_eq!(rows[1].name, "Double click to edit");
        assert_eq!(rows[2].dimensions, "160 × 110");
        assert!(rows[0].selected && rows[0].multi);
        assert!(!rows[1].selected);
    }

    #[test]
    fn test_properties_views() {
        let (mut store, ids) = setup();
        let mut selection = Selection::new();
        assert_eq!(properties(&store, &selection), PropertiesView::None);

        selection.select_only(Some(ids[2].clone()));
        match properties(&store, &selection) {
            PropertiesView::Single(fields) => {
                assert_eq!(fields.kind, ElementKind::Image);
                assert!(fields.fill.is_none());
                assert!(fields.text.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }

        store.set_locked(&ids[2], true);
        assert_eq!(
            properties(&store, &selection),
            PropertiesView::Locked { kind: ElementKind::Image }
        );

        selection.toggle(ids[0].clone());
        assert_eq!(properties(&store, &selection), PropertiesView::Multi { count: 2 });
    }
}
