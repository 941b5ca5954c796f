//! Selection set and resize handles.

use crate::element::{Element, ElementId};
use crate::store::ElementStore;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Corner resize handle. The letters name the edges the handle moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    Nw,
    Ne,
    Sw,
    Se,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 4] = [
        ResizeHandle::Nw,
        ResizeHandle::Ne,
        ResizeHandle::Sw,
        ResizeHandle::Se,
    ];

    /// Handle moves the west (left) edge.
    pub fn moves_west(self) -> bool {
        matches!(self, ResizeHandle::Nw | ResizeHandle::Sw)
    }

    /// Handle moves the east (right) edge.
    pub fn moves_east(self) -> bool {
        !self.moves_west()
    }

    /// Handle moves the north (top) edge.
    pub fn moves_north(self) -> bool {
        matches!(self, ResizeHandle::Nw | ResizeHandle::Ne)
    }

    /// Handle moves the south (bottom) edge.
    pub fn moves_south(self) -> bool {
        !self.moves_north()
    }

    /// Handle position in canvas coordinates, following the element's rotation.
    pub fn position(self, element: &Element) -> Point {
        let bounds = element.bounds();
        let corner = match self {
            ResizeHandle::Nw => Point::new(bounds.x0, bounds.y0),
            ResizeHandle::Ne => Point::new(bounds.x1, bounds.y0),
            ResizeHandle::Sw => Point::new(bounds.x0, bounds.y1),
            ResizeHandle::Se => Point::new(bounds.x1, bounds.y1),
        };
        element.rotation_transform() * corner
    }

    /// Check if a point hits this handle within `tolerance`.
    pub fn hit_test(self, element: &Element, point: Point, tolerance: f64) -> bool {
        self.position(element).distance_squared(point) <= tolerance * tolerance
    }
}

/// Find which handle of `element`, if any, is under `point`.
pub fn hit_test_handles(element: &Element, point: Point, tolerance: f64) -> Option<ResizeHandle> {
    ResizeHandle::ALL
        .into_iter()
        .find(|handle| handle.hit_test(element, point, tolerance))
}

/// The set of selected element identities.
///
/// Membership is kept in insertion order so that [`Selection::primary`] is
/// stable. Identities are weak: queries that take the store drop any that no
/// longer resolve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<ElementId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear and select exactly `id`. Selects nothing if `id` is absent.
    pub fn select_only(&mut self, id: Option<ElementId>) {
        self.ids.clear();
        if let Some(id) = id {
            self.ids.push(id);
        }
    }

    /// Add `id` if absent, remove it if present.
    pub fn toggle(&mut self, id: ElementId) {
        if let Some(pos) = self.ids.iter().position(|s| *s == id) {
            self.ids.remove(pos);
        } else {
            self.ids.push(id);
        }
    }

    /// Union-add identities.
    pub fn select_many(&mut self, ids: impl IntoIterator<Item = ElementId>) {
        for id in ids {
            if !self.ids.contains(&id) {
                self.ids.push(id);
            }
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.ids.contains(id)
    }

    /// Drop identities the store no longer knows about.
    pub fn prune(&mut self, store: &ElementStore) {
        let before = self.ids.len();
        self.ids.retain(|id| store.contains(id));
        if self.ids.len() != before {
            log::debug!("Pruned {} stale selection entries", before - self.ids.len());
        }
    }

    /// Live selected identities, in insertion order.
    pub fn ids<'a>(&'a self, store: &'a ElementStore) -> impl Iterator<Item = &'a ElementId> + 'a {
        self.ids.iter().filter(move |id| store.contains(id))
    }

    /// Live selected elements, in insertion order.
    pub fn elements<'a>(&'a self, store: &'a ElementStore) -> impl Iterator<Item = &'a Element> + 'a {
        self.ids.iter().filter_map(move |id| store.get(id))
    }

    pub fn len(&self, store: &ElementStore) -> usize {
        self.ids(store).count()
    }

    pub fn is_empty(&self, store: &ElementStore) -> bool {
        self.len(store) == 0
    }

    pub fn is_multi(&self, store: &ElementStore) -> bool {
        self.len(store) > 1
    }

    /// First-inserted live member.
    pub fn primary<'a>(&self, store: &'a ElementStore) -> Option<&'a Element> {
        self.ids.iter().find_map(|id| store.get(id))
    }

    /// The selected element when exactly one is selected.
    pub fn single<'a>(&self, store: &'a ElementStore) -> Option<&'a Element> {
        if self.len(store) == 1 {
            self.primary(store)
        } else {
            None
        }
    }

    /// Snapshot of the live identities.
    pub fn to_vec(&self, store: &ElementStore) -> Vec<ElementId> {
        self.ids(store).cloned().collect()
    }
}
