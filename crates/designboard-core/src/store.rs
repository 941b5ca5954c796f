//! Element store: the canonical list of elements plus identity and z-order
//! allocation.

use crate::config::{EditorConfig, clamp_axis};
use crate::element::{Element, ElementId, ElementKind, PALETTE, TRANSPARENT};
use kurbo::{Point, Rect, Size};

/// Cascade step between consecutively created elements.
const CASCADE_STEP: f64 = 25.0;
/// Number of cascade steps before the offset wraps around.
const CASCADE_CYCLE: usize = 8;
/// Origin of the first cascaded element.
const CASCADE_ORIGIN: f64 = 60.0;

/// A single-field change applied through [`ElementStore::mutate`].
#[derive(Debug, Clone, PartialEq)]
pub enum ElementField {
    X(f64),
    Y(f64),
    Width(f64),
    Height(f64),
    Rotation(f64),
    Fill(String),
    Text(String),
    ImageSrc(String),
    DrawColor(String),
    DrawSize(f64),
}

/// Owns every element of the design.
///
/// Elements are kept in insertion order, which is also snapshot order.
/// Layering is carried by each element's `z_index`, kept dense (`1..=len`).
#[derive(Debug, Clone, Default)]
pub struct ElementStore {
    elements: Vec<Element>,
    /// Last identity suffix handed out. Never decreases except on clear.
    counter: u64,
}

impl ElementStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from loaded elements.
    ///
    /// The identity counter resumes after the largest numeric suffix seen and
    /// z-order is renumbered densely, preserving relative order.
    pub fn from_elements(elements: Vec<Element>) -> Self {
        let counter = elements
            .iter()
            .filter_map(|e| e.id.counter_suffix())
            .max()
            .unwrap_or(0);
        let mut store = Self { elements, counter };
        store.normalize_z_order();
        store
    }

    /// Hand out a fresh identity.
    pub fn allocate_id(&mut self) -> ElementId {
        self.counter += 1;
        ElementId::from_counter(self.counter)
    }

    /// Last allocated identity suffix.
    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Create a new element of `kind` with cascaded placement, cycled fill and
    /// the topmost z-order, and add it to the store.
    pub fn create(&mut self, kind: ElementKind, config: &EditorConfig) -> &Element {
        let count = self.elements.len();
        let id = self.allocate_id();
        let offset = (count % CASCADE_CYCLE) as f64 * CASCADE_STEP;
        let canvas = config.canvas_size;
        let default = kind.default_size();
        let size = if kind.keeps_aspect() {
            let side = default.width.min(canvas.width.min(canvas.height));
            Size::new(side, side)
        } else {
            Size::new(default.width.min(canvas.width), default.height.min(canvas.height))
        };
        let origin = config.clamp_origin(
            Point::new(CASCADE_ORIGIN + offset, CASCADE_ORIGIN + offset),
            size,
        );
        let fill = if kind.starts_transparent() {
            TRANSPARENT
        } else {
            PALETTE[count % PALETTE.len()]
        };

        let element = Element::new(id, kind, origin, size, self.next_z())
            .with_fill(fill)
            .with_brush(config.freehand_color.clone(), config.freehand_size);
        log::debug!("Created {} {:?} at ({}, {})", element.id, kind, origin.x, origin.y);
        self.elements.push(element);
        &self.elements[count]
    }

    /// Insert a fully formed element on top of the stack.
    pub fn push_top(&mut self, mut element: Element) -> &Element {
        element.z_index = self.next_z();
        self.elements.push(element);
        let last = self.elements.len() - 1;
        &self.elements[last]
    }

    /// z-order the next top element receives.
    pub fn next_z(&self) -> u32 {
        self.elements.len() as u32 + 1
    }

    /// Remove every element whose identity is in `ids` and re-pack z-order.
    /// Returns the removed elements.
    pub fn delete(&mut self, ids: &[ElementId]) -> Vec<Element> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.elements)
            .into_iter()
            .partition(|e| ids.contains(&e.id));
        self.elements = kept;
        if !removed.is_empty() {
            self.normalize_z_order();
        }
        removed
    }

    /// Remove everything and reset the identity counter.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.counter = 0;
    }

    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| &e.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| &e.id == id)
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.get(id).is_some()
    }

    /// Elements in insertion (snapshot) order.
    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    /// Elements as a slice, in insertion order.
    pub fn as_slice(&self) -> &[Element] {
        &self.elements
    }

    /// Elements from bottom to top.
    pub fn by_z_ascending(&self) -> Vec<&Element> {
        let mut sorted: Vec<&Element> = self.elements.iter().collect();
        sorted.sort_by_key(|e| e.z_index);
        sorted
    }

    /// Elements from top to bottom.
    pub fn by_z_descending(&self) -> Vec<&Element> {
        let mut sorted = self.by_z_ascending();
        sorted.reverse();
        sorted
    }

    /// Topmost element whose body contains `point`.
    pub fn element_at(&self, point: Point) -> Option<&Element> {
        self.by_z_descending().into_iter().find(|e| e.hit_test(point))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Apply a single field change. Geometry is re-clamped to the canvas.
    /// Returns false if the element is missing, locked, or the field does not
    /// apply to its type.
    pub fn mutate(&mut self, id: &ElementId, field: ElementField, config: &EditorConfig) -> bool {
        let Some(element) = self.get_mut(id) else {
            return false;
        };
        if element.locked {
            log::debug!("Ignoring {:?} on locked {}", field, id);
            return false;
        }

        match field {
            ElementField::X(x) => {
                element.x = clamp_axis(x, element.width, config.canvas_size.width);
            }
            ElementField::Y(y) => {
                element.y = clamp_axis(y, element.height, config.canvas_size.height);
            }
            ElementField::Width(width) => {
                let height = if element.kind.keeps_aspect() { width } else { element.height };
                resize_from_origin(element, Size::new(width, height), config);
            }
            ElementField::Height(height) => {
                let width = if element.kind.keeps_aspect() { height } else { element.width };
                resize_from_origin(element, Size::new(width, height), config);
            }
            ElementField::Rotation(rotation) => {
                element.rotation = rotation.clamp(0.0, 360.0);
            }
            ElementField::Fill(fill) => {
                if !element.kind.has_editable_fill() {
                    return false;
                }
                element.styles.background = fill;
            }
            ElementField::Text(text) => {
                if element.kind != ElementKind::Text {
                    return false;
                }
                element.text = text;
            }
            ElementField::ImageSrc(src) => {
                if element.kind != ElementKind::Image {
                    return false;
                }
                element.image_src = src;
            }
            ElementField::DrawColor(color) => {
                if element.kind != ElementKind::Freehand {
                    return false;
                }
                element.draw_color = color;
            }
            ElementField::DrawSize(size) => {
                if element.kind != ElementKind::Freehand {
                    return false;
                }
                element.draw_size = size;
            }
        }
        true
    }

    /// Move an element's origin, clamped to the canvas.
    pub fn set_origin(&mut self, id: &ElementId, origin: Point, config: &EditorConfig) -> bool {
        match self.get_mut(id) {
            Some(element) if !element.locked => {
                let origin = config.clamp_origin(origin, element.size());
                element.x = origin.x;
                element.y = origin.y;
                true
            }
            _ => false,
        }
    }

    /// Replace an element's position and size together.
    pub fn set_frame(&mut self, id: &ElementId, frame: Rect, config: &EditorConfig) -> bool {
        match self.get_mut(id) {
            Some(element) if !element.locked => {
                apply_frame(element, frame, config);
                true
            }
            _ => false,
        }
    }

    /// Set the lock flag. Allowed regardless of the current lock state.
    pub fn set_locked(&mut self, id: &ElementId, locked: bool) -> bool {
        match self.get_mut(id) {
            Some(element) => {
                element.locked = locked;
                true
            }
            None => false,
        }
    }

    /// Swap an element with the one directly above it.
    pub fn move_up(&mut self, id: &ElementId) -> bool {
        let Some(z) = self.get(id).map(|e| e.z_index) else {
            return false;
        };
        if z >= self.len() as u32 {
            return false;
        }
        self.swap_z(z, z + 1)
    }

    /// Swap an element with the one directly below it.
    pub fn move_down(&mut self, id: &ElementId) -> bool {
        let Some(z) = self.get(id).map(|e| e.z_index) else {
            return false;
        };
        if z <= 1 {
            return false;
        }
        self.swap_z(z, z - 1)
    }

    fn swap_z(&mut self, a: u32, b: u32) -> bool {
        let ia = self.elements.iter().position(|e| e.z_index == a);
        let ib = self.elements.iter().position(|e| e.z_index == b);
        match (ia, ib) {
            (Some(ia), Some(ib)) => {
                self.elements[ia].z_index = b;
                self.elements[ib].z_index = a;
                true
            }
            _ => false,
        }
    }

    /// Renumber z-order to `1..=len`, keeping relative order. Ties keep
    /// insertion order.
    pub fn normalize_z_order(&mut self) {
        let mut order: Vec<usize> = (0..self.elements.len()).collect();
        order.sort_by_key(|&i| (self.elements[i].z_index, i));
        for (rank, index) in order.into_iter().enumerate() {
            self.elements[index].z_index = rank as u32 + 1;
        }
    }

    /// Clamp every element into the canvas. Used after loading.
    pub(crate) fn clamp_all(&mut self, config: &EditorConfig) {
        for element in &mut self.elements {
            let size = Size::new(
                element.width.min(config.canvas_size.width).max(0.0),
                element.height.min(config.canvas_size.height).max(0.0),
            );
            let origin = config.clamp_origin(element.origin(), size);
            element.x = origin.x;
            element.y = origin.y;
            element.width = size.width;
            element.height = size.height;
        }
    }
}

/// Fit a frame to the canvas and the minimum size, then store it on the
/// element. A frame that would cross the far edge keeps its size and slides
/// back onto the canvas.
fn apply_frame(element: &mut Element, frame: Rect, config: &EditorConfig) {
    let canvas = config.canvas_size;
    let mut width = frame.width().max(config.min_width).min(canvas.width);
    let mut height = frame.height().max(config.min_height).min(canvas.height);
    if element.kind.keeps_aspect() {
        let side = width.max(height).min(canvas.width.min(canvas.height));
        width = side;
        height = side;
    }
    element.x = clamp_axis(frame.x0, width, canvas.width);
    element.y = clamp_axis(frame.y0, height, canvas.height);
    element.width = width;
    element.height = height;
}

/// Resize in place: the origin stays put, the size is floored at the
/// minimum and capped at the canvas edge. Circles take the requested side,
/// capped by the nearer of the two edges.
fn resize_from_origin(element: &mut Element, size: Size, config: &EditorConfig) {
    let max_width = config.canvas_size.width - element.x;
    let max_height = config.canvas_size.height - element.y;
    if element.kind.keeps_aspect() {
        let side = size
            .width
            .max(config.min_width.max(config.min_height))
            .min(max_width.min(max_height));
        element.width = side;
        element.height = side;
    } else {
        element.width = size.width.max(config.min_width).min(max_width);
        element.height = size.height.max(config.min_height).min(max_height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EditorConfig {
        EditorConfig::default()
    }

    fn z_orders(store: &ElementStore) -> Vec<u32> {
        let mut z: Vec<u32> = store.iter().map(|e| e.z_index).collect();
        z.sort_unstable();
        z
    }

    #[test]
    fn test_create_defaults() {
        let mut store = ElementStore::new();
        let rect = store.create(ElementKind::Rect, &config()).clone();
        assert_eq!(rect.id.as_str(), "el_1");
        assert_eq!(rect.z_index, 1);
        assert!((rect.x - 60.0).abs() < f64::EPSILON);
        assert!((rect.width - 160.0).abs() < f64::EPSILON);
        assert_eq!(rect.styles.background, PALETTE[0]);

        let text = store.create(ElementKind::Text, &config()).clone();
        assert_eq!(text.z_index, 2);
        assert!((text.x - 85.0).abs() < f64::EPSILON);
        assert_eq!(text.styles.background, TRANSPARENT);
    }

    #[test]
    fn test_cascade_wraps() {
        let mut store = ElementStore::new();
        for _ in 0..8 {
            store.create(ElementKind::Circle, &config());
        }
        let ninth = store.create(ElementKind::Circle, &config());
        assert!((ninth.x - 60.0).abs() < f64::EPSILON);
        assert_eq!(ninth.styles.background, PALETTE[0]);
    }

    #[test]
    fn test_ids_never_reused() {
        let mut store = ElementStore::new();
        let a = store.create(ElementKind::Rect, &config()).id.clone();
        store.delete(&[a]);
        let b = store.create(ElementKind::Rect, &config()).id.clone();
        assert_eq!(b.as_str(), "el_2");
    }

    #[test]
    fn test_z_dense_after_creation() {
        let mut store = ElementStore::new();
        for kind in ElementKind::ALL {
            if kind != ElementKind::Freehand {
                store.create(kind, &config());
            }
        }
        assert_eq!(z_orders(&store), (1..=7).collect::<Vec<u32>>());
    }

    #[test]
    fn test_delete_compacts_z() {
        let mut store = ElementStore::new();
        let ids: Vec<ElementId> = (0..4)
            .map(|_| store.create(ElementKind::Rect, &config()).id.clone())
            .collect();
        store.delete(&[ids[1].clone()]);
        assert_eq!(z_orders(&store), vec![1, 2, 3]);
        assert_eq!(store.get(&ids[3]).unwrap().z_index, 3);
        assert_eq!(store.get(&ids[2]).unwrap().z_index, 2);
    }

    #[test]
    fn test_move_up_down() {
        let mut store = ElementStore::new();
        let a = store.create(ElementKind::Rect, &config()).id.clone();
        let b = store.create(ElementKind::Rect, &config()).id.clone();
        let c = store.create(ElementKind::Rect, &config()).id.clone();

        assert!(!store.move_up(&c));
        assert!(!store.move_down(&a));

        assert!(store.move_up(&b));
        assert_eq!(store.get(&b).unwrap().z_index, 3);
        assert_eq!(store.get(&c).unwrap().z_index, 2);
        assert_eq!(store.get(&a).unwrap().z_index, 1);

        assert!(store.move_down(&b));
        assert_eq!(store.get(&b).unwrap().z_index, 2);
        assert_eq!(store.get(&c).unwrap().z_index, 3);
        assert_eq!(z_orders(&store), vec![1, 2, 3]);
    }

    #[test]
    fn test_mutate_clamps_position() {
        let mut store = ElementStore::new();
        let id = store.create(ElementKind::Rect, &config()).id.clone();
        assert!(store.mutate(&id, ElementField::X(5000.0), &config()));
        assert!(store.mutate(&id, ElementField::Y(-20.0), &config()));
        let el = store.get(&id).unwrap();
        assert!((el.x - (1200.0 - 160.0)).abs() < f64::EPSILON);
        assert!((el.y - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_mutate_width_keeps_on_canvas() {
        let mut store = ElementStore::new();
        let id = store.create(ElementKind::Rect, &config()).id.clone();
        store.mutate(&id, ElementField::X(1150.0), &config());
        store.mutate(&id, ElementField::Width(10.0), &config());
        let el = store.get(&id).unwrap();
        assert!(el.width >= 40.0);
        assert!(el.x + el.width <= 1200.0);
    }

    #[test]
    fn test_create_fits_small_canvas() {
        let small = EditorConfig::default().with_canvas_size(100.0, 100.0);
        let mut store = ElementStore::new();
        for kind in [ElementKind::Rect, ElementKind::Circle, ElementKind::Image] {
            let el = store.create(kind, &small);
            assert!(el.x >= 0.0 && el.y >= 0.0);
            assert!(el.x + el.width <= 100.0 + f64::EPSILON);
            assert!(el.y + el.height <= 100.0 + f64::EPSILON);
        }
        let wide = EditorConfig::default().with_canvas_size(300.0, 80.0);
        let circle = store.create(ElementKind::Circle, &wide);
        assert!((circle.width - 80.0).abs() < f64::EPSILON);
        assert!((circle.height - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_circle_size_write_keeps_origin() {
        let mut store = ElementStore::new();
        let id = store.create(ElementKind::Circle, &config()).id.clone();
        assert!(store.mutate(&id, ElementField::Width(60.0), &config()));
        let el = store.get(&id).unwrap();
        assert!((el.width - 60.0).abs() < f64::EPSILON);
        assert!((el.height - 60.0).abs() < f64::EPSILON);

        store.mutate(&id, ElementField::X(1080.0), &config());
        let (x, y) = {
            let el = store.get(&id).unwrap();
            (el.x, el.y)
        };
        assert!((x - 1080.0).abs() < f64::EPSILON);
        assert!(store.mutate(&id, ElementField::Height(300.0), &config()));
        let el = store.get(&id).unwrap();
        assert!((el.x - x).abs() < f64::EPSILON);
        assert!((el.y - y).abs() < f64::EPSILON);
        assert!((el.width - 120.0).abs() < f64::EPSILON);
        assert!((el.height - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_locked_rejects_mutation() {
        let mut store = ElementStore::new();
        let id = store.create(ElementKind::Rect, &config()).id.clone();
        store.set_locked(&id, true);
        assert!(!store.mutate(&id, ElementField::X(300.0), &config()));
        assert!(!store.set_origin(&id, Point::new(300.0, 300.0), &config()));
        assert!((store.get(&id).unwrap().x - 60.0).abs() < f64::EPSILON);

        store.set_locked(&id, false);
        assert!(store.mutate(&id, ElementField::X(300.0), &config()));
        assert!((store.get(&id).unwrap().x - 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_field_applicability() {
        let mut store = ElementStore::new();
        let image = store.create(ElementKind::Image, &config()).id.clone();
        assert!(!store.mutate(&image, ElementField::Fill("#000".into()), &config()));
        assert!(!store.mutate(&image, ElementField::Text("x".into()), &config()));
        assert!(store.mutate(&image, ElementField::ImageSrc("data:image/png;base64,AA==".into()), &config()));
    }

    #[test]
    fn test_from_elements_resumes_counter() {
        let mut store = ElementStore::new();
        store.create(ElementKind::Rect, &config());
        let mut elements: Vec<Element> = store.iter().cloned().collect();
        elements[0].id = ElementId::from_counter(17);
        let mut restored = ElementStore::from_elements(elements);
        assert_eq!(restored.allocate_id().as_str(), "el_18");
    }

    #[test]
    fn test_normalize_z_with_gaps() {
        let mut store = ElementStore::new();
        for _ in 0..3 {
            store.create(ElementKind::Rect, &config());
        }
        let mut elements: Vec<Element> = store.iter().cloned().collect();
        elements[0].z_index = 9;
        elements[1].z_index = 2;
        elements[2].z_index = 5;
        let restored = ElementStore::from_elements(elements);
        let z: Vec<u32> = restored.iter().map(|e| e.z_index).collect();
        assert_eq!(z, vec![3, 1, 2]);
    }

    #[test]
    fn test_element_at_prefers_top() {
        let mut store = ElementStore::new();
        let a = store.create(ElementKind::Rect, &config()).id.clone();
        let b = store.create(ElementKind::Rect, &config()).id.clone();
        // Both cover (100, 100); b sits on top.
        assert_eq!(store.element_at(Point::new(100.0, 100.0)).unwrap().id, b);
        store.move_down(&b);
        assert_eq!(store.element_at(Point::new(100.0, 100.0)).unwrap().id, a);
        assert!(store.element_at(Point::new(1100.0, 700.0)).is_none());
    }
}
