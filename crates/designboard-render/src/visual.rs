//! Retained visual representation of the element store.

use crate::color::parse_color;
use designboard_core::element::PLACEHOLDER_TEXT;
use designboard_core::{Element, ElementId, ElementKind, FreehandCapture, ResizeHandle};
use kurbo::{Affine, Point, Rect, Size, Vec2};
use peniko::Color;
use std::collections::HashMap;

/// Corner radius of rectangle bodies.
pub const RECT_CORNER_RADIUS: f64 = 4.0;

/// Prompt shown by image elements without a bitmap.
pub const IMAGE_PLACEHOLDER_LABEL: &str = "Click to upload image";

/// Color of the disc cut out of a crescent.
pub const CRESCENT_MASK_COLOR: Color = Color::WHITE;

/// Default canvas background.
pub const CANVAS_BACKGROUND: Color = Color::WHITE;

/// Outline drawn around selected elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionStyle {
    #[default]
    None,
    /// Sole selected element.
    Single,
    /// Member of a multi-selection.
    Multi,
}

impl SelectionStyle {
    pub fn for_membership(selected: bool, multi: bool) -> Self {
        match (selected, multi) {
            (false, _) => SelectionStyle::None,
            (true, false) => SelectionStyle::Single,
            (true, true) => SelectionStyle::Multi,
        }
    }

    pub fn is_selected(self) -> bool {
        self != SelectionStyle::None
    }
}

/// Body outline of filled shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rounding {
    /// Rounded rectangle with the given corner radius.
    Corners(f64),
    /// Fully rounded: the ellipse inscribed in the frame.
    Full,
}

/// Type-specific content of a visual.
#[derive(Debug, Clone, PartialEq)]
pub enum VisualBody {
    Shape { fill: Color, rounding: Rounding },
    /// Square body rotated 45 degrees about the frame center.
    Diamond { fill: Color },
    /// Disc with a smaller offset disc masked out. `mask` is in canvas space.
    Crescent { fill: Color, mask: Rect },
    /// Bitmap scaled to cover the frame.
    Image { src: String },
    ImagePlaceholder { label: &'static str },
    /// Text content. While editing, `content` is the uncommitted buffer.
    Text { content: String, editing: bool },
    /// Freehand samples as filled dots, centers in canvas space.
    Dots { dots: Vec<Point>, color: Color, diameter: f64 },
}

impl VisualBody {
    fn for_element(element: &Element, edit_buffer: Option<&str>) -> Self {
        let fill = parse_color(&element.styles.background);
        match element.kind {
            ElementKind::Rect => VisualBody::Shape {
                fill,
                rounding: Rounding::Corners(RECT_CORNER_RADIUS),
            },
            ElementKind::Circle | ElementKind::Ellipse => VisualBody::Shape {
                fill,
                rounding: Rounding::Full,
            },
            ElementKind::Diamond => VisualBody::Diamond { fill },
            ElementKind::Crescent => VisualBody::Crescent {
                fill,
                mask: crescent_mask(element.bounds()),
            },
            ElementKind::Image if element.image_src.is_empty() => VisualBody::ImagePlaceholder {
                label: IMAGE_PLACEHOLDER_LABEL,
            },
            ElementKind::Image => VisualBody::Image {
                src: element.image_src.clone(),
            },
            ElementKind::Text => match edit_buffer {
                Some(buffer) => VisualBody::Text {
                    content: buffer.to_string(),
                    editing: true,
                },
                None => VisualBody::Text {
                    content: if element.text.is_empty() {
                        PLACEHOLDER_TEXT.to_string()
                    } else {
                        element.text.clone()
                    },
                    editing: false,
                },
            },
            ElementKind::Freehand => VisualBody::Dots {
                dots: dot_centers(element.origin(), &element.draw_points, element.draw_size),
                color: parse_color(&element.draw_color),
                diameter: element.draw_size,
            },
        }
    }
}

/// Masking disc of a crescent: 85% of the frame, offset right and up.
pub fn crescent_mask(frame: Rect) -> Rect {
    let size = Size::new(frame.width() * 0.85, frame.height() * 0.85);
    let origin = Point::new(frame.x0 + frame.width() * 0.25, frame.y0 - frame.height() * 0.10);
    Rect::from_origin_size(origin, size)
}

/// Each sample marks the top-left corner of its dot.
fn dot_centers(origin: Point, points: &[Point], diameter: f64) -> Vec<Point> {
    let offset = origin.to_vec2() + Vec2::new(diameter / 2.0, diameter / 2.0);
    points.iter().map(|p| *p + offset).collect()
}

/// One materialized element.
#[derive(Debug, Clone, PartialEq)]
pub struct Visual {
    pub id: ElementId,
    pub kind: ElementKind,
    /// Unrotated frame in canvas space.
    pub frame: Rect,
    /// Degrees, about the frame center.
    pub rotation: f64,
    pub z_index: u32,
    pub body: VisualBody,
    /// Resize handle centers, rotated with the element.
    pub handles: [Point; 4],
    pub locked: bool,
    pub selection: SelectionStyle,
}

impl Visual {
    pub fn from_element(element: &Element, selection: SelectionStyle, edit_buffer: Option<&str>) -> Self {
        Self {
            id: element.id.clone(),
            kind: element.kind,
            frame: element.bounds(),
            rotation: element.rotation,
            z_index: element.z_index,
            body: VisualBody::for_element(element, edit_buffer),
            handles: ResizeHandle::ALL.map(|handle| handle.position(element)),
            locked: element.locked,
            selection,
        }
    }

    /// Lock badge is shown only while locked.
    pub fn shows_lock_badge(&self) -> bool {
        self.locked
    }

    /// Handles are only offered on unlocked selected elements.
    pub fn shows_handles(&self) -> bool {
        self.selection.is_selected() && !self.locked
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.body, VisualBody::Text { editing: true, .. })
    }

    /// Frame space to canvas space.
    pub fn transform(&self) -> Affine {
        Affine::rotate_about(self.rotation.to_radians(), self.frame.center())
    }
}

/// Transient overlay for a stroke still being drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeOverlay {
    /// Dot centers in canvas space.
    pub points: Vec<Point>,
    pub color: Color,
    pub diameter: f64,
}

impl StrokeOverlay {
    pub fn from_capture(capture: &FreehandCapture) -> Self {
        Self {
            points: dot_centers(Point::ZERO, &capture.points, capture.size),
            color: parse_color(&capture.color),
            diameter: capture.size,
        }
    }
}

/// The full retained view: one visual per element plus overlays.
#[derive(Debug, Clone)]
pub struct ViewTree {
    canvas: Rect,
    background: Color,
    visuals: HashMap<ElementId, Visual>,
    /// Painting order, ascending z.
    order: Vec<ElementId>,
    overlay: Option<StrokeOverlay>,
}

impl ViewTree {
    pub fn new(canvas_size: Size) -> Self {
        Self {
            canvas: Rect::from_origin_size(Point::ZERO, canvas_size),
            background: CANVAS_BACKGROUND,
            visuals: HashMap::new(),
            order: Vec::new(),
            overlay: None,
        }
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn canvas(&self) -> Rect {
        self.canvas
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn set_canvas_size(&mut self, size: Size) {
        self.canvas = Rect::from_origin_size(Point::ZERO, size);
    }

    pub fn get(&self, id: &ElementId) -> Option<&Visual> {
        self.visuals.get(id)
    }

    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }

    /// Visuals in painting order, bottom first.
    pub fn paint_order(&self) -> impl Iterator<Item = &Visual> {
        self.order.iter().filter_map(|id| self.visuals.get(id))
    }

    pub fn overlay(&self) -> Option<&StrokeOverlay> {
        self.overlay.as_ref()
    }

    pub(crate) fn set_overlay(&mut self, overlay: Option<StrokeOverlay>) {
        self.overlay = overlay;
    }

    pub(crate) fn clear(&mut self) {
        self.visuals.clear();
        self.order.clear();
        self.overlay = None;
    }

    /// Insert or replace a visual. Returns whether painting order changed.
    pub(crate) fn upsert(&mut self, visual: Visual) -> bool {
        let z_changed = self
            .visuals
            .get(&visual.id)
            .is_none_or(|old| old.z_index != visual.z_index);
        if !self.visuals.contains_key(&visual.id) {
            self.order.push(visual.id.clone());
        }
        self.visuals.insert(visual.id.clone(), visual);
        if z_changed {
            self.sort_order();
        }
        z_changed
    }

    pub(crate) fn remove(&mut self, id: &ElementId) -> Option<Visual> {
        let removed = self.visuals.remove(id)?;
        self.order.retain(|other| other != id);
        Some(removed)
    }

    pub(crate) fn visuals_mut(&mut self) -> impl Iterator<Item = &mut Visual> {
        self.visuals.values_mut()
    }

    fn sort_order(&mut self) {
        let visuals = &self.visuals;
        self.order
            .sort_by_key(|id| visuals.get(id).map_or(0, |visual| visual.z_index));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(kind: ElementKind) -> Element {
        Element::new(
            ElementId::from_counter(1),
            kind,
            Point::new(100.0, 50.0),
            Size::new(120.0, 80.0),
            1,
        )
        .with_fill("#0d99ff")
    }

    #[test]
    fn test_shape_rounding() {
        let rect = Visual::from_element(&element(ElementKind::Rect), SelectionStyle::None, None);
        assert!(matches!(
            rect.body,
            VisualBody::Shape { rounding: Rounding::Corners(r), .. } if (r - RECT_CORNER_RADIUS).abs() < 1e-9
        ));
        let ellipse = Visual::from_element(&element(ElementKind::Ellipse), SelectionStyle::None, None);
        assert!(matches!(ellipse.body, VisualBody::Shape { rounding: Rounding::Full, .. }));
    }

    #[test]
    fn test_crescent_mask_geometry() {
        let mask = crescent_mask(Rect::new(0.0, 0.0, 100.0, 100.0));
        assert!((mask.x0 - 25.0).abs() < 1e-9);
        assert!((mask.y0 + 10.0).abs() < 1e-9);
        assert!((mask.width() - 85.0).abs() < 1e-9);
    }

    #[test]
    fn test_image_placeholder_until_src() {
        let mut el = element(ElementKind::Image);
        let visual = Visual::from_element(&el, SelectionStyle::None, None);
        assert_eq!(visual.body, VisualBody::ImagePlaceholder { label: IMAGE_PLACEHOLDER_LABEL });
        el.image_src = "data:image/png;base64,AAAA".to_string();
        let visual = Visual::from_element(&el, SelectionStyle::None, None);
        assert!(matches!(visual.body, VisualBody::Image { ref src } if src.starts_with("data:")));
    }

    #[test]
    fn test_text_edit_buffer_wins() {
        let mut el = element(ElementKind::Text);
        el.text = "Committed".to_string();
        let visual = Visual::from_element(&el, SelectionStyle::Single, Some("Draft"));
        assert_eq!(
            visual.body,
            VisualBody::Text { content: "Draft".to_string(), editing: true }
        );
        assert!(visual.is_editing());
    }

    #[test]
    fn test_dots_follow_samples() {
        let mut el = element(ElementKind::Freehand).with_brush("#ff0000", 4.0);
        el.draw_points = vec![Point::new(0.0, 0.0), Point::new(10.0, 6.0)];
        let visual = Visual::from_element(&el, SelectionStyle::None, None);
        let VisualBody::Dots { dots, diameter, .. } = visual.body else {
            panic!("expected dots");
        };
        assert_eq!(dots, vec![Point::new(102.0, 52.0), Point::new(112.0, 58.0)]);
        assert!((diameter - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_badge_and_handles() {
        let mut el = element(ElementKind::Rect);
        let visual = Visual::from_element(&el, SelectionStyle::Single, None);
        assert!(visual.shows_handles());
        assert!(!visual.shows_lock_badge());
        assert_eq!(visual.handles[0], Point::new(100.0, 50.0));

        el.locked = true;
        let visual = Visual::from_element(&el, SelectionStyle::Single, None);
        assert!(visual.shows_lock_badge());
        assert!(!visual.shows_handles());
    }

    #[test]
    fn test_tree_orders_by_z() {
        let mut tree = ViewTree::new(Size::new(1200.0, 800.0));
        let mut low = element(ElementKind::Rect);
        low.z_index = 1;
        let mut high = element(ElementKind::Circle);
        high.id = ElementId::from_counter(2);
        high.z_index = 2;

        tree.upsert(Visual::from_element(&high, SelectionStyle::None, None));
        tree.upsert(Visual::from_element(&low, SelectionStyle::None, None));
        let order: Vec<_> = tree.paint_order().map(|v| v.id.clone()).collect();
        assert_eq!(order, vec![low.id.clone(), high.id.clone()]);

        assert!(tree.remove(&low.id).is_some());
        assert_eq!(tree.paint_order().count(), 1);
        assert!(tree.remove(&low.id).is_none());
    }
}
