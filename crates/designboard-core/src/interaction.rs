//! Gesture state machine: drag, resize and freehand capture.
//!
//! Each gesture records what it needs at pointer-down and computes new
//! geometry from the total pointer delta on every move, so a gesture never
//! accumulates rounding drift.

use crate::config::{EditorConfig, clamp_axis};
use crate::element::{Element, ElementId, ElementKind, TRANSPARENT};
use crate::selection::ResizeHandle;
use kurbo::{Point, Rect, Size, Vec2};

/// Drag of every unlocked selected element.
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    /// Pointer position at pointer-down.
    pub pointer_start: Point,
    /// Each dragged element and its origin at pointer-down.
    pub starts: Vec<(ElementId, Point)>,
}

impl DragState {
    pub fn new(pointer_start: Point, starts: Vec<(ElementId, Point)>) -> Self {
        Self {
            pointer_start,
            starts,
        }
    }

    pub fn delta(&self, pointer: Point) -> Vec2 {
        pointer - self.pointer_start
    }
}

/// Resize of the sole selected element by one corner handle.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeState {
    pub id: ElementId,
    pub handle: ResizeHandle,
    pub pointer_start: Point,
    /// Frame at pointer-down.
    pub start: Rect,
}

impl ResizeState {
    pub fn new(id: ElementId, handle: ResizeHandle, pointer_start: Point, start: Rect) -> Self {
        Self {
            id,
            handle,
            pointer_start,
            start,
        }
    }

    pub fn delta(&self, pointer: Point) -> Vec2 {
        pointer - self.pointer_start
    }
}

/// A freehand stroke being captured. Not part of the store until finished.
#[derive(Debug, Clone, PartialEq)]
pub struct FreehandCapture {
    pub id: ElementId,
    /// Samples in canvas coordinates.
    pub points: Vec<Point>,
    pub color: String,
    pub size: f64,
}

impl FreehandCapture {
    /// Start a stroke seeded with the (clamped) pointer position.
    pub fn begin(id: ElementId, start: Point, config: &EditorConfig) -> Self {
        Self {
            id,
            points: vec![config.clamp_point(start)],
            color: config.freehand_color.clone(),
            size: config.freehand_size,
        }
    }

    /// Record a sample if it lies further than the minimum spacing from the
    /// previous one. Returns whether the sample was kept.
    pub fn push(&mut self, pointer: Point, config: &EditorConfig) -> bool {
        let point = config.clamp_point(pointer);
        let far_enough = self
            .points
            .last()
            .is_none_or(|last| last.distance(point) > config.freehand_spacing);
        if far_enough {
            self.points.push(point);
        }
        far_enough
    }

    /// Live bounding extent of the samples.
    pub fn extent(&self) -> Option<Rect> {
        let first = *self.points.first()?;
        Some(
            self.points
                .iter()
                .fold(Rect::from_points(first, first), |acc, p| acc.union_pt(*p)),
        )
    }

    /// Turn the capture into an element, or `None` for an accidental click.
    ///
    /// The element box is the sample extent padded by one stroke diameter,
    /// kept on the canvas and grown to the minimum size. Samples are stored
    /// relative to the box origin. The caller assigns the z-order.
    pub fn finish(self, config: &EditorConfig) -> Option<Element> {
        if self.points.len() < 2 {
            return None;
        }
        let padded = self.extent()?.inflate(self.size, self.size);
        let canvas = config.canvas_size;

        let width = padded.width().max(config.min_width).min(canvas.width);
        let height = padded.height().max(config.min_height).min(canvas.height);
        let origin = Point::new(
            clamp_axis(padded.x0, width, canvas.width),
            clamp_axis(padded.y0, height, canvas.height),
        );

        let mut element = Element::new(self.id, ElementKind::Freehand, origin, Size::new(width, height), 0)
            .with_fill(TRANSPARENT)
            .with_brush(self.color, self.size);
        element.draw_points = self
            .points
            .into_iter()
            .map(|p| Point::new(p.x - origin.x, p.y - origin.y))
            .collect();
        Some(element)
    }
}

/// The gesture in progress. At most one is active.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging(DragState),
    Resizing(ResizeState),
    FreehandCapturing(FreehandCapture),
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }

    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Gesture::Idle => "idle",
            Gesture::Dragging(_) => "dragging",
            Gesture::Resizing(_) => "resizing",
            Gesture::FreehandCapturing(_) => "freehand",
        }
    }
}

/// Origin of a dragged element: start plus delta, clamped per axis.
pub fn drag_origin(start: Point, delta: Vec2, size: Size, canvas: Size) -> Point {
    Point::new(
        clamp_axis(start.x + delta.x, size.width, canvas.width),
        clamp_axis(start.y + delta.y, size.height, canvas.height),
    )
}

/// New frame for a corner resize.
///
/// East and south edges grow by the delta, floored at the minimum size.
/// West and north edges move only when the resulting size stays at or above
/// the minimum; otherwise that edge keeps its `current` position. Circles are
/// squared to the larger side. The result never leaves the canvas.
pub fn resize_frame(
    kind: ElementKind,
    start: Rect,
    current: Rect,
    handle: ResizeHandle,
    delta: Vec2,
    config: &EditorConfig,
) -> Rect {
    let (mut x, mut y) = (current.x0, current.y0);
    let (mut w, mut h) = (current.width(), current.height());

    if handle.moves_east() {
        w = (start.width() + delta.x).max(config.min_width);
    }
    if handle.moves_west() {
        let proposed = start.width() - delta.x;
        if proposed >= config.min_width {
            w = proposed;
            x = start.x0 + delta.x;
        }
    }
    if handle.moves_south() {
        h = (start.height() + delta.y).max(config.min_height);
    }
    if handle.moves_north() {
        let proposed = start.height() - delta.y;
        if proposed >= config.min_height {
            h = proposed;
            y = start.y0 + delta.y;
        }
    }

    if kind.keeps_aspect() {
        let side = w.max(h);
        w = side;
        h = side;
    }

    x = x.max(0.0);
    y = y.max(0.0);
    w = w.min(config.canvas_size.width - x);
    h = h.min(config.canvas_size.height - y);

    if kind.keeps_aspect() {
        let side = w.min(h);
        w = side;
        h = side;
    }

    Rect::from_origin_size(Point::new(x, y), Size::new(w, h))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EditorConfig {
        EditorConfig::default()
    }

    fn frame(x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect::from_origin_size(Point::new(x, y), Size::new(w, h))
    }

    fn assert_frame(actual: Rect, x: f64, y: f64, w: f64, h: f64) {
        assert!((actual.x0 - x).abs() < 1e-9, "x {} != {}", actual.x0, x);
        assert!((actual.y0 - y).abs() < 1e-9, "y {} != {}", actual.y0, y);
        assert!((actual.width() - w).abs() < 1e-9, "w {} != {}", actual.width(), w);
        assert!((actual.height() - h).abs() < 1e-9, "h {} != {}", actual.height(), h);
    }

    #[test]
    fn test_drag_origin_clamps() {
        let canvas = Size::new(1200.0, 800.0);
        let size = Size::new(100.0, 50.0);
        let p = drag_origin(Point::new(100.0, 100.0), Vec2::new(50.0, -20.0), size, canvas);
        assert!((p.x - 150.0).abs() < f64::EPSILON);
        assert!((p.y - 80.0).abs() < f64::EPSILON);

        let p = drag_origin(Point::new(100.0, 100.0), Vec2::new(5000.0, -500.0), size, canvas);
        assert!((p.x - 1100.0).abs() < f64::EPSILON);
        assert!((p.y - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_se_grows() {
        let start = frame(100.0, 100.0, 160.0, 110.0);
        let r = resize_frame(ElementKind::Rect, start, start, ResizeHandle::Se, Vec2::new(40.0, 20.0), &config());
        assert_frame(r, 100.0, 100.0, 200.0, 130.0);
    }

    #[test]
    fn test_resize_se_floors_at_minimum() {
        let start = frame(100.0, 100.0, 160.0, 110.0);
        let r = resize_frame(ElementKind::Rect, start, start, ResizeHandle::Se, Vec2::new(-500.0, -500.0), &config());
        assert_frame(r, 100.0, 100.0, 40.0, 30.0);
    }

    #[test]
    fn test_resize_nw_shifts_origin() {
        let start = frame(100.0, 100.0, 160.0, 110.0);
        let r = resize_frame(ElementKind::Rect, start, start, ResizeHandle::Nw, Vec2::new(20.0, -10.0), &config());
        assert_frame(r, 120.0, 90.0, 140.0, 120.0);
    }

    #[test]
    fn test_resize_nw_ignores_edge_past_minimum() {
        let start = frame(100.0, 100.0, 160.0, 110.0);
        // Width would drop to 20: the west edge stays where it currently is.
        let r = resize_frame(ElementKind::Rect, start, start, ResizeHandle::Nw, Vec2::new(140.0, 10.0), &config());
        assert_frame(r, 100.0, 110.0, 160.0, 100.0);
    }

    #[test]
    fn test_resize_circle_stays_square() {
        let start = frame(100.0, 100.0, 120.0, 120.0);
        for (handle, delta) in [
            (ResizeHandle::Se, Vec2::new(60.0, 5.0)),
            (ResizeHandle::Nw, Vec2::new(-10.0, 30.0)),
            (ResizeHandle::Ne, Vec2::new(2000.0, 0.0)),
            (ResizeHandle::Sw, Vec2::new(-300.0, 900.0)),
        ] {
            let r = resize_frame(ElementKind::Circle, start, start, handle, delta, &config());
            assert!((r.width() - r.height()).abs() < 1e-9, "{handle:?}");
        }
    }

    #[test]
    fn test_resize_clamps_to_canvas() {
        let start = frame(1000.0, 700.0, 160.0, 90.0);
        let r = resize_frame(ElementKind::Rect, start, start, ResizeHandle::Se, Vec2::new(500.0, 500.0), &config());
        assert_frame(r, 1000.0, 700.0, 200.0, 100.0);

        let start = frame(10.0, 10.0, 100.0, 100.0);
        let r = resize_frame(ElementKind::Rect, start, start, ResizeHandle::Nw, Vec2::new(-50.0, -50.0), &config());
        assert_frame(r, 0.0, 0.0, 150.0, 150.0);
    }

    #[test]
    fn test_freehand_spacing() {
        let config = config();
        let mut capture = FreehandCapture::begin(ElementId::from_counter(1), Point::new(10.0, 10.0), &config);
        assert!(!capture.push(Point::new(10.0, 10.0), &config));
        assert!(!capture.push(Point::new(11.0, 11.0), &config));
        assert!(capture.push(Point::new(13.0, 10.0), &config));
        assert_eq!(capture.points.len(), 2);
    }

    #[test]
    fn test_freehand_stationary_press_is_discarded() {
        let config = config();
        let mut capture = FreehandCapture::begin(ElementId::from_counter(1), Point::new(10.0, 10.0), &config);
        capture.push(Point::new(10.0, 10.0), &config);
        assert!(capture.finish(&config).is_none());
    }

    #[test]
    fn test_freehand_clamps_samples() {
        let config = config();
        let mut capture = FreehandCapture::begin(ElementId::from_counter(1), Point::new(-5.0, 10.0), &config);
        capture.push(Point::new(1300.0, 900.0), &config);
        assert_eq!(capture.points[0], Point::new(0.0, 10.0));
        assert_eq!(capture.points[1], Point::new(1200.0, 800.0));
    }

    #[test]
    fn test_freehand_finish_normalizes() {
        let config = config();
        let mut capture = FreehandCapture::begin(ElementId::from_counter(4), Point::new(100.0, 100.0), &config);
        capture.push(Point::new(200.0, 150.0), &config);
        let element = capture.finish(&config).unwrap();

        assert_eq!(element.kind, ElementKind::Freehand);
        // Extent 100x50 padded by 5 on every side.
        assert!((element.x - 95.0).abs() < 1e-9);
        assert!((element.y - 95.0).abs() < 1e-9);
        assert!((element.width - 110.0).abs() < 1e-9);
        assert!((element.height - 60.0).abs() < 1e-9);
        assert_eq!(element.draw_points, vec![Point::new(5.0, 5.0), Point::new(105.0, 55.0)]);
        assert_eq!(element.styles.background, TRANSPARENT);
    }

    #[test]
    fn test_freehand_finish_stays_on_canvas() {
        let config = config();
        let mut capture = FreehandCapture::begin(ElementId::from_counter(1), Point::new(0.0, 0.0), &config);
        capture.push(Point::new(0.0, 10.0), &config);
        let element = capture.finish(&config).unwrap();
        assert!(element.x >= 0.0 && element.y >= 0.0);
        assert!(element.width >= config.min_width);
        assert!(element.height >= config.min_height);
        // Samples are relative to the clamped origin.
        assert_eq!(element.draw_points[0], Point::new(0.0, 0.0));
    }

    #[test]
    fn test_gesture_names() {
        assert!(Gesture::default().is_idle());
        assert_eq!(Gesture::Idle.name(), "idle");
    }
}
