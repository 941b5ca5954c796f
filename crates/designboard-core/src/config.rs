//! Editor configuration.

use kurbo::{Point, Size};

/// Default canvas width in canvas units.
pub const DEFAULT_CANVAS_WIDTH: f64 = 1200.0;
/// Default canvas height in canvas units.
pub const DEFAULT_CANVAS_HEIGHT: f64 = 800.0;
/// Smallest width an element can be resized to.
pub const MIN_ELEMENT_WIDTH: f64 = 40.0;
/// Smallest height an element can be resized to.
pub const MIN_ELEMENT_HEIGHT: f64 = 30.0;
/// Distance moved by one arrow-key nudge.
pub const NUDGE_STEP: f64 = 5.0;
/// Minimum distance between two recorded freehand samples.
pub const FREEHAND_MIN_SPACING: f64 = 2.0;
/// Key under which the layout snapshot is stored.
pub const DEFAULT_STORAGE_KEY: &str = "designboard_layout";
/// Hit radius around a resize handle, in canvas units.
pub const HANDLE_HIT_TOLERANCE: f64 = 8.0;

/// Configuration for an editor session.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Fixed canvas area. Every element stays inside it.
    pub canvas_size: Size,
    /// Minimum element width.
    pub min_width: f64,
    /// Minimum element height.
    pub min_height: f64,
    /// Arrow-key nudge distance.
    pub nudge_step: f64,
    /// Freehand samples closer than this to the previous one are dropped.
    pub freehand_spacing: f64,
    /// Stroke color given to new freehand strokes.
    pub freehand_color: String,
    /// Stroke diameter given to new freehand strokes.
    pub freehand_size: f64,
    /// Storage key of the autosave snapshot.
    pub storage_key: String,
    /// Resize handle hit radius.
    pub handle_tolerance: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_size: Size::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT),
            min_width: MIN_ELEMENT_WIDTH,
            min_height: MIN_ELEMENT_HEIGHT,
            nudge_step: NUDGE_STEP,
            freehand_spacing: FREEHAND_MIN_SPACING,
            freehand_color: "#ffffff".to_string(),
            freehand_size: 5.0,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            handle_tolerance: HANDLE_HIT_TOLERANCE,
        }
    }
}

impl EditorConfig {
    /// Set the canvas size.
    pub fn with_canvas_size(mut self, width: f64, height: f64) -> Self {
        self.canvas_size = Size::new(width, height);
        self
    }

    /// Set the storage key used for autosave.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Set the brush used for new freehand strokes.
    pub fn with_freehand_brush(mut self, color: impl Into<String>, size: f64) -> Self {
        self.freehand_color = color.into();
        self.freehand_size = size;
        self
    }

    /// Set the minimum element size.
    pub fn with_min_size(mut self, width: f64, height: f64) -> Self {
        self.min_width = width;
        self.min_height = height;
        self
    }

    /// Clamp an origin so a box of `size` stays on the canvas.
    pub fn clamp_origin(&self, origin: Point, size: Size) -> Point {
        Point::new(
            clamp_axis(origin.x, size.width, self.canvas_size.width),
            clamp_axis(origin.y, size.height, self.canvas_size.height),
        )
    }

    /// Clamp a point to the canvas area (inclusive of the far edges).
    pub fn clamp_point(&self, point: Point) -> Point {
        Point::new(
            point.x.min(self.canvas_size.width).max(0.0),
            point.y.min(self.canvas_size.height).max(0.0),
        )
    }
}

/// Clamp `value` into `[0, limit - extent]`. Never panics; a box wider than
/// the limit is pinned to zero.
pub fn clamp_axis(value: f64, extent: f64, limit: f64) -> f64 {
    value.min(limit - extent).max(0.0)
}
