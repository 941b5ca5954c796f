//! Element definitions for the design surface.

use kurbo::{Affine, Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fill palette cycled by element count when new elements are created.
pub const PALETTE: [&str; 8] = [
    "#0d99ff", "#18a058", "#ffb800", "#f24822", "#9747ff", "#ff6b9d", "#14b8a6", "#ff7f50",
];

/// Fill used by text and freehand elements.
pub const TRANSPARENT: &str = "transparent";

/// Copy shown in a text element that has no content of its own.
pub const PLACEHOLDER_TEXT: &str = "Double click to edit";

/// Stroke color assumed for snapshots that predate freehand strokes.
pub const DEFAULT_DRAW_COLOR: &str = "#ffffff";

/// Stroke diameter assumed for snapshots that predate freehand strokes.
pub const DEFAULT_DRAW_SIZE: f64 = 5.0;

const ID_PREFIX: &str = "el_";

/// Unique identifier for elements, of the form `el_<n>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Build the identifier for a counter value.
    pub fn from_counter(n: u64) -> Self {
        Self(format!("{ID_PREFIX}{n}"))
    }

    /// Numeric suffix, if the identifier follows the `el_<n>` scheme.
    pub fn counter_suffix(&self) -> Option<u64> {
        self.0.strip_prefix(ID_PREFIX)?.parse().ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// The closed set of element types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    #[default]
    Rect,
    Circle,
    Ellipse,
    Diamond,
    Crescent,
    Image,
    Text,
    #[serde(rename = "freedraw")]
    Freehand,
}

impl ElementKind {
    /// Every element type, in toolbar order.
    pub const ALL: [ElementKind; 8] = [
        ElementKind::Rect,
        ElementKind::Circle,
        ElementKind::Ellipse,
        ElementKind::Diamond,
        ElementKind::Crescent,
        ElementKind::Image,
        ElementKind::Freehand,
        ElementKind::Text,
    ];

    /// Size given to a freshly created element of this type.
    pub fn default_size(self) -> Size {
        match self {
            ElementKind::Rect => Size::new(160.0, 110.0),
            ElementKind::Circle => Size::new(120.0, 120.0),
            ElementKind::Ellipse => Size::new(160.0, 100.0),
            ElementKind::Diamond => Size::new(120.0, 120.0),
            ElementKind::Crescent => Size::new(120.0, 120.0),
            ElementKind::Image => Size::new(200.0, 150.0),
            ElementKind::Text => Size::new(200.0, 50.0),
            ElementKind::Freehand => Size::ZERO,
        }
    }

    /// Human readable name.
    pub fn label(self) -> &'static str {
        match self {
            ElementKind::Rect => "Rectangle",
            ElementKind::Circle => "Circle",
            ElementKind::Ellipse => "Ellipse",
            ElementKind::Diamond => "Diamond",
            ElementKind::Crescent => "Crescent",
            ElementKind::Image => "Image",
            ElementKind::Text => "Text",
            ElementKind::Freehand => "Free Drawing",
        }
    }

    /// Single glyph used by layer lists and tool pickers.
    pub fn icon(self) -> &'static str {
        match self {
            ElementKind::Rect => "□",
            ElementKind::Circle => "○",
            ElementKind::Ellipse => "⬭",
            ElementKind::Diamond => "◇",
            ElementKind::Crescent => "☽",
            ElementKind::Image => "🖼",
            ElementKind::Text => "T",
            ElementKind::Freehand => "✎",
        }
    }

    /// Whether resizing forces a 1:1 aspect ratio.
    pub fn keeps_aspect(self) -> bool {
        matches!(self, ElementKind::Circle)
    }

    /// Whether the fill color is user-editable for this type.
    pub fn has_editable_fill(self) -> bool {
        !matches!(self, ElementKind::Image | ElementKind::Freehand)
    }

    /// Whether new elements of this type start with a transparent fill.
    pub fn starts_transparent(self) -> bool {
        matches!(self, ElementKind::Text | ElementKind::Freehand)
    }
}

/// Visual style attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementStyles {
    /// CSS color string, or `transparent`.
    pub background: String,
}

impl Default for ElementStyles {
    fn default() -> Self {
        Self {
            background: TRANSPARENT.to_string(),
        }
    }
}

fn default_draw_color() -> String {
    DEFAULT_DRAW_COLOR.to_string()
}

fn default_draw_size() -> f64 {
    DEFAULT_DRAW_SIZE
}

/// A placed design element.
///
/// The serialized form is the snapshot record format, so field names and
/// defaults here are part of the persisted contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    /// Left edge in canvas coordinates.
    pub x: f64,
    /// Top edge in canvas coordinates.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees, `[0, 360]`.
    #[serde(default)]
    pub rotation: f64,
    /// Layering rank; higher draws on top.
    pub z_index: u32,
    #[serde(default)]
    pub styles: ElementStyles,
    /// Content of text elements.
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub locked: bool,
    /// Data URL of image elements; empty until assigned.
    #[serde(default)]
    pub image_src: String,
    /// Freehand samples, relative to the element origin once finalized.
    #[serde(default)]
    pub draw_points: Vec<Point>,
    #[serde(default = "default_draw_color")]
    pub draw_color: String,
    #[serde(default = "default_draw_size")]
    pub draw_size: f64,
}

impl Element {
    /// Create an element with default content for its type.
    pub fn new(id: ElementId, kind: ElementKind, origin: Point, size: Size, z_index: u32) -> Self {
        Self {
            id,
            kind,
            x: origin.x,
            y: origin.y,
            width: size.width,
            height: size.height,
            rotation: 0.0,
            z_index,
            styles: ElementStyles::default(),
            text: if kind == ElementKind::Text {
                PLACEHOLDER_TEXT.to_string()
            } else {
                String::new()
            },
            locked: false,
            image_src: String::new(),
            draw_points: Vec::new(),
            draw_color: default_draw_color(),
            draw_size: DEFAULT_DRAW_SIZE,
        }
    }

    /// Set the fill color.
    pub fn with_fill(mut self, fill: impl Into<String>) -> Self {
        self.styles.background = fill.into();
        self
    }

    /// Set the freehand brush.
    pub fn with_brush(mut self, color: impl Into<String>, size: f64) -> Self {
        self.draw_color = color.into();
        self.draw_size = size;
        self
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Axis-aligned bounds, ignoring rotation.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.origin(), self.size())
    }

    /// Transform from the element's unrotated frame to canvas space.
    pub fn rotation_transform(&self) -> Affine {
        Affine::rotate_about(self.rotation.to_radians(), self.bounds().center())
    }

    /// Check whether a canvas point falls on the element body, honoring rotation.
    pub fn hit_test(&self, point: Point) -> bool {
        let local = self.rotation_transform().inverse() * point;
        self.bounds().contains(local)
    }

    /// Whether the element accepts geometry and content changes.
    pub fn is_editable(&self) -> bool {
        !self.locked
    }

    /// Whether this is an image element still waiting for its bitmap.
    pub fn awaits_image(&self) -> bool {
        self.kind == ElementKind::Image && self.image_src.is_empty()
    }

    /// Name shown in layer lists.
    pub fn display_name(&self) -> String {
        if self.kind == ElementKind::Text {
            let name: String = self.text.chars().take(20).collect();
            if name.is_empty() {
                return ElementKind::Text.label().to_string();
            }
            name
        } else {
            self.kind.label().to_string()
        }
    }
}
