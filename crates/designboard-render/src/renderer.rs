//! Renderer trait abstraction and a backend-neutral scene recorder.

use crate::color::is_invisible;
use crate::visual::{Rounding, SelectionStyle, ViewTree, Visual, VisualBody};
use kurbo::{Affine, Ellipse, Point, Rect, RoundedRect, Shape};
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Unsupported image source: {0}")]
    UnsupportedImage(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Side length of a resize handle square.
pub const HANDLE_SIZE: f64 = 8.0;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    pub tree: &'a ViewTree,
    pub selection_color: Color,
    pub multi_selection_color: Color,
    pub text_color: Color,
    pub placeholder_color: Color,
}

impl<'a> RenderContext<'a> {
    pub fn new(tree: &'a ViewTree) -> Self {
        Self {
            tree,
            selection_color: Color::from_rgba8(13, 153, 255, 255),
            multi_selection_color: Color::from_rgba8(151, 71, 255, 255),
            text_color: Color::from_rgba8(26, 26, 26, 255),
            placeholder_color: Color::from_rgba8(200, 200, 200, 255),
        }
    }

    pub fn with_selection_colors(mut self, single: Color, multi: Color) -> Self {
        self.selection_color = single;
        self.multi_selection_color = multi;
        self
    }

    fn outline_color(&self, style: SelectionStyle) -> Option<Color> {
        match style {
            SelectionStyle::None => None,
            SelectionStyle::Single => Some(self.selection_color),
            SelectionStyle::Multi => Some(self.multi_selection_color),
        }
    }
}

/// Trait for rendering backends.
pub trait Renderer: Send + Sync {
    /// Build the drawing commands for a frame.
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()>;

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.tree.background()
    }
}

/// Fillable outline.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Rect(RoundedRect),
    Ellipse(Ellipse),
}

impl Geometry {
    pub fn bounding_box(&self) -> Rect {
        match self {
            Geometry::Rect(rect) => rect.bounding_box(),
            Geometry::Ellipse(ellipse) => ellipse.bounding_box(),
        }
    }
}

/// One backend-neutral drawing operation. Coordinates are in canvas space
/// before `transform` is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Fill {
        geometry: Geometry,
        color: Color,
        transform: Affine,
        clip: Option<Geometry>,
    },
    Image {
        src: String,
        rect: Rect,
        transform: Affine,
    },
    Text {
        content: String,
        rect: Rect,
        color: Color,
        transform: Affine,
        caret: bool,
    },
    Outline {
        rect: Rect,
        color: Color,
        transform: Affine,
    },
    Handle {
        rect: Rect,
        color: Color,
    },
    LockBadge {
        anchor: Point,
    },
}

/// Records a frame as a flat list of [`DrawCommand`]s.
#[derive(Debug, Default)]
pub struct SceneRecorder {
    commands: Vec<DrawCommand>,
}

impl SceneRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    fn fill(&mut self, geometry: Geometry, color: Color, transform: Affine, clip: Option<Geometry>) {
        if is_invisible(color) {
            return;
        }
        self.commands.push(DrawCommand::Fill {
            geometry,
            color,
            transform,
            clip,
        });
    }

    fn render_visual(&mut self, visual: &Visual, ctx: &RenderContext) -> RenderResult<()> {
        let frame = visual.frame;
        let transform = visual.transform();
        match &visual.body {
            VisualBody::Shape { fill, rounding } => {
                let geometry = match rounding {
                    Rounding::Corners(radius) => Geometry::Rect(RoundedRect::from_rect(frame, *radius)),
                    Rounding::Full => Geometry::Ellipse(Ellipse::from_rect(frame)),
                };
                self.fill(geometry, *fill, transform, None);
            }
            VisualBody::Diamond { fill } => {
                let turn = Affine::rotate_about(std::f64::consts::FRAC_PI_4, frame.center());
                self.fill(Geometry::Rect(RoundedRect::from_rect(frame, 0.0)), *fill, transform * turn, None);
            }
            VisualBody::Crescent { fill, mask } => {
                let body = Geometry::Ellipse(Ellipse::from_rect(frame));
                self.fill(body.clone(), *fill, transform, None);
                self.fill(
                    Geometry::Ellipse(Ellipse::from_rect(*mask)),
                    crate::visual::CRESCENT_MASK_COLOR,
                    transform,
                    Some(body),
                );
            }
            VisualBody::Image { src } => {
                if !src.starts_with("data:") {
                    return Err(RendererError::UnsupportedImage(src.chars().take(32).collect()));
                }
                self.commands.push(DrawCommand::Image {
                    src: src.clone(),
                    rect: frame,
                    transform,
                });
            }
            VisualBody::ImagePlaceholder { label } => {
                self.fill(
                    Geometry::Rect(RoundedRect::from_rect(frame, 0.0)),
                    ctx.placeholder_color,
                    transform,
                    None,
                );
                self.commands.push(DrawCommand::Text {
                    content: label.to_string(),
                    rect: frame,
                    color: ctx.text_color,
                    transform,
                    caret: false,
                });
            }
            VisualBody::Text { content, editing } => {
                self.commands.push(DrawCommand::Text {
                    content: content.clone(),
                    rect: frame,
                    color: ctx.text_color,
                    transform,
                    caret: *editing,
                });
            }
            VisualBody::Dots { dots, color, diameter } => {
                let radius = diameter / 2.0;
                for center in dots {
                    self.fill(
                        Geometry::Ellipse(Ellipse::new(*center, (radius, radius), 0.0)),
                        *color,
                        transform,
                        None,
                    );
                }
            }
        }

        if let Some(color) = ctx.outline_color(visual.selection) {
            self.commands.push(DrawCommand::Outline {
                rect: frame,
                color,
                transform,
            });
            if visual.shows_handles() {
                for center in visual.handles {
                    self.commands.push(DrawCommand::Handle {
                        rect: Rect::from_center_size(center, (HANDLE_SIZE, HANDLE_SIZE)),
                        color,
                    });
                }
            }
        }
        if visual.shows_lock_badge() {
            self.commands.push(DrawCommand::LockBadge {
                anchor: transform * Point::new(frame.x1, frame.y0),
            });
        }
        Ok(())
    }
}

impl Renderer for SceneRecorder {
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        self.commands.clear();
        for visual in ctx.tree.paint_order() {
            if let Err(e) = self.render_visual(visual, ctx) {
                log::warn!("Skipping {}: {}", visual.id, e);
            }
        }
        if let Some(overlay) = ctx.tree.overlay() {
            let radius = overlay.diameter / 2.0;
            for point in &overlay.points {
                self.fill(
                    Geometry::Ellipse(Ellipse::new(*point, (radius, radius), 0.0)),
                    overlay.color,
                    Affine::IDENTITY,
                    None,
                );
            }
        }
        Ok(())
    }
}
