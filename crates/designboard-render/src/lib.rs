//! Designboard Render Library
//!
//! Materializes an editor session into a retained view tree, and turns that
//! tree into backend-neutral drawing commands.

pub mod color;
mod materializer;
mod renderer;
pub mod visual;

pub use color::parse_color;
pub use materializer::{MaterializeStats, ViewMaterializer};
pub use renderer::{DrawCommand, Geometry, RenderContext, RenderResult, Renderer, RendererError, SceneRecorder};
pub use visual::{Rounding, SelectionStyle, StrokeOverlay, ViewTree, Visual, VisualBody};
