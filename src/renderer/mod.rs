//! Render service boundary
//!
//! The core never touches GPU resources. It hands matrices, colors and draw
//! requests to a [`RenderService`]; a backend turns those into real draws.

pub mod recording;
pub mod uniforms;

pub use recording::{DrawCall, RecordingRenderer};
pub use uniforms::{DrawUniforms, colors};

use glam::Mat4;

use crate::scene::{Color, Primitive};

/// How a primitive is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawStyle {
    /// Edges only, in the outline color
    Outline,
    /// Solid triangles, in the base color
    Filled,
}

/// Viewport rectangle in pixels (origin bottom-left)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// Drawing backend the evaluator talks to
pub trait RenderService {
    /// Once per pass
    fn set_projection(&mut self, projection: &Mat4);
    /// Once per pass
    fn set_viewport(&mut self, viewport: Viewport);
    /// Before each draw
    fn set_model_view(&mut self, model_view: &Mat4);
    /// Before each draw
    fn set_color(&mut self, color: Color);
    /// Draw one primitive with the current matrix and color
    fn draw(&mut self, primitive: &Primitive, style: DrawStyle);
    /// Cow skin on/off. Backends without the texture just draw untextured.
    fn set_textured(&mut self, _textured: bool) {}
}

/// Backend that discards everything (for headless runs that only need captures)
#[derive(Debug, Default)]
pub struct NullRenderer;

impl RenderService for NullRenderer {
    fn set_projection(&mut self, _projection: &Mat4) {}
    fn set_viewport(&mut self, _viewport: Viewport) {}
    fn set_model_view(&mut self, _model_view: &Mat4) {}
    fn set_color(&mut self, _color: Color) {}
    fn draw(&mut self, _primitive: &Primitive, _style: DrawStyle) {}
}
