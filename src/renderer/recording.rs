//! Render backend that records draw calls
//!
//! Used by the headless binary and by tests that compare composed matrices.

use glam::Mat4;

use super::{DrawStyle, DrawUniforms, RenderService, Viewport};
use crate::scene::{Color, Primitive};

/// One recorded draw
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub primitive: Primitive,
    pub style: DrawStyle,
    pub uniforms: DrawUniforms,
    pub textured: bool,
}

/// Records everything it is asked to draw
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub calls: Vec<DrawCall>,
    pub passes: Vec<(Viewport, Mat4)>,
    model_view: Mat4,
    color: Color,
    textured: bool,
    viewport: Viewport,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget recorded calls (keeps current matrix/color state)
    pub fn clear(&mut self) {
        self.calls.clear();
        self.passes.clear();
    }

    /// Model-view matrices of every draw, in order
    pub fn matrices(&self) -> Vec<Mat4> {
        self.calls.iter().map(|c| c.uniforms.model_view).collect()
    }

    pub fn count(&self, style: DrawStyle) -> usize {
        self.calls.iter().filter(|c| c.style == style).count()
    }
}

impl RenderService for RecordingRenderer {
    fn set_projection(&mut self, projection: &Mat4) {
        self.passes.push((self.viewport, *projection));
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn set_model_view(&mut self, model_view: &Mat4) {
        self.model_view = *model_view;
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn draw(&mut self, primitive: &Primitive, style: DrawStyle) {
        self.calls.push(DrawCall {
            primitive: primitive.clone(),
            style,
            uniforms: DrawUniforms::new(self.model_view, self.color),
            textured: self.textured,
        });
    }

    fn set_textured(&mut self, textured: bool) {
        self.textured = textured;
    }
}
