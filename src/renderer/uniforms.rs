//! Per-draw uniform block

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::scene::Color;

/// Uniforms for one primitive draw, laid out for a std140 block
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct DrawUniforms {
    pub model_view: Mat4,
    pub color: Color,
}

impl DrawUniforms {
    pub fn new(model_view: Mat4, color: Color) -> Self {
        Self { model_view, color }
    }

    /// Raw bytes for a uniform upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

/// Colors for game elements
pub mod colors {
    use crate::scene::Color;

    /// Default outline color when a node has none
    pub const LINE: Color = [0.2, 0.2, 0.2, 1.0];
    /// Floor checkerboard
    pub const FLOOR_DARK: Color = [0.4, 0.4, 0.4, 1.0];
    pub const FLOOR_LIGHT: Color = [1.0, 1.0, 1.0, 1.0];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_layout() {
        let u = DrawUniforms::new(Mat4::IDENTITY, colors::LINE);
        assert_eq!(u.as_bytes().len(), 16 * 4 + 4 * 4);
        // Color follows the matrix
        let color: &[f32] = bytemuck::cast_slice(&u.as_bytes()[64..]);
        assert_eq!(color, &colors::LINE);
    }
}
