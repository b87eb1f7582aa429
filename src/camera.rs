//! View and projection selection
//!
//! Three fixed orthographic views (front, left, top) plus a configurable
//! fourth view that is either an oblique shear or an axonometric rotation.
//! Multi-view mode splits the canvas into four quadrants.

use glam::{Mat4, Vec3, Vec4};

use crate::renderer::Viewport;

/// Half-height of the orthographic volume at zoom 1
pub const ORTHO_RANGE: f32 = 8.0;
/// Smallest zoom accepted for the perspective projection
pub const MIN_PERSPECTIVE_ZOOM: f32 = 0.51;
/// Wheel zoom factor per notch
pub const ZOOM_FACTOR: f32 = 1.1;

const DEFAULT_L: f32 = 0.4;
const DEFAULT_ALPHA: f32 = 45.0;
const DEFAULT_GAMMA: f32 = 20.0;
const DEFAULT_THETA: f32 = 45.0;

/// Which camera the main viewport shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Front,
    Left,
    Top,
    /// Oblique or axonometric, see [`Camera::oblique`]
    Fourth,
}

impl ViewKind {
    /// Look-at matrix for the fixed views
    pub fn fixed_view(self) -> Option<Mat4> {
        let target = Vec3::new(0.0, 3.0, 0.0);
        match self {
            ViewKind::Front => Some(Mat4::look_at_rh(Vec3::new(10.0, 3.0, 0.0), target, Vec3::Y)),
            ViewKind::Left => Some(Mat4::look_at_rh(Vec3::new(0.0, 3.0, 10.0), target, Vec3::Y)),
            ViewKind::Top => Some(Mat4::look_at_rh(
                Vec3::new(0.0, 10.0, 0.0),
                target,
                Vec3::NEG_Z,
            )),
            ViewKind::Fourth => None,
        }
    }
}

/// Arrow-key adjustment of the fourth view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nudge {
    Left,
    Right,
    Up,
    Down,
}

/// One viewport's worth of camera state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pass {
    pub viewport: Viewport,
    pub view: Mat4,
    pub projection: Mat4,
}

/// Camera selector
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub view: ViewKind,
    /// Fourth view uses the oblique shear (else axonometric)
    pub oblique: bool,
    /// Fixed views use a perspective projection (else orthographic)
    pub perspective: bool,
    /// Four quadrants instead of one viewport
    pub multi_view: bool,
    pub zoom: f32,
    /// Oblique shear length and angle (degrees)
    pub l: f32,
    pub alpha: f32,
    /// Axonometric X and Y rotations (degrees)
    pub gamma: f32,
    pub theta: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            view: ViewKind::Fourth,
            oblique: true,
            perspective: false,
            multi_view: false,
            zoom: 1.0,
            l: DEFAULT_L,
            alpha: DEFAULT_ALPHA,
            gamma: DEFAULT_GAMMA,
            theta: DEFAULT_THETA,
        }
    }
}

impl Camera {
    /// Restore the fourth view and its parameters (projection flags stay)
    pub fn reset(&mut self) {
        self.view = ViewKind::Fourth;
        self.zoom = 1.0;
        self.l = DEFAULT_L;
        self.alpha = DEFAULT_ALPHA;
        self.gamma = DEFAULT_GAMMA;
        self.theta = DEFAULT_THETA;
    }

    /// The fourth view matrix
    pub fn fourth_view(&self) -> Mat4 {
        if self.oblique {
            let alpha = self.alpha.to_radians();
            Mat4::from_cols(
                Vec4::X,
                Vec4::Y,
                Vec4::new(-self.l * alpha.cos(), -self.l * alpha.sin(), 1.0, 0.0),
                Vec4::W,
            )
        } else {
            Mat4::from_rotation_x(self.gamma.to_radians())
                * Mat4::from_rotation_y(self.theta.to_radians())
        }
    }

    /// View matrix for a view kind
    pub fn view_matrix(&self, kind: ViewKind) -> Mat4 {
        kind.fixed_view().unwrap_or_else(|| self.fourth_view())
    }

    /// Orthographic for the fourth view or when perspective is off
    pub fn projection(&self, fourth: bool, aspect: f32) -> Mat4 {
        if fourth || !self.perspective {
            let h = ORTHO_RANGE / self.zoom;
            return Mat4::orthographic_rh_gl(
                -aspect * h,
                aspect * h,
                -h,
                h,
                -5.0 * ORTHO_RANGE,
                5.0 * ORTHO_RANGE,
            );
        }
        let zoom = self.zoom.max(MIN_PERSPECTIVE_ZOOM);
        Mat4::perspective_rh_gl((90.0 / zoom).to_radians(), aspect, 0.01, 300.0)
    }

    /// Mouse wheel. Negative delta is "scroll up".
    pub fn wheel(&mut self, delta_y: f32) {
        if delta_y < 0.0 {
            self.zoom /= ZOOM_FACTOR;
        } else {
            self.zoom *= ZOOM_FACTOR;
        }
    }

    /// Arrow keys tune whichever fourth-view parameterization is active
    pub fn nudge(&mut self, nudge: Nudge) {
        match (self.oblique, nudge) {
            (true, Nudge::Left) => self.l += 0.01,
            (true, Nudge::Right) => self.l -= 0.01,
            (true, Nudge::Up) => self.alpha += 0.5,
            (true, Nudge::Down) => self.alpha -= 0.5,
            (false, Nudge::Left) => self.theta += 0.5,
            (false, Nudge::Right) => self.theta -= 0.5,
            (false, Nudge::Up) => self.gamma += 0.5,
            (false, Nudge::Down) => self.gamma -= 0.5,
        }
    }

    /// Render passes for a canvas of the given size
    pub fn passes(&self, width: u32, height: u32) -> Vec<Pass> {
        let fourth = self.view == ViewKind::Fourth;
        let main_view = self.view_matrix(self.view);

        if !self.multi_view {
            let viewport = Viewport::new(0, 0, width, height);
            return vec![Pass {
                viewport,
                view: main_view,
                projection: self.projection(fourth, viewport.aspect()),
            }];
        }

        let (hw, hh) = (width / 2, height / 2);
        let fixed = |viewport: Viewport, kind: ViewKind| Pass {
            viewport,
            view: self.view_matrix(kind),
            projection: self.projection(false, viewport.aspect()),
        };
        let corner = Viewport::new(hw, 0, hw, hh);
        vec![
            fixed(Viewport::new(0, hh, hw, hh), ViewKind::Front),
            fixed(Viewport::new(hw, hh, hw, hh), ViewKind::Top),
            fixed(Viewport::new(0, 0, hw, hh), ViewKind::Left),
            Pass {
                viewport: corner,
                view: main_view,
                projection: self.projection(fourth, corner.aspect()),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oblique_shears_depth() {
        let camera = Camera {
            alpha: 0.0,
            l: 0.5,
            ..Default::default()
        };
        let p = camera.fourth_view().transform_point3(Vec3::new(0.0, 0.0, 2.0));
        assert!((p - Vec3::new(-1.0, 0.0, 2.0)).length() < 1e-6);
    }

    #[test]
    fn test_axonometric_is_rotation() {
        let camera = Camera {
            oblique: false,
            ..Default::default()
        };
        let v = camera.fourth_view().transform_vector3(Vec3::new(1.0, 2.0, 3.0));
        assert!((v.length() - Vec3::new(1.0, 2.0, 3.0).length()).abs() < 1e-5);
    }

    #[test]
    fn test_fourth_view_always_orthographic() {
        let camera = Camera {
            perspective: true,
            ..Default::default()
        };
        let ortho = camera.projection(true, 1.0);
        // Orthographic: w stays 1
        assert_eq!(ortho.w_axis.w, 1.0);
        let persp = camera.projection(false, 1.0);
        assert_eq!(persp.w_axis.w, 0.0);
    }

    #[test]
    fn test_perspective_zoom_clamped() {
        let mut camera = Camera {
            perspective: true,
            zoom: 0.1,
            ..Default::default()
        };
        let clamped = camera.projection(false, 1.0);
        camera.zoom = MIN_PERSPECTIVE_ZOOM;
        assert_eq!(clamped, camera.projection(false, 1.0));
    }

    #[test]
    fn test_nudge_targets_active_mode() {
        let mut camera = Camera::default();
        camera.nudge(Nudge::Up);
        assert_eq!(camera.alpha, DEFAULT_ALPHA + 0.5);
        camera.oblique = false;
        camera.nudge(Nudge::Left);
        assert_eq!(camera.theta, DEFAULT_THETA + 0.5);
        camera.reset();
        assert_eq!(camera.alpha, DEFAULT_ALPHA);
        assert_eq!(camera.theta, DEFAULT_THETA);
    }

    #[test]
    fn test_multi_view_quadrants() {
        let mut camera = Camera::default();
        assert_eq!(camera.passes(800, 600).len(), 1);
        camera.multi_view = true;
        let passes = camera.passes(800, 600);
        assert_eq!(passes.len(), 4);
        assert_eq!(passes[0].viewport, Viewport::new(0, 300, 400, 300));
        assert_eq!(passes[3].viewport, Viewport::new(400, 0, 400, 300));
        assert_eq!(passes[0].view, ViewKind::Front.fixed_view().unwrap());
    }

    #[test]
    fn test_wheel_zoom() {
        let mut camera = Camera::default();
        camera.wheel(1.0);
        assert!((camera.zoom - ZOOM_FACTOR).abs() < 1e-6);
        camera.wheel(-1.0);
        assert!((camera.zoom - 1.0).abs() < 1e-6);
    }
}
