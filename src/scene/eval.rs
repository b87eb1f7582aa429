//! Scene graph evaluation
//!
//! Walks the graph depth-first, composing transforms on a [`TransformStack`]
//! and issuing draws to a [`RenderService`]. Children are always evaluated
//! inside their own stack scope, so sibling subtrees never see each other's
//! transforms.

use glam::Mat4;

use super::graph::{BARREL_MOUTH, Color, Primitive, ResolvedTransform, SceneGraph, TARGET_BODY};
use super::stack::TransformStack;
use crate::consts::{FLOOR_TILE_SIZE, FLOOR_TILES};
use crate::renderer::{DrawStyle, RenderService, colors};
use crate::sim::{Anchors, ControlState, GameRound, ProjectileState};

/// Global drawing switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawOptions {
    /// Draw filled triangles on top of the outline
    pub solid: bool,
    /// Skin the cow
    pub textured: bool,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            solid: true,
            textured: false,
        }
    }
}

/// Apply a node transform: translation, rotation Z, Y, X, then scale
pub fn apply_transform(stack: &mut TransformStack, t: &ResolvedTransform) {
    if let Some(translation) = t.translation {
        stack.multiply_translation(translation);
    }
    if let Some(rotation) = t.rotation {
        stack.multiply_rotation_z(rotation.z);
        stack.multiply_rotation_y(rotation.y);
        stack.multiply_rotation_x(rotation.x);
    }
    if let Some(scale) = t.scale {
        stack.multiply_scale(scale);
    }
}

/// One walk over the graph for a single camera view
pub struct Evaluator<'a> {
    graph: &'a SceneGraph,
    controls: &'a ControlState,
    options: DrawOptions,
    view_inverse: Mat4,
    barrel: Option<Mat4>,
    target_body: Option<Mat4>,
}

impl<'a> Evaluator<'a> {
    pub fn new(
        graph: &'a SceneGraph,
        controls: &'a ControlState,
        view: Mat4,
        options: DrawOptions,
    ) -> Self {
        Self {
            graph,
            controls,
            options,
            view_inverse: view.inverse(),
            barrel: None,
            target_body: None,
        }
    }

    /// World matrix of the barrel muzzle, if it was visited
    pub fn barrel(&self) -> Option<Mat4> {
        self.barrel
    }

    /// World matrix of the cow body, if it was visited
    pub fn target_body(&self) -> Option<Mat4> {
        self.target_body
    }

    /// Evaluate `key` and its subtree. Unknown keys are skipped.
    pub fn evaluate<R: RenderService + ?Sized>(
        &mut self,
        stack: &mut TransformStack,
        renderer: &mut R,
        key: &str,
    ) {
        let graph = self.graph;
        let Some(node) = graph.node(key) else {
            return;
        };

        if let Some(transforms) = &node.transforms {
            apply_transform(stack, &transforms.resolve(self.controls));
        }

        if key == BARREL_MOUTH {
            self.barrel = Some(self.view_inverse * stack.current());
        } else if key == TARGET_BODY {
            self.target_body = Some(self.view_inverse * stack.current());
        }

        if let (Some(primitive), Some(color)) = (&node.primitive, node.color) {
            self.draw_primitive(stack, renderer, primitive, color, node.line_color);
        }

        for child in &node.children {
            let mut frame = stack.scope();
            self.evaluate(&mut frame, renderer, child);
        }
    }

    fn draw_primitive<R: RenderService + ?Sized>(
        &self,
        stack: &TransformStack,
        renderer: &mut R,
        primitive: &Primitive,
        color: Color,
        line_color: Option<Color>,
    ) {
        if let Primitive::Other(name) = primitive {
            log::trace!("Skipping unknown primitive '{}'", name);
            return;
        }
        renderer.set_textured(self.options.textured && *primitive == Primitive::Cow);
        renderer.set_model_view(&stack.current());
        renderer.set_color(line_color.unwrap_or(colors::LINE));
        renderer.draw(primitive, DrawStyle::Outline);
        if self.options.solid {
            renderer.set_color(color);
            renderer.draw(primitive, DrawStyle::Filled);
        }
    }

    /// Checkerboard floor of `width` × `depth` tiles centred on the origin
    pub fn draw_floor<R: RenderService + ?Sized>(
        &self,
        stack: &mut TransformStack,
        renderer: &mut R,
        width: u32,
        depth: u32,
        tile: f32,
    ) {
        let mut floor = stack.scope();
        floor.multiply_translation(glam::Vec3::new(
            -(width as f32) + tile / 2.0,
            0.0,
            -(depth as f32) + tile / 2.0,
        ));
        floor.multiply_scale(glam::Vec3::new(tile, 0.1, tile));

        let style = if self.options.solid {
            DrawStyle::Filled
        } else {
            DrawStyle::Outline
        };
        renderer.set_textured(false);
        let mut dark = true;
        for i in 0..width {
            for j in 0..depth {
                let mut cell = floor.scope();
                cell.multiply_translation(glam::Vec3::new(i as f32, 0.0, j as f32));
                renderer.set_model_view(&cell.current());
                renderer.set_color(if dark {
                    colors::FLOOR_DARK
                } else {
                    colors::FLOOR_LIGHT
                });
                renderer.draw(&Primitive::Cube, style);
                dark = !dark;
            }
            dark = !dark;
        }
    }
}

/// Everything a full pass needs to read
pub struct SceneContext<'a> {
    pub graph: &'a SceneGraph,
    pub controls: &'a ControlState,
    pub round: &'a GameRound,
    pub options: DrawOptions,
    /// Draw the checkerboard floor
    pub floor: bool,
}

/// Draw the whole scene from one view: tank, floor, cow, tomatoes.
///
/// The stack must be unwound on entry and is unwound again on return.
pub fn render_scene<R: RenderService + ?Sized>(
    ctx: &SceneContext<'_>,
    view: Mat4,
    stack: &mut TransformStack,
    renderer: &mut R,
) -> Anchors {
    let mut eval = Evaluator::new(ctx.graph, ctx.controls, view, ctx.options);

    stack.load(view);
    {
        let mut frame = stack.scope();
        eval.evaluate(&mut frame, renderer, ctx.graph.root());
    }
    if ctx.floor {
        eval.draw_floor(stack, renderer, FLOOR_TILES, FLOOR_TILES, FLOOR_TILE_SIZE);
    }

    let target = &ctx.round.target;
    let mut target_mount = None;
    if target.is_alive() {
        let mount = target.mount_matrix(ctx.round.dance_elapsed());
        target_mount = Some(mount);
        if let Some(cow_root) = ctx.graph.cow_root() {
            stack.load(view);
            let mut frame = stack.scope();
            frame.multiply(mount);
            eval.evaluate(&mut frame, renderer, cow_root);
        }
    }

    if let Some(tomato_root) = ctx.graph.tomato_root() {
        for projectile in &ctx.round.projectiles {
            let base = match (projectile.state, target_mount) {
                (ProjectileState::Attached, Some(mount)) => view * mount,
                (ProjectileState::Attached, None) => continue,
                _ => view,
            };
            stack.load(base);
            let mut frame = stack.scope();
            frame.multiply_translation(projectile.pos);
            eval.evaluate(&mut frame, renderer, tomato_root);
        }
    }

    stack.reset();

    Anchors {
        barrel: eval.barrel(),
        target_body: eval.target_body(),
        target_mount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RecordingRenderer;
    use crate::sim::{Projectile, Trigger};
    use glam::Vec3;

    const TREE: &str = r#"{
        "root": "base",
        "cow_root": "cow",
        "tomato_root": "tomato",
        "nodes": {
            "base": {
                "transforms": { "translation": ["move", 0, 0] },
                "children": ["left", "right", "missing"]
            },
            "left": {
                "transforms": { "translation": [-1, 0, 0], "scale": [2, 2, 2] },
                "primitive": "cube",
                "color": [1, 0, 0, 1]
            },
            "right": {
                "transforms": { "translation": [1, 0, 0], "rotation": [0, "turnCabin", 0] },
                "primitive": "teapot",
                "color": [0, 1, 0, 1],
                "children": ["barrelMouth"]
            },
            "barrelMouth": { "transforms": { "translation": [0, 2, 0] } },
            "cow": { "children": ["Archibald"] },
            "Archibald": {
                "transforms": { "scale": [1.3, 0.7, 0.5] },
                "primitive": "cow",
                "color": [1, 1, 1, 1]
            },
            "tomato": { "primitive": "sphere", "color": [1, 0, 0, 1] }
        }
    }"#;

    fn ctx<'a>(graph: &'a SceneGraph, controls: &'a ControlState, round: &'a GameRound) -> SceneContext<'a> {
        SceneContext {
            graph,
            controls,
            round,
            options: DrawOptions::default(),
            floor: false,
        }
    }

    #[test]
    fn test_siblings_do_not_leak() {
        let graph = SceneGraph::from_json(TREE).unwrap();
        let controls = ControlState::default();
        let round = GameRound::new(1, 0);
        let mut stack = TransformStack::new();
        let mut renderer = RecordingRenderer::new();

        let anchors = render_scene(&ctx(&graph, &controls, &round), Mat4::IDENTITY, &mut stack, &mut renderer);

        // Only "left" is drawable (teapot is unknown): outline + fill
        assert_eq!(renderer.calls.len(), 2);
        let left = renderer.calls[0].uniforms.model_view;
        assert_eq!(
            left,
            Mat4::from_translation(Vec3::new(-1.0, 0.0, 0.0)) * Mat4::from_scale(Vec3::splat(2.0))
        );
        // The barrel sits under "right" and must not inherit left's scale
        let barrel = anchors.barrel.unwrap().transform_point3(Vec3::ZERO);
        assert!((barrel - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-6);
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_outline_only_when_not_solid() {
        let graph = SceneGraph::from_json(TREE).unwrap();
        let controls = ControlState::default();
        let round = GameRound::new(1, 0);
        let mut stack = TransformStack::new();
        let mut renderer = RecordingRenderer::new();
        let mut context = ctx(&graph, &controls, &round);
        context.options.solid = false;

        render_scene(&context, Mat4::IDENTITY, &mut stack, &mut renderer);
        assert_eq!(renderer.count(DrawStyle::Outline), 1);
        assert_eq!(renderer.count(DrawStyle::Filled), 0);
        assert_eq!(renderer.calls[0].uniforms.color, colors::LINE);
    }

    #[test]
    fn test_captures_are_world_space() {
        let graph = SceneGraph::from_json(TREE).unwrap();
        let controls = ControlState {
            move_offset: 3.0,
            ..Default::default()
        };
        let round = GameRound::new(1, 0);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 3.0, 10.0), Vec3::new(0.0, 3.0, 0.0), Vec3::Y);
        let mut stack = TransformStack::new();
        let mut renderer = RecordingRenderer::new();

        let anchors = render_scene(&ctx(&graph, &controls, &round), view, &mut stack, &mut renderer);
        let barrel = anchors.barrel.unwrap().transform_point3(Vec3::ZERO);
        assert!((barrel - Vec3::new(4.0, 2.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_target_and_tomatoes_drawn() {
        let graph = SceneGraph::from_json(TREE).unwrap();
        let controls = ControlState::default();
        let mut round = GameRound::new(5, 0);
        round.transition(Trigger::Toggle);
        round
            .projectiles
            .push(Projectile::new(1, Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO));
        let mut attached = Projectile::new(2, Vec3::new(0.1, 0.0, 0.0), Vec3::ZERO);
        attached.state = ProjectileState::Attached;
        round.projectiles.push(attached);

        let mut stack = TransformStack::new();
        let mut renderer = RecordingRenderer::new();
        let mut context = ctx(&graph, &controls, &round);
        context.options.textured = true;
        let anchors = render_scene(&context, Mat4::IDENTITY, &mut stack, &mut renderer);

        let mount = round.target.mount_matrix(None);
        assert_eq!(anchors.target_mount, Some(mount));
        assert!(anchors.target_body.is_some());

        let cows: Vec<_> = renderer
            .calls
            .iter()
            .filter(|c| c.primitive == Primitive::Cow)
            .collect();
        assert_eq!(cows.len(), 2);
        assert!(cows.iter().all(|c| c.textured));

        let spheres: Vec<Mat4> = renderer
            .calls
            .iter()
            .filter(|c| c.primitive == Primitive::Sphere && c.style == DrawStyle::Filled)
            .map(|c| c.uniforms.model_view)
            .collect();
        assert_eq!(spheres.len(), 2);
        assert_eq!(spheres[0], Mat4::from_translation(Vec3::new(0.0, 5.0, 0.0)));
        assert_eq!(spheres[1], mount * Mat4::from_translation(Vec3::new(0.1, 0.0, 0.0)));
    }

    #[test]
    fn test_floor_checkerboard() {
        let graph = SceneGraph::from_json(TREE).unwrap();
        let controls = ControlState::default();
        let eval = Evaluator::new(&graph, &controls, Mat4::IDENTITY, DrawOptions::default());
        let mut stack = TransformStack::new();
        let mut renderer = RecordingRenderer::new();

        eval.draw_floor(&mut stack, &mut renderer, 2, 2, 2.0);
        assert_eq!(renderer.calls.len(), 4);
        assert_eq!(renderer.calls[0].uniforms.color, colors::FLOOR_DARK);
        assert_eq!(renderer.calls[1].uniforms.color, colors::FLOOR_LIGHT);
        // Next row starts on the opposite color
        assert_eq!(renderer.calls[2].uniforms.color, colors::FLOOR_LIGHT);
        assert_eq!(stack.depth(), 0);
    }
}
