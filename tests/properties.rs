use glam::{Mat4, Vec3};
use proptest::prelude::*;
use serde_json::{Map, Value, json};

use tomato_tank::consts::GROUND_OFFSET;
use tomato_tank::renderer::NullRenderer;
use tomato_tank::scene::{DrawOptions, Evaluator, SceneGraph, TransformStack, TransformValue};
use tomato_tank::sim::{
    ControlState, ControlVar, Projectile, ProjectileState, check_ground, integrate,
};

type NodeSpec = (Vec<usize>, f32, bool);

/// Node `i` may only point at nodes after it, so the graph is acyclic.
/// Children past the end become dangling keys.
fn graph_json(specs: &[NodeSpec]) -> String {
    let n = specs.len();
    let mut nodes = Map::new();
    for (i, (children, v, scaled)) in specs.iter().enumerate() {
        let children: Vec<String> = children
            .iter()
            .map(|c| {
                let idx = i + 1 + c;
                if idx < n {
                    format!("n{}", idx)
                } else {
                    format!("missing{}", idx)
                }
            })
            .collect();
        let mut transforms = json!({
            "translation": [v, "move", 0],
            "rotation": [0, "turnCabin", v],
        });
        if *scaled {
            transforms["scale"] = json!([1, "turnCannon", 0.5]);
        }
        let primitive = if i % 2 == 0 { "cube" } else { "bogus" };
        nodes.insert(
            format!("n{}", i),
            json!({
                "transforms": transforms,
                "primitive": primitive,
                "color": [1, 0, 0, 1],
                "children": children,
            }),
        );
    }
    json!({ "root": "n0", "nodes": Value::Object(nodes) }).to_string()
}

fn node_specs() -> impl Strategy<Value = Vec<NodeSpec>> {
    prop::collection::vec(
        (
            prop::collection::vec(0usize..16, 0..4),
            -10.0f32..10.0,
            any::<bool>(),
        ),
        1..12,
    )
}

fn controls() -> impl Strategy<Value = ControlState> {
    (-50.0f32..50.0, -720.0f32..720.0, -102.0f32..30.0).prop_map(|(m, c, p)| ControlState {
        move_offset: m,
        turn_cabin: c,
        turn_cannon: p,
    })
}

fn vec3(range: std::ops::Range<f32>) -> impl Strategy<Value = Vec3> {
    (range.clone(), range.clone(), range).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

proptest! {
    #[test]
    fn evaluation_leaves_stack_depth_unchanged(
        specs in node_specs(),
        controls in controls(),
        outer in 0usize..3,
    ) {
        let graph = SceneGraph::from_json(&graph_json(&specs)).unwrap();
        let mut stack = TransformStack::new();
        for _ in 0..outer {
            stack.push();
        }
        let before = stack.depth();

        let mut eval = Evaluator::new(&graph, &controls, Mat4::IDENTITY, DrawOptions::default());
        eval.evaluate(&mut stack, &mut NullRenderer, graph.root());

        prop_assert_eq!(stack.depth(), before);
    }

    #[test]
    fn resolving_twice_is_bit_identical(controls in controls()) {
        for var in [ControlVar::Move, ControlVar::MoveWheels, ControlVar::TurnCabin, ControlVar::TurnCannon] {
            let value = TransformValue::Var(var);
            prop_assert_eq!(
                value.resolve(&controls).to_bits(),
                value.resolve(&controls).to_bits()
            );
        }
    }

    #[test]
    fn resting_projectiles_never_move(
        pos in vec3(-20.0..20.0),
        vel in vec3(-60.0..60.0),
        attached in any::<bool>(),
        steps in 1usize..50,
    ) {
        let state = if attached { ProjectileState::Attached } else { ProjectileState::Landed };
        let mut p = Projectile::new(1, pos, vel);
        p.state = state;
        for _ in 0..steps {
            integrate(&mut p, 1.0 / 60.0);
            check_ground(&mut p);
        }
        prop_assert_eq!(p.pos, pos);
        prop_assert_eq!(p.vel, vel);
        prop_assert_eq!(p.state, state);
    }

    #[test]
    fn ground_check_clamps_height(pos in vec3(-50.0..50.0), vel in vec3(-60.0..60.0)) {
        let mut p = Projectile::new(1, pos, vel);
        let landed = check_ground(&mut p);
        prop_assert!(p.pos.y >= GROUND_OFFSET);
        prop_assert_eq!(landed, pos.y < GROUND_OFFSET);
        prop_assert_eq!(p.is_flying(), !landed);
    }
}
