//! Hierarchical scene graph
//!
//! - `graph`: node model and JSON description
//! - `stack`: matrix stack with scoped pushes
//! - `eval`: recursive walk that draws and captures attachment matrices

pub mod eval;
pub mod graph;
pub mod stack;

pub use eval::{DrawOptions, Evaluator, SceneContext, apply_transform, render_scene};
pub use graph::{
    BARREL_MOUTH, Color, NodeTransform, Primitive, ResolvedTransform, SceneGraph, SceneNode,
    TARGET_BODY, TransformValue,
};
pub use stack::{StackFrame, TransformStack};

use thiserror::Error;

/// Built-in tank scene
pub const DEFAULT_SCENE: &str = include_str!("../../assets/graph.json");

/// Errors loading a scene description
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read scene file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed scene description: {0}")]
    Json(#[from] serde_json::Error),
    #[error("scene graph has a cycle through node '{key}'")]
    Cycle { key: String },
}
