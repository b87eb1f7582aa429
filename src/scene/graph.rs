//! Scene graph model loaded from a JSON description
//!
//! Nodes are keyed by string. Each may carry a transform whose components are
//! literal numbers or names of live control variables, a primitive, colors
//! and an ordered child list. The graph is read-only once loaded.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::SceneError;
use crate::sim::{ControlState, ControlVar};

/// Barrel muzzle attachment node
pub const BARREL_MOUTH: &str = "barrelMouth";
/// Cow body attachment node
pub const TARGET_BODY: &str = "Archibald";

/// One transform component: a number or a live control variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawValue", into = "RawValue")]
pub enum TransformValue {
    Literal(f32),
    Var(ControlVar),
    /// Name that matches no control variable; resolves to zero
    Unknown(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Number(f32),
    Name(String),
}

impl From<RawValue> for TransformValue {
    fn from(raw: RawValue) -> Self {
        match raw {
            RawValue::Number(n) => TransformValue::Literal(n),
            RawValue::Name(name) => match ControlVar::from_name(&name) {
                Some(var) => TransformValue::Var(var),
                None => TransformValue::Unknown(name),
            },
        }
    }
}

impl From<TransformValue> for RawValue {
    fn from(value: TransformValue) -> Self {
        match value {
            TransformValue::Literal(n) => RawValue::Number(n),
            TransformValue::Var(var) => RawValue::Name(var.as_str().to_string()),
            TransformValue::Unknown(name) => RawValue::Name(name),
        }
    }
}

impl TransformValue {
    #[inline]
    pub fn resolve(&self, controls: &ControlState) -> f32 {
        match self {
            TransformValue::Literal(n) => *n,
            TransformValue::Var(var) => controls.value(*var),
            TransformValue::Unknown(_) => 0.0,
        }
    }
}

/// Resolve up to three components, padding missing ones with `default`
fn resolve_vec3(values: &[TransformValue], controls: &ControlState, default: f32) -> Vec3 {
    let at = |i: usize| values.get(i).map_or(default, |v| v.resolve(controls));
    Vec3::new(at(0), at(1), at(2))
}

/// Local transform of a node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeTransform {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<Vec<TransformValue>>,
    /// Degrees about X, Y, Z; applied Z first, then Y, then X
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Vec<TransformValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Vec<TransformValue>>,
}

/// Transform with every symbolic reference substituted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedTransform {
    pub translation: Option<Vec3>,
    pub rotation: Option<Vec3>,
    pub scale: Option<Vec3>,
}

impl NodeTransform {
    pub fn resolve(&self, controls: &ControlState) -> ResolvedTransform {
        ResolvedTransform {
            translation: self
                .translation
                .as_deref()
                .map(|t| resolve_vec3(t, controls, 0.0)),
            rotation: self
                .rotation
                .as_deref()
                .map(|r| resolve_vec3(r, controls, 0.0)),
            scale: self.scale.as_deref().map(|s| resolve_vec3(s, controls, 1.0)),
        }
    }
}

/// Drawable shapes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Primitive {
    Cube,
    Cylinder,
    Sphere,
    /// The target creature mesh
    Cow,
    /// Unrecognized name; never drawn
    Other(String),
}

impl From<String> for Primitive {
    fn from(name: String) -> Self {
        match name.as_str() {
            "cube" => Primitive::Cube,
            "cylinder" => Primitive::Cylinder,
            "sphere" => Primitive::Sphere,
            "cow" => Primitive::Cow,
            _ => Primitive::Other(name),
        }
    }
}

impl From<Primitive> for String {
    fn from(primitive: Primitive) -> Self {
        match primitive {
            Primitive::Cube => "cube".to_string(),
            Primitive::Cylinder => "cylinder".to_string(),
            Primitive::Sphere => "sphere".to_string(),
            Primitive::Cow => "cow".to_string(),
            Primitive::Other(name) => name,
        }
    }
}

/// RGBA color
pub type Color = [f32; 4];

/// A scene graph node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transforms: Option<NodeTransform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primitive: Option<Primitive>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_color: Option<Color>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<String>,
}

/// The whole scene description. Built through [`SceneGraph::from_json`] or
/// [`SceneGraph::new`], both of which reject cycles.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "RawGraph")]
pub struct SceneGraph {
    root: String,
    cow_root: Option<String>,
    tomato_root: Option<String>,
    nodes: BTreeMap<String, SceneNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawGraph {
    root: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cow_root: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tomato_root: Option<String>,
    nodes: BTreeMap<String, SceneNode>,
}

impl From<SceneGraph> for RawGraph {
    fn from(graph: SceneGraph) -> Self {
        RawGraph {
            root: graph.root,
            cow_root: graph.cow_root,
            tomato_root: graph.tomato_root,
            nodes: graph.nodes,
        }
    }
}

impl SceneGraph {
    /// Build a graph, rejecting cycles. Dangling child keys are allowed.
    pub fn new(
        root: String,
        cow_root: Option<String>,
        tomato_root: Option<String>,
        nodes: BTreeMap<String, SceneNode>,
    ) -> Result<Self, SceneError> {
        let graph = Self {
            root,
            cow_root,
            tomato_root,
            nodes,
        };
        graph.check_acyclic()?;
        Ok(graph)
    }

    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        let raw: RawGraph = serde_json::from_str(json)?;
        let graph = Self::new(raw.root, raw.cow_root, raw.tomato_root, raw.nodes)?;
        log::info!(
            "Scene graph loaded: {} nodes, root '{}'",
            graph.nodes.len(),
            graph.root
        );
        let dangling = graph.dangling_children();
        if !dangling.is_empty() {
            log::warn!("Scene graph references missing nodes: {:?}", dangling);
        }
        Ok(graph)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Subtree drawn at the target's mount
    pub fn cow_root(&self) -> Option<&str> {
        self.cow_root.as_deref()
    }

    /// Subtree drawn at each projectile
    pub fn tomato_root(&self) -> Option<&str> {
        self.tomato_root.as_deref()
    }

    pub fn node(&self, key: &str) -> Option<&SceneNode> {
        self.nodes.get(key)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Child keys that name no node
    pub fn dangling_children(&self) -> Vec<&str> {
        self.nodes
            .values()
            .flat_map(|n| n.children.iter())
            .filter(|c| !self.nodes.contains_key(c.as_str()))
            .map(String::as_str)
            .collect()
    }

    fn check_acyclic(&self) -> Result<(), SceneError> {
        let mut done: HashSet<&str> = HashSet::new();
        for start in self.nodes.keys() {
            let mut on_path: Vec<&str> = Vec::new();
            self.visit(start, &mut on_path, &mut done)?;
        }
        Ok(())
    }

    fn visit<'a>(
        &'a self,
        key: &'a str,
        on_path: &mut Vec<&'a str>,
        done: &mut HashSet<&'a str>,
    ) -> Result<(), SceneError> {
        if done.contains(key) {
            return Ok(());
        }
        if on_path.contains(&key) {
            return Err(SceneError::Cycle {
                key: key.to_string(),
            });
        }
        let Some(node) = self.nodes.get(key) else {
            return Ok(());
        };
        on_path.push(key);
        for child in &node.children {
            self.visit(child, on_path, done)?;
        }
        on_path.pop();
        done.insert(key);
        Ok(())
    }
}
