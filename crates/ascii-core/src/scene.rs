//! Typed scene graph and the builder used to compose it.
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. The graph only
//! describes the scene; drawing it is the host engine's job.

use crate::constants::*;
use crate::effect::BridgeConfig;
use crate::shape::{RenderableShape, ShapeKind};
use crate::state::Color;
use glam::Vec3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Light {
    Spot {
        position: Vec3,
        angle: f32,
        penumbra: f32,
        intensity: f32,
    },
    Point {
        position: Vec3,
        intensity: f32,
    },
    Ambient {
        intensity: f32,
    },
}

/// Camera controllers the host may attach. The control algorithm itself
/// belongs to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Controls {
    Orbit,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Group,
    Shape(RenderableShape),
    Light(Light),
    Controls(Controls),
    Effect(BridgeConfig),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneGraph {
    pub background: Color,
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self {
            background: Color::from_hex(BACKGROUND_COLOR_HEX),
            nodes: Vec::new(),
            roots: Vec::new(),
        }
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node under `parent` (or at the root) and return its id.
    pub fn insert(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent,
            children: Vec::new(),
        });
        match parent.and_then(|p| self.nodes.get_mut(p.0)) {
            Some(p) => p.children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn shape(&self, id: NodeId) -> Option<&RenderableShape> {
        match self.nodes.get(id.0).map(|n| &n.kind) {
            Some(NodeKind::Shape(s)) => Some(s),
            _ => None,
        }
    }

    pub fn shape_mut(&mut self, id: NodeId) -> Option<&mut RenderableShape> {
        match self.nodes.get_mut(id.0).map(|n| &mut n.kind) {
            Some(NodeKind::Shape(s)) => Some(s),
            _ => None,
        }
    }

    pub fn shapes(&self) -> impl Iterator<Item = (NodeId, &RenderableShape)> {
        self.iter().filter_map(|(id, n)| match &n.kind {
            NodeKind::Shape(s) => Some((id, s)),
            _ => None,
        })
    }

    pub fn lights(&self) -> impl Iterator<Item = (NodeId, &Light)> {
        self.iter().filter_map(|(id, n)| match &n.kind {
            NodeKind::Light(l) => Some((id, l)),
            _ => None,
        })
    }

    pub fn effects(&self) -> impl Iterator<Item = (NodeId, &BridgeConfig)> {
        self.iter().filter_map(|(id, n)| match &n.kind {
            NodeKind::Effect(c) => Some((id, c)),
            _ => None,
        })
    }

    pub fn has_controls(&self, controls: Controls) -> bool {
        self.nodes
            .iter()
            .any(|n| n.kind == NodeKind::Controls(controls))
    }

    /// World-space position of a node: its own position (shapes and
    /// positioned lights) plus every ancestor's.
    pub fn world_position(&self, id: NodeId) -> Vec3 {
        let mut pos = Vec3::ZERO;
        let mut cur = Some(id);
        while let Some(node_id) = cur {
            let Some(node) = self.nodes.get(node_id.0) else {
                break;
            };
            pos += match &node.kind {
                NodeKind::Shape(s) => s.position,
                NodeKind::Light(Light::Spot { position, .. })
                | NodeKind::Light(Light::Point { position, .. }) => *position,
                _ => Vec3::ZERO,
            };
            cur = node.parent;
        }
        pos
    }
}

/// Declarative-style construction of a [`SceneGraph`].
#[derive(Default)]
pub struct SceneBuilder {
    graph: SceneGraph,
    parent: Option<NodeId>,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn background(mut self, color: Color) -> Self {
        self.graph.background = color;
        self
    }

    pub fn orbit_controls(mut self) -> Self {
        self.graph
            .insert(NodeKind::Controls(Controls::Orbit), self.parent);
        self
    }

    pub fn light(mut self, light: Light) -> Self {
        self.graph.insert(NodeKind::Light(light), self.parent);
        self
    }

    pub fn spot_light(self, position: Vec3, angle: f32, penumbra: f32) -> Self {
        self.light(Light::Spot {
            position,
            angle,
            penumbra,
            intensity: LIGHT_INTENSITY,
        })
    }

    pub fn point_light(self, position: Vec3) -> Self {
        self.light(Light::Point {
            position,
            intensity: LIGHT_INTENSITY,
        })
    }

    pub fn shape(mut self, shape: RenderableShape) -> Self {
        self.graph.insert(NodeKind::Shape(shape), self.parent);
        self
    }

    pub fn effect(mut self, config: BridgeConfig) -> Self {
        self.graph.insert(NodeKind::Effect(config), self.parent);
        self
    }

    /// Add a group node; nodes added inside `f` become its children.
    pub fn group(mut self, f: impl FnOnce(SceneBuilder) -> SceneBuilder) -> Self {
        let outer = self.parent;
        let id = self.graph.insert(NodeKind::Group, outer);
        self.parent = Some(id);
        let mut inner = f(self);
        inner.parent = outer;
        inner
    }

    pub fn build(self) -> SceneGraph {
        self.graph
    }
}

/// The demo scene: black background, orbit controls, a spot and a point
/// light, one octahedron at the origin and an inverted ASCII effect.
pub fn demo_scene() -> SceneGraph {
    demo_scene_with(BridgeConfig::default().with_invert(true))
}

/// The demo scene with a caller-provided effect configuration.
pub fn demo_scene_with(effect: BridgeConfig) -> SceneGraph {
    SceneBuilder::new()
        .background(Color::from_hex(BACKGROUND_COLOR_HEX))
        .orbit_controls()
        .spot_light(SPOT_LIGHT_POSITION, SPOT_LIGHT_ANGLE, SPOT_LIGHT_PENUMBRA)
        .point_light(POINT_LIGHT_POSITION)
        .shape(
            RenderableShape::new(ShapeKind::Octahedron {
                radius: OCTAHEDRON_RADIUS,
                detail: OCTAHEDRON_DETAIL,
            })
            .with_position(Vec3::ZERO),
        )
        .effect(effect)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_scene_has_expected_nodes() {
        let scene = demo_scene();
        assert_eq!(scene.shapes().count(), 1);
        assert_eq!(scene.lights().count(), 2);
        assert!(scene.has_controls(Controls::Orbit));
        let (_, cfg) = scene.effects().next().expect("effect node");
        assert!(cfg.options.invert);
        assert_eq!(cfg.render_order, DEFAULT_RENDER_ORDER);
    }

    #[test]
    fn group_children_inherit_position() {
        let scene = SceneBuilder::new()
            .group(|b| b.shape(RenderableShape::default().with_position(Vec3::X)))
            .shape(RenderableShape::default())
            .build();
        let group = scene.roots()[0];
        assert_eq!(scene.roots().len(), 2);
        assert_eq!(scene.node(group).map(|n| n.children.len()), Some(1));
        let (child, _) = scene.shapes().next().expect("shape");
        assert_eq!(scene.node(child).and_then(|n| n.parent), Some(group));
        assert_eq!(scene.world_position(child), Vec3::X);
    }
}
