/// Scene node stored in the scene graph arena.
///
/// A node is either a graph (ordered children, no drawing of its own) or a
/// leaf wrapping a `Renderable`. Both carry a local-to-parent transform and
/// a cumulative world transform.

use glam::Mat4;
use slotmap::new_key_type;
use crate::scene::renderable::Renderable;
use crate::scene::transform;

// ===== SLOT MAP KEY =====

new_key_type! {
    /// Stable handle to a node within a SceneGraph.
    ///
    /// A key becomes invalid only when its own node is removed.
    pub struct NodeKey;
}

/// Lifecycle state of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Uninitialised,
    Initialised,
    ShutDown,
}

/// What a node is
pub enum NodeKind {
    /// Composite node with ordered children
    Graph { children: Vec<NodeKey> },
    /// Drawable leaf
    Leaf(Box<dyn Renderable>),
}

pub struct SceneNode {
    pub(crate) name: String,
    pub(crate) local_transform: Mat4,
    pub(crate) world_transform: Mat4,
    pub(crate) state: NodeState,
    pub(crate) kind: NodeKind,
}

impl SceneNode {
    /// New empty graph node
    pub fn graph(name: impl Into<String>) -> Self {
        Self::with_kind(name.into(), NodeKind::Graph { children: Vec::new() })
    }

    /// New leaf node
    pub fn leaf(name: impl Into<String>, renderable: Box<dyn Renderable>) -> Self {
        Self::with_kind(name.into(), NodeKind::Leaf(renderable))
    }

    fn with_kind(name: String, kind: NodeKind) -> Self {
        Self {
            name,
            local_transform: Mat4::IDENTITY,
            world_transform: Mat4::IDENTITY,
            state: NodeState::Uninitialised,
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn local_transform(&self) -> Mat4 {
        self.local_transform
    }

    pub fn set_local_transform(&mut self, transform: Mat4) {
        self.local_transform = transform;
    }

    /// Cumulative world transform
    pub fn world_transform(&self) -> Mat4 {
        self.world_transform
    }

    /// Pin the cumulative world transform until the next update touching this node
    pub fn set_world_transform(&mut self, transform: Mat4) {
        self.world_transform = transform;
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_graph(&self) -> bool {
        matches!(self.kind, NodeKind::Graph { .. })
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    /// Children in insertion order (empty for leaves)
    pub fn children(&self) -> &[NodeKey] {
        match &self.kind {
            NodeKind::Graph { children } => children,
            NodeKind::Leaf(_) => &[],
        }
    }

    pub fn renderable(&self) -> Option<&dyn Renderable> {
        match &self.kind {
            NodeKind::Leaf(renderable) => Some(renderable.as_ref()),
            NodeKind::Graph { .. } => None,
        }
    }

    pub fn renderable_mut(&mut self) -> Option<&mut (dyn Renderable + 'static)> {
        match &mut self.kind {
            NodeKind::Leaf(renderable) => Some(renderable.as_mut()),
            NodeKind::Graph { .. } => None,
        }
    }

    /// Recompute the world transform from the parent's
    pub(crate) fn update(&mut self, parent_world: &Mat4) {
        self.world_transform = transform::compose(&self.local_transform, parent_world);
    }
}

impl std::fmt::Debug for SceneNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneNode")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("kind", &if self.is_graph() { "Graph" } else { "Leaf" })
            .field("children", &self.children().len())
            .finish()
    }
}
