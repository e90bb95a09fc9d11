/// SceneGraph — a named tree of nodes with lifecycle traversal.
///
/// Nodes live in a SlotMap arena owned by the graph; `NodeKey` handles stay
/// valid until their own node is removed. Every traversal is depth-first in
/// insertion order starting at the root graph node.
///
/// Two update modes are supported:
/// - `Broadcast` (default): every leaf receives the same world transform,
///   whatever its depth. Graph nodes only forward it.
/// - `Hierarchical`: each nested graph composes its own local transform and
///   passes the result down.

use glam::Mat4;
use slotmap::SlotMap;
use crate::error::{Error, Result};
use crate::scene::renderable::{Renderable, RenderContext};
use crate::scene::scene_node::{NodeKey, NodeKind, NodeState, SceneNode};

// ===== CONFIGURATION =====

/// How `update` propagates the world transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateMode {
    /// Same transform for every leaf; nested graphs do not contribute
    #[default]
    Broadcast,
    /// Nested graphs compose their own local transform
    Hierarchical,
}

/// What `initialise` does when a node fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitialisePolicy {
    /// Stop at the first failure; nodes already initialised stay initialised
    #[default]
    FailFast,
    /// Stop at the first failure and shut down, in reverse order, every node
    /// this call initialised
    RollbackOnFailure,
}

/// Scene graph behaviour switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SceneGraphConfig {
    pub update_mode: UpdateMode,
    pub initialise_policy: InitialisePolicy,
}

// ===== SCENE GRAPH =====

pub struct SceneGraph {
    nodes: SlotMap<NodeKey, SceneNode>,
    root: NodeKey,
    config: SceneGraphConfig,
}

impl SceneGraph {
    /// Create a graph whose root graph node is called `root_name`
    pub fn new(root_name: impl Into<String>) -> Self {
        Self::with_config(root_name, SceneGraphConfig::default())
    }

    pub fn with_config(root_name: impl Into<String>, config: SceneGraphConfig) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(SceneNode::graph(root_name));
        Self { nodes, root, config }
    }

    pub fn config(&self) -> SceneGraphConfig {
        self.config
    }

    pub fn set_config(&mut self, config: SceneGraphConfig) {
        self.config = config;
    }

    // ===== STRUCTURE =====

    /// Key of the root graph node
    pub fn root(&self) -> NodeKey {
        self.root
    }

    /// Number of nodes below the root
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    /// True when the root has no descendants
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn node(&self, key: NodeKey) -> Option<&SceneNode> {
        self.nodes.get(key)
    }

    pub fn node_mut(&mut self, key: NodeKey) -> Option<&mut SceneNode> {
        self.nodes.get_mut(key)
    }

    /// Children of `key` in insertion order (None if the key is stale)
    pub fn children(&self, key: NodeKey) -> Option<&[NodeKey]> {
        self.nodes.get(key).map(SceneNode::children)
    }

    /// Append a leaf under `parent`
    ///
    /// Names are not checked for uniqueness; `find` returns the first match.
    ///
    /// # Errors
    ///
    /// `InvalidNode` if `parent` is stale or a leaf.
    pub fn add<R: Renderable + 'static>(
        &mut self,
        parent: NodeKey,
        name: impl Into<String>,
        renderable: R,
    ) -> Result<NodeKey> {
        self.attach(parent, SceneNode::leaf(name, Box::new(renderable)))
    }

    /// Append an empty graph node under `parent`
    pub fn add_graph(&mut self, parent: NodeKey, name: impl Into<String>) -> Result<NodeKey> {
        self.attach(parent, SceneNode::graph(name))
    }

    fn attach(&mut self, parent: NodeKey, node: SceneNode) -> Result<NodeKey> {
        match self.nodes.get(parent).map(SceneNode::is_graph) {
            Some(true) => {}
            Some(false) => {
                return Err(Error::InvalidNode(format!(
                    "Cannot add '{}' under leaf '{}'", node.name, self.nodes[parent].name
                )));
            }
            None => {
                return Err(Error::InvalidNode(format!(
                    "Cannot add '{}' under a removed node", node.name
                )));
            }
        }
        let key = self.nodes.insert(node);
        self.push_child(parent, key);
        Ok(key)
    }

    fn push_child(&mut self, parent: NodeKey, child: NodeKey) {
        if let Some(SceneNode { kind: NodeKind::Graph { children }, .. }) = self.nodes.get_mut(parent) {
            children.push(child);
        }
    }

    /// Detach `node` and its subtree
    ///
    /// Starting at the root, a graph drops `node` if it is one of its direct
    /// children, otherwise it asks its child graphs in insertion order.
    /// Sibling order is preserved. The detached subtree is returned as its
    /// own graph (under a fresh root named "Detached") so the caller can
    /// shut it down. Returns None for the root or a stale key.
    pub fn remove(&mut self, node: NodeKey) -> Option<SceneGraph> {
        if node == self.root || !self.nodes.contains_key(node) {
            return None;
        }
        if !self.unlink(self.root, node) {
            return None;
        }
        let name = self.nodes[node].name.clone();

        let mut detached = SceneGraph::with_config("Detached", self.config);
        detached.nodes[detached.root].state = NodeState::Initialised;
        let detached_root = detached.root;
        self.transplant(node, &mut detached, detached_root);

        crate::engine_debug!("armature3d::SceneGraph", "Removed '{}' ({} nodes)", name, detached.len());
        Some(detached)
    }

    fn unlink(&mut self, graph: NodeKey, node: NodeKey) -> bool {
        let children: Vec<NodeKey> = match self.nodes.get_mut(graph) {
            Some(SceneNode { kind: NodeKind::Graph { children }, .. }) => {
                if let Some(position) = children.iter().position(|&child| child == node) {
                    children.remove(position);
                    return true;
                }
                children.clone()
            }
            _ => return false,
        };
        children.into_iter().any(|child| self.unlink(child, node))
    }

    fn transplant(&mut self, key: NodeKey, target: &mut SceneGraph, target_parent: NodeKey) {
        let Some(mut node) = self.nodes.remove(key) else {
            return;
        };
        let children = match &mut node.kind {
            NodeKind::Graph { children } => std::mem::take(children),
            NodeKind::Leaf(_) => Vec::new(),
        };
        let new_key = target.nodes.insert(node);
        target.push_child(target_parent, new_key);
        for child in children {
            self.transplant(child, target, new_key);
        }
    }

    // ===== LOOKUP =====

    /// First node named `name` in depth-first insertion order
    pub fn find(&self, name: &str) -> Option<NodeKey> {
        self.find_from(self.root, name)
    }

    /// Like `find`, starting at `start` (which is checked first)
    pub fn find_from(&self, start: NodeKey, name: &str) -> Option<NodeKey> {
        self.depth_first(start)
            .into_iter()
            .find(|&key| self.nodes[key].name == name)
    }

    /// Keys in depth-first pre-order, root first
    pub fn iter(&self) -> std::vec::IntoIter<NodeKey> {
        self.depth_first(self.root).into_iter()
    }

    fn depth_first(&self, start: NodeKey) -> Vec<NodeKey> {
        let mut order = Vec::new();
        if !self.nodes.contains_key(start) {
            return order;
        }
        let mut stack = vec![start];
        while let Some(key) = stack.pop() {
            order.push(key);
            stack.extend(self.nodes[key].children().iter().rev());
        }
        order
    }

    /// Children before their parent graph, siblings in insertion order
    fn depth_first_post_order(&self, start: NodeKey) -> Vec<NodeKey> {
        let mut order = Vec::new();
        let mut stack = vec![(start, false)];
        while let Some((key, expanded)) = stack.pop() {
            if expanded {
                order.push(key);
                continue;
            }
            stack.push((key, true));
            stack.extend(self.nodes[key].children().iter().rev().map(|&child| (child, false)));
        }
        order
    }

    // ===== TRANSFORMS =====

    pub fn name(&self, key: NodeKey) -> Option<&str> {
        self.nodes.get(key).map(SceneNode::name)
    }

    pub fn state(&self, key: NodeKey) -> Option<NodeState> {
        self.nodes.get(key).map(SceneNode::state)
    }

    /// Pin the cumulative world transform; false if the key is stale
    pub fn set_world_transform(&mut self, key: NodeKey, transform: Mat4) -> bool {
        match self.nodes.get_mut(key) {
            Some(node) => {
                node.set_world_transform(transform);
                true
            }
            None => false,
        }
    }

    pub fn world_transform(&self, key: NodeKey) -> Option<Mat4> {
        self.nodes.get(key).map(SceneNode::world_transform)
    }

    pub fn set_local_transform(&mut self, key: NodeKey, transform: Mat4) -> bool {
        match self.nodes.get_mut(key) {
            Some(node) => {
                node.set_local_transform(transform);
                true
            }
            None => false,
        }
    }

    pub fn local_transform(&self, key: NodeKey) -> Option<Mat4> {
        self.nodes.get(key).map(SceneNode::local_transform)
    }

    // ===== LIFECYCLE =====

    /// Initialise every node, depth-first in insertion order
    ///
    /// Nodes already initialised are skipped. Stops at the first failure and
    /// returns its error; see `InitialisePolicy` for what happens to the
    /// nodes initialised before it.
    pub fn initialise(&mut self, ctx: &mut RenderContext) -> Result<()> {
        let mut initialised_now = Vec::new();

        for key in self.depth_first(self.root) {
            let SceneNode { name, state, kind, .. } = &mut self.nodes[key];
            if *state != NodeState::Uninitialised {
                continue;
            }
            let result = match kind {
                NodeKind::Graph { .. } => Ok(()),
                NodeKind::Leaf(renderable) => renderable.initialise(name, ctx),
            };
            match result {
                Ok(()) => {
                    *state = NodeState::Initialised;
                    initialised_now.push(key);
                }
                Err(err) => {
                    crate::engine_error!("armature3d::SceneGraph",
                        "Initialisation of '{}' failed: {}", name, err);
                    if self.config.initialise_policy == InitialisePolicy::RollbackOnFailure {
                        self.roll_back(key, &initialised_now, ctx);
                    }
                    return Err(err);
                }
            }
        }

        crate::engine_debug!("armature3d::SceneGraph", "Initialised {} nodes", initialised_now.len());
        Ok(())
    }

    fn roll_back(&mut self, failed: NodeKey, initialised: &[NodeKey], ctx: &mut RenderContext) {
        for &key in std::iter::once(&failed).chain(initialised.iter().rev()) {
            let SceneNode { name, state, kind, .. } = &mut self.nodes[key];
            if let NodeKind::Leaf(renderable) = kind {
                renderable.shutdown(name, ctx);
            }
            *state = NodeState::Uninitialised;
        }
        crate::engine_warn!("armature3d::SceneGraph",
            "Rolled back {} initialised nodes", initialised.len());
    }

    /// Recompute world transforms from `world`
    ///
    /// The root is the frame of reference and is never recomputed.
    pub fn update(&mut self, world: &Mat4) {
        match self.config.update_mode {
            UpdateMode::Broadcast => {
                for key in self.depth_first(self.root) {
                    let node = &mut self.nodes[key];
                    if key != self.root && node.is_leaf() {
                        node.update(world);
                    }
                }
            }
            UpdateMode::Hierarchical => {
                let mut stack: Vec<(NodeKey, Mat4)> = self.nodes[self.root]
                    .children()
                    .iter()
                    .rev()
                    .map(|&child| (child, *world))
                    .collect();
                while let Some((key, parent_world)) = stack.pop() {
                    let node = &mut self.nodes[key];
                    node.update(&parent_world);
                    let node_world = node.world_transform;
                    stack.extend(node.children().iter().rev().map(|&child| (child, node_world)));
                }
            }
        }
    }

    /// Render every initialised leaf in insertion order
    ///
    /// Leaves that are not initialised are skipped with a warning. The first
    /// backend error stops the pass.
    pub fn render(&mut self, ctx: &mut RenderContext) -> Result<()> {
        for key in self.depth_first(self.root) {
            let SceneNode { name, world_transform, state, kind, .. } = &mut self.nodes[key];
            let NodeKind::Leaf(renderable) = kind else {
                continue;
            };
            if *state != NodeState::Initialised {
                crate::engine_warn!("armature3d::SceneGraph",
                    "Skipping '{}': node is {:?}", name, state);
                continue;
            }
            renderable.render(name, world_transform, ctx)?;
        }
        Ok(())
    }

    /// Shut down every node, children of a graph before the graph itself
    ///
    /// Idempotent: nodes already shut down are skipped.
    pub fn shutdown(&mut self, ctx: &mut RenderContext) {
        let mut count = 0;
        for key in self.depth_first_post_order(self.root) {
            let SceneNode { name, state, kind, .. } = &mut self.nodes[key];
            if *state == NodeState::ShutDown {
                continue;
            }
            if let NodeKind::Leaf(renderable) = kind {
                renderable.shutdown(name, ctx);
            }
            *state = NodeState::ShutDown;
            count += 1;
        }
        if count > 0 {
            crate::engine_debug!("armature3d::SceneGraph", "Shut down {} nodes", count);
        }
    }
}

impl std::fmt::Debug for SceneGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneGraph")
            .field("root", &self.nodes[self.root].name)
            .field("nodes", &self.nodes.len())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
#[path = "scene_graph_tests.rs"]
mod tests;
