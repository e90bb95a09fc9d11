//! Scene module
//!
//! Scene graph (arena of graph and leaf nodes), transform helpers, the
//! `Renderable` leaf contract and the concrete leaf kinds.

pub mod transform;
mod renderable;
mod scene_node;
mod scene_graph;
pub mod nodes;

pub use renderable::{Renderable, RenderContext};
pub use scene_node::{NodeKey, NodeKind, NodeState, SceneNode};
pub use scene_graph::{SceneGraph, SceneGraphConfig, UpdateMode, InitialisePolicy};
pub use nodes::{CubeNode, TeapotNode, TexturedCubeNode, ModelNode};
