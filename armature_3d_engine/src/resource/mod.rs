//! Resource management module
//!
//! Procedural geometry, mesh sources, and the shared mesh cache.

pub mod geometry;
pub mod mesh;
pub mod mesh_source;
mod resource_manager;

pub use resource_manager::{ResourceManager, MeshKey};
pub use geometry::{Vertex, MeshData, polygon_normal, compute_vertex_normals};
pub use mesh::{Mesh, SubMesh, Material};
pub use mesh_source::{MeshSource, InMemoryMeshSource, SubMeshData, MaterialData};
