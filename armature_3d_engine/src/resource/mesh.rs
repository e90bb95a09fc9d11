//! Resource-level mesh types.
//!
//! A `Mesh` is a named list of `SubMesh`es, each with its own GPU buffers and
//! `Material`. Meshes are uploaded and shared by the `ResourceManager`.
//!
//! ```text
//! Mesh "airplane.x"
//! ├── SubMesh 0 (vertex buffer, index buffer, material)
//! └── SubMesh 1 (...)
//! ```

use std::sync::Arc;
use glam::Vec4;
use crate::renderer::{Buffer, Texture};

// ============================================================================
// MATERIAL
// ============================================================================

/// Surface parameters of a submesh
#[derive(Clone)]
pub struct Material {
    pub diffuse_colour: Vec4,
    pub specular_colour: Vec4,
    pub shininess: f32,
    /// Diffuse texture (only sampled when the submesh has texture coordinates)
    pub texture: Option<Arc<dyn Texture>>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            diffuse_colour: Vec4::ONE,
            specular_colour: Vec4::ONE,
            shininess: 0.0,
            texture: None,
        }
    }
}

impl std::fmt::Debug for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Material")
            .field("diffuse_colour", &self.diffuse_colour)
            .field("specular_colour", &self.specular_colour)
            .field("shininess", &self.shininess)
            .field("texture", &self.texture.as_ref().map(|t| t.name().to_string()))
            .finish()
    }
}

// ============================================================================
// SUBMESH
// ============================================================================

/// A drawable part of a mesh (u32 indices, triangle list)
pub struct SubMesh {
    vertex_buffer: Arc<dyn Buffer>,
    index_buffer: Arc<dyn Buffer>,
    index_count: u32,
    has_tex_coords: bool,
    material: Material,
}

impl SubMesh {
    pub fn new(
        vertex_buffer: Arc<dyn Buffer>,
        index_buffer: Arc<dyn Buffer>,
        index_count: u32,
        has_tex_coords: bool,
        material: Material,
    ) -> Self {
        Self { vertex_buffer, index_buffer, index_count, has_tex_coords, material }
    }

    pub fn vertex_buffer(&self) -> &Arc<dyn Buffer> {
        &self.vertex_buffer
    }

    pub fn index_buffer(&self) -> &Arc<dyn Buffer> {
        &self.index_buffer
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Whether vertices carry meaningful texture coordinates
    pub fn has_tex_coords(&self) -> bool {
        self.has_tex_coords
    }

    pub fn material(&self) -> &Material {
        &self.material
    }
}

// ============================================================================
// MESH
// ============================================================================

/// Uploaded mesh shared between nodes
pub struct Mesh {
    name: String,
    submeshes: Vec<SubMesh>,
}

impl Mesh {
    pub fn new(name: impl Into<String>, submeshes: Vec<SubMesh>) -> Self {
        Self { name: name.into(), submeshes }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn submesh_count(&self) -> usize {
        self.submeshes.len()
    }

    pub fn submesh(&self, index: usize) -> Option<&SubMesh> {
        self.submeshes.get(index)
    }

    pub fn submeshes(&self) -> &[SubMesh] {
        &self.submeshes
    }

    /// Total triangle count over all submeshes
    pub fn triangle_count(&self) -> u32 {
        self.submeshes.iter().map(|s| s.index_count / 3).sum()
    }
}
