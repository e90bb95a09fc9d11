//! Where meshes come from before they are uploaded.
//!
//! A `MeshSource` turns a mesh name into CPU-side submesh data. Asset file
//! parsing lives outside the engine; `InMemoryMeshSource` serves meshes
//! registered by the application.

use glam::Vec4;
use rustc_hash::FxHashMap;
use crate::error::{Error, Result};
use crate::resource::geometry::MeshData;

/// Material description before upload
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialData {
    pub diffuse_colour: Vec4,
    pub specular_colour: Vec4,
    pub shininess: f32,
    /// Texture file loaded through the renderer
    pub texture: Option<String>,
}

impl Default for MaterialData {
    fn default() -> Self {
        Self {
            diffuse_colour: Vec4::ONE,
            specular_colour: Vec4::ONE,
            shininess: 0.0,
            texture: None,
        }
    }
}

/// One submesh before upload
#[derive(Debug, Clone, PartialEq)]
pub struct SubMeshData {
    pub geometry: MeshData,
    pub has_tex_coords: bool,
    /// When false, normals are computed at upload
    pub has_normals: bool,
    pub material: MaterialData,
}

impl SubMeshData {
    /// Untextured submesh whose normals will be computed at upload
    pub fn from_geometry(geometry: MeshData) -> Self {
        Self {
            geometry,
            has_tex_coords: false,
            has_normals: false,
            material: MaterialData::default(),
        }
    }
}

/// Provider of mesh data by name
pub trait MeshSource: Send {
    /// Whether this source knows `name`
    fn contains(&self, name: &str) -> bool;

    /// Produce the submeshes of `name`
    fn load(&self, name: &str) -> Result<Vec<SubMeshData>>;
}

/// Mesh source backed by a name-to-data map
#[derive(Debug, Default)]
pub struct InMemoryMeshSource {
    meshes: FxHashMap<String, Vec<SubMeshData>>,
}

impl InMemoryMeshSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a mesh
    pub fn insert(&mut self, name: impl Into<String>, submeshes: Vec<SubMeshData>) {
        self.meshes.insert(name.into(), submeshes);
    }

    /// Builder-style `insert`
    pub fn with_mesh(mut self, name: impl Into<String>, submeshes: Vec<SubMeshData>) -> Self {
        self.insert(name, submeshes);
        self
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

impl MeshSource for InMemoryMeshSource {
    fn contains(&self, name: &str) -> bool {
        self.meshes.contains_key(name)
    }

    fn load(&self, name: &str) -> Result<Vec<SubMeshData>> {
        self.meshes
            .get(name)
            .cloned()
            .ok_or_else(|| Error::InvalidResource(format!("Mesh '{}' not registered", name)))
    }
}

#[cfg(test)]
#[path = "mesh_source_tests.rs"]
mod tests;
