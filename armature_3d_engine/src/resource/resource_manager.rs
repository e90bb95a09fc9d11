/// Central resource manager for the engine.
///
/// Loads meshes by name from the registered `MeshSource`s, uploads them
/// through the renderer, and shares the result between nodes. Each
/// `get_mesh` takes a reference and each `release_mesh` gives one back; the
/// mesh and its buffers are dropped with the last reference.

use std::sync::Arc;
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};

use crate::error::{Error, Result};
use crate::renderer::{BufferDesc, BufferUsage, Renderer, TextureDesc};
use crate::resource::mesh::{Material, Mesh, SubMesh};
use crate::resource::mesh_source::{MeshSource, SubMeshData};

new_key_type! {
    /// Stable key for a loaded mesh
    pub struct MeshKey;
}

struct MeshEntry {
    mesh: Arc<Mesh>,
    ref_count: u32,
}

pub struct ResourceManager {
    meshes: SlotMap<MeshKey, MeshEntry>,
    mesh_names: FxHashMap<String, MeshKey>,
    sources: Vec<Box<dyn MeshSource>>,
}

impl ResourceManager {
    /// Create an empty resource manager with no mesh sources
    pub fn new() -> Self {
        Self {
            meshes: SlotMap::with_key(),
            mesh_names: FxHashMap::default(),
            sources: Vec::new(),
        }
    }

    /// Register a mesh source; sources are searched in registration order
    pub fn add_mesh_source<S: MeshSource + 'static>(&mut self, source: S) {
        self.sources.push(Box::new(source));
    }

    pub fn mesh_source_count(&self) -> usize {
        self.sources.len()
    }

    /// Get (loading and uploading on first use) the mesh called `name`
    ///
    /// # Errors
    ///
    /// `InvalidResource` if no source knows the mesh or it has no submeshes;
    /// any renderer error raised while uploading.
    pub fn get_mesh(&mut self, name: &str, renderer: &mut dyn Renderer) -> Result<Arc<Mesh>> {
        if let Some(entry) = self.mesh_names.get(name).and_then(|&key| self.meshes.get_mut(key)) {
            entry.ref_count += 1;
            crate::engine_trace!("armature3d::ResourceManager",
                "Mesh '{}' reused ({} references)", name, entry.ref_count);
            return Ok(entry.mesh.clone());
        }

        let source = self.sources
            .iter()
            .find(|source| source.contains(name))
            .ok_or_else(|| Error::InvalidResource(format!("Mesh '{}' not found in any source", name)))?;
        let submeshes = source.load(name)?;
        if submeshes.is_empty() {
            return Err(Error::InvalidResource(format!("Mesh '{}' has no submeshes", name)));
        }

        let uploaded = submeshes
            .into_iter()
            .enumerate()
            .map(|(index, data)| upload_submesh(name, index, data, renderer))
            .collect::<Result<Vec<_>>>()?;

        let mesh = Arc::new(Mesh::new(name, uploaded));
        let key = self.meshes.insert(MeshEntry { mesh: mesh.clone(), ref_count: 1 });
        self.mesh_names.insert(name.to_string(), key);

        crate::engine_debug!("armature3d::ResourceManager",
            "Mesh '{}' loaded ({} submeshes, {} triangles)",
            name, mesh.submesh_count(), mesh.triangle_count());
        Ok(mesh)
    }

    /// Give back one reference to `name`
    ///
    /// Returns false if the mesh is not loaded.
    pub fn release_mesh(&mut self, name: &str) -> bool {
        let Some(&key) = self.mesh_names.get(name) else {
            return false;
        };
        let Some(entry) = self.meshes.get_mut(key) else {
            return false;
        };

        entry.ref_count = entry.ref_count.saturating_sub(1);
        if entry.ref_count == 0 {
            self.meshes.remove(key);
            self.mesh_names.remove(name);
            crate::engine_debug!("armature3d::ResourceManager", "Mesh '{}' unloaded", name);
        }
        true
    }

    /// Current reference count of a loaded mesh
    pub fn mesh_ref_count(&self, name: &str) -> Option<u32> {
        self.mesh_names
            .get(name)
            .and_then(|&key| self.meshes.get(key))
            .map(|entry| entry.ref_count)
    }

    pub fn is_mesh_loaded(&self, name: &str) -> bool {
        self.mesh_names.contains_key(name)
    }

    /// Number of loaded meshes
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }
}

impl Default for ResourceManager {
    fn default() -> Self {
        Self::new()
    }
}

fn upload_submesh(
    mesh_name: &str,
    index: usize,
    mut data: SubMeshData,
    renderer: &mut dyn Renderer,
) -> Result<SubMesh> {
    if !data.has_normals {
        data.geometry.compute_normals()?;
    }

    let vertex_buffer = renderer.create_buffer(BufferDesc::with_data(
        format!("{}#{}/vertices", mesh_name, index),
        BufferUsage::Vertex,
        bytemuck::cast_slice(&data.geometry.vertices),
    ))?;
    let index_buffer = renderer.create_buffer(BufferDesc::with_data(
        format!("{}#{}/indices", mesh_name, index),
        BufferUsage::Index,
        bytemuck::cast_slice(&data.geometry.indices),
    ))?;
    let texture = data.material.texture
        .as_deref()
        .map(|file| renderer.create_texture(TextureDesc::from_file(file)))
        .transpose()?;

    let material = Material {
        diffuse_colour: data.material.diffuse_colour,
        specular_colour: data.material.specular_colour,
        shininess: data.material.shininess,
        texture,
    };
    Ok(SubMesh::new(
        vertex_buffer,
        index_buffer,
        data.geometry.indices.len() as u32,
        data.has_tex_coords,
        material,
    ))
}

#[cfg(test)]
#[path = "resource_manager_tests.rs"]
mod tests;
