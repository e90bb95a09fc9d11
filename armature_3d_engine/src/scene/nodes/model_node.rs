//! Leaf drawing a shared mesh from the resource manager.
//!
//! The mesh is fetched by name at initialise and released at shutdown. Every
//! submesh is drawn with the same per-object constants; submeshes with
//! texture coordinates and a material texture use the textured pixel shader.

use std::sync::Arc;
use glam::{Mat4, Vec4};
use crate::error::{Error, Result};
use crate::renderer::{Buffer, DrawCall, IndexType, Pipeline};
use crate::resource::Mesh;
use crate::scene::nodes::shaded_mesh::{self, FrameSnapshot};
use crate::scene::renderable::{Renderable, RenderContext};

const SHADER_FILE: &str = "ModelShader.hlsl";

/// Mesh drawn when none is given
pub const DEFAULT_MESH: &str = "airplane.x";

struct ModelResources {
    mesh: Arc<Mesh>,
    pipeline: Arc<dyn Pipeline>,
    textured_pipeline: Arc<dyn Pipeline>,
    constant_buffer: Arc<dyn Buffer>,
    snapshot: FrameSnapshot,
}

pub struct ModelNode {
    ambient: Vec4,
    mesh_name: String,
    resources: Option<ModelResources>,
}

impl ModelNode {
    /// Node drawing `airplane.x`
    pub fn new(ambient: Vec4) -> Self {
        Self::with_mesh(ambient, DEFAULT_MESH)
    }

    pub fn with_mesh(ambient: Vec4, mesh_name: impl Into<String>) -> Self {
        Self { ambient, mesh_name: mesh_name.into(), resources: None }
    }

    pub fn mesh_name(&self) -> &str {
        &self.mesh_name
    }

    /// The mesh, while this node holds a reference to it
    pub fn mesh(&self) -> Option<&Arc<Mesh>> {
        self.resources.as_ref().map(|resources| &resources.mesh)
    }
}

impl Renderable for ModelNode {
    fn initialise(&mut self, name: &str, ctx: &mut RenderContext) -> Result<()> {
        let renderer = &mut *ctx.renderer;
        let pipeline = shaded_mesh::create_pipeline(
            renderer, &format!("{}/pipeline", name), SHADER_FILE, "VS", "PS")?;
        let textured_pipeline = shaded_mesh::create_pipeline(
            renderer, &format!("{}/pipeline-textured", name), SHADER_FILE, "VS", "TPS")?;
        let constant_buffer = shaded_mesh::create_constant_buffer(renderer, name)?;
        let snapshot = FrameSnapshot::capture(renderer);

        // Acquired last so a failure above never leaves a reference behind
        let mesh = ctx.resources.get_mesh(&self.mesh_name, renderer)?;
        crate::engine_debug!("armature3d::ModelNode",
            "'{}' drawing '{}' ({} submeshes)", name, mesh.name(), mesh.submesh_count());

        self.resources = Some(ModelResources {
            mesh,
            pipeline,
            textured_pipeline,
            constant_buffer,
            snapshot,
        });
        Ok(())
    }

    fn render(&mut self, name: &str, world: &Mat4, ctx: &mut RenderContext) -> Result<()> {
        let resources = self.resources.as_ref()
            .ok_or_else(|| Error::InvalidNode(format!("Model '{}' rendered before initialise", name)))?;

        let constants = resources.snapshot.constants(world, self.ambient);
        resources.constant_buffer.update(0, bytemuck::bytes_of(&constants))?;

        for submesh in resources.mesh.submeshes() {
            let texture = submesh.material().texture.as_ref().filter(|_| submesh.has_tex_coords());
            let pipeline = match texture {
                Some(_) => &resources.textured_pipeline,
                None => &resources.pipeline,
            };
            ctx.renderer.draw(&DrawCall {
                label: name,
                pipeline,
                vertex_buffer: submesh.vertex_buffer(),
                index_buffer: submesh.index_buffer(),
                index_type: IndexType::U32,
                index_count: submesh.index_count(),
                constant_buffer: &resources.constant_buffer,
                texture,
            })?;
        }
        Ok(())
    }

    fn shutdown(&mut self, name: &str, ctx: &mut RenderContext) {
        if self.resources.take().is_none() {
            return;
        }
        if !ctx.resources.release_mesh(&self.mesh_name) {
            crate::engine_warn!("armature3d::ModelNode",
                "'{}' released mesh '{}' which was not loaded", name, self.mesh_name);
        }
    }
}

#[cfg(test)]
#[path = "model_node_tests.rs"]
mod tests;
