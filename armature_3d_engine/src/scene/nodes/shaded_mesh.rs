//! GPU state shared by the lit leaf kinds.
//!
//! A `ShadedMesh` is one pipeline, one vertex/index buffer pair, one
//! per-object constant buffer and an optional texture. The camera and
//! lighting are captured once at initialise into a `FrameSnapshot`; a node
//! that needs to follow a moving camera must be re-initialised.

use std::sync::Arc;
use glam::{Mat4, Vec3, Vec4};
use crate::error::Result;
use crate::renderer::{
    Buffer, BufferDesc, BufferUsage, CullMode, DrawCall, FrontFace, IndexType, Lighting,
    ObjectConstants, Pipeline, PipelineDesc, PrimitiveTopology, Renderer, ShaderDesc,
    ShaderStage, ShaderStages, Texture, TextureDesc,
};
use crate::resource::{MeshData, Vertex};

// ===== FRAME SNAPSHOT =====

/// Camera and lighting values read from the renderer at initialise
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSnapshot {
    /// `projection * view`
    pub view_projection: Mat4,
    pub eye_position: Vec3,
    pub lighting: Lighting,
}

impl FrameSnapshot {
    pub fn capture(renderer: &dyn Renderer) -> Self {
        Self {
            view_projection: renderer.projection_transform() * renderer.view_transform(),
            eye_position: renderer.eye_position(),
            lighting: renderer.lighting(),
        }
    }

    /// Constant block for one object placed at `world`
    pub fn constants(&self, world: &Mat4, ambient: Vec4) -> ObjectConstants {
        ObjectConstants::new(*world, self.view_projection, ambient, self.eye_position, &self.lighting)
    }
}

// ===== RESOURCE HELPERS =====

/// Compile `vertex_entry`/`pixel_entry` from `shader_file` and build a
/// triangle-list pipeline for `Vertex` (back-face culling, clockwise front
/// faces, constants bound to both stages)
pub fn create_pipeline(
    renderer: &mut dyn Renderer,
    name: &str,
    shader_file: &str,
    vertex_entry: &str,
    pixel_entry: &str,
) -> Result<Arc<dyn Pipeline>> {
    let vertex_shader = renderer.create_shader(ShaderDesc::new(shader_file, vertex_entry, ShaderStage::Vertex))?;
    let pixel_shader = renderer.create_shader(ShaderDesc::new(shader_file, pixel_entry, ShaderStage::Pixel))?;
    renderer.create_pipeline(PipelineDesc {
        name: name.to_string(),
        vertex_shader,
        pixel_shader,
        vertex_layout: Vertex::layout(),
        topology: PrimitiveTopology::TriangleList,
        cull_mode: CullMode::Back,
        front_face: FrontFace::Clockwise,
        constant_buffer_stages: ShaderStages::ALL,
    })
}

/// Zeroed per-object constant buffer named `{owner}/constants`
pub fn create_constant_buffer(renderer: &mut dyn Renderer, owner: &str) -> Result<Arc<dyn Buffer>> {
    renderer.create_buffer(BufferDesc::empty(
        format!("{}/constants", owner),
        BufferUsage::Constant,
        ObjectConstants::SIZE,
    ))
}

// ===== SHADED MESH =====

/// What to upload for a `ShadedMesh`
#[derive(Debug, Clone)]
pub struct ShadedMeshDesc<'a> {
    pub shader_file: &'a str,
    pub vertex_entry: &'a str,
    pub pixel_entry: &'a str,
    /// Vertices must already carry their normals
    pub geometry: MeshData,
    /// Texture file bound to pixel-stage slot 0
    pub texture: Option<&'a str>,
}

impl<'a> ShadedMeshDesc<'a> {
    /// Untextured mesh using the `VS`/`PS` entry points of `shader_file`
    pub fn new(shader_file: &'a str, geometry: MeshData) -> Self {
        Self { shader_file, vertex_entry: "VS", pixel_entry: "PS", geometry, texture: None }
    }

    pub fn with_texture(mut self, texture: &'a str) -> Self {
        self.texture = Some(texture);
        self
    }
}

/// Uploaded resources of a single-mesh leaf
pub struct ShadedMesh {
    pipeline: Arc<dyn Pipeline>,
    vertex_buffer: Arc<dyn Buffer>,
    index_buffer: Arc<dyn Buffer>,
    index_count: u32,
    constant_buffer: Arc<dyn Buffer>,
    texture: Option<Arc<dyn Texture>>,
    snapshot: FrameSnapshot,
}

impl ShadedMesh {
    /// Create every resource for the node called `owner`
    ///
    /// Resource names are prefixed with `owner` so that failures and command
    /// traces point at the node.
    pub fn create(owner: &str, desc: ShadedMeshDesc, renderer: &mut dyn Renderer) -> Result<Self> {
        let pipeline = create_pipeline(
            renderer,
            &format!("{}/pipeline", owner),
            desc.shader_file,
            desc.vertex_entry,
            desc.pixel_entry,
        )?;
        let vertex_buffer = renderer.create_buffer(BufferDesc::with_data(
            format!("{}/vertices", owner),
            BufferUsage::Vertex,
            bytemuck::cast_slice(&desc.geometry.vertices),
        ))?;
        let index_buffer = renderer.create_buffer(BufferDesc::with_data(
            format!("{}/indices", owner),
            BufferUsage::Index,
            bytemuck::cast_slice(&desc.geometry.indices),
        ))?;
        let constant_buffer = create_constant_buffer(renderer, owner)?;
        let texture = desc
            .texture
            .map(|file| renderer.create_texture(TextureDesc::from_file(file)))
            .transpose()?;

        crate::engine_trace!("armature3d::ShadedMesh",
            "'{}' uploaded {} vertices, {} triangles",
            owner, desc.geometry.vertices.len(), desc.geometry.triangle_count());

        Ok(Self {
            pipeline,
            vertex_buffer,
            index_buffer,
            index_count: desc.geometry.indices.len() as u32,
            constant_buffer,
            texture,
            snapshot: FrameSnapshot::capture(renderer),
        })
    }

    /// Upload the constants for `world` and issue one indexed draw
    pub fn draw(&self, label: &str, world: &Mat4, ambient: Vec4, renderer: &mut dyn Renderer) -> Result<()> {
        let constants = self.snapshot.constants(world, ambient);
        self.constant_buffer.update(0, bytemuck::bytes_of(&constants))?;
        renderer.draw(&DrawCall {
            label,
            pipeline: &self.pipeline,
            vertex_buffer: &self.vertex_buffer,
            index_buffer: &self.index_buffer,
            index_type: IndexType::U32,
            index_count: self.index_count,
            constant_buffer: &self.constant_buffer,
            texture: self.texture.as_ref(),
        })
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn snapshot(&self) -> &FrameSnapshot {
        &self.snapshot
    }

    pub fn constant_buffer(&self) -> &Arc<dyn Buffer> {
        &self.constant_buffer
    }

    pub fn texture(&self) -> Option<&Arc<dyn Texture>> {
        self.texture.as_ref()
    }
}

#[cfg(test)]
#[path = "shaded_mesh_tests.rs"]
mod tests;
