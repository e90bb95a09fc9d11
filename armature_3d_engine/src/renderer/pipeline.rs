/// Pipeline trait and pipeline descriptor

use std::sync::Arc;
use crate::renderer::{Shader, ShaderStages};

/// Primitive topology
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveTopology {
    /// Triangle list
    TriangleList,
    /// Triangle strip
    TriangleStrip,
    /// Line list
    LineList,
}

impl PrimitiveTopology {
    /// Number of triangles produced by `index_count` indices
    pub fn triangle_count(&self, index_count: u32) -> u32 {
        match self {
            PrimitiveTopology::TriangleList => index_count / 3,
            PrimitiveTopology::TriangleStrip => index_count.saturating_sub(2),
            PrimitiveTopology::LineList => 0,
        }
    }
}

/// Index buffer element type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    /// 16-bit indices (max 65535 vertices)
    U16,
    /// 32-bit indices
    U32,
}

impl IndexType {
    /// Size in bytes of one index element
    pub fn size_bytes(&self) -> u32 {
        match self {
            IndexType::U16 => 2,
            IndexType::U32 => 4,
        }
    }
}

/// Vertex attribute format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexFormat {
    Float2,
    Float3,
    Float4,
}

impl VertexFormat {
    pub fn size_bytes(&self) -> u32 {
        match self {
            VertexFormat::Float2 => 8,
            VertexFormat::Float3 => 12,
            VertexFormat::Float4 => 16,
        }
    }
}

/// Vertex attribute description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Semantic name matched against the vertex shader input
    pub semantic: &'static str,
    /// Data type and component count
    pub format: VertexFormat,
    /// Offset in bytes from the start of the vertex
    pub offset: u32,
}

/// Vertex input layout (single interleaved binding)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexLayout {
    /// Stride in bytes between consecutive vertices
    pub stride: u32,
    /// Vertex attributes
    pub attributes: Vec<VertexAttribute>,
}

impl VertexLayout {
    /// Build a tightly packed layout from `(semantic, format)` pairs
    pub fn packed(attributes: &[(&'static str, VertexFormat)]) -> Self {
        let mut offset = 0;
        let attributes = attributes
            .iter()
            .map(|&(semantic, format)| {
                let attribute = VertexAttribute { semantic, format, offset };
                offset += format.size_bytes();
                attribute
            })
            .collect();
        Self { stride: offset, attributes }
    }
}

// ===== RASTERIZATION ENUMS =====

/// Face culling mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullMode {
    None,
    Front,
    Back,
}

/// Front face winding order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontFace {
    CounterClockwise,
    Clockwise,
}

/// Descriptor for creating a graphics pipeline
#[derive(Clone)]
pub struct PipelineDesc {
    /// Debug name
    pub name: String,
    /// Vertex shader
    pub vertex_shader: Arc<dyn Shader>,
    /// Pixel shader
    pub pixel_shader: Arc<dyn Shader>,
    /// Vertex input layout
    pub vertex_layout: VertexLayout,
    /// Primitive topology
    pub topology: PrimitiveTopology,
    /// Face culling
    pub cull_mode: CullMode,
    /// Winding of front faces
    pub front_face: FrontFace,
    /// Stages the per-object constant buffer is bound to
    pub constant_buffer_stages: ShaderStages,
}

/// Graphics pipeline resource trait
pub trait Pipeline: Send + Sync {
    /// Debug name given at creation
    fn name(&self) -> &str;

    /// Stride of the vertex layout in bytes
    fn vertex_stride(&self) -> u32;

    /// Topology used by draws with this pipeline
    fn topology(&self) -> PrimitiveTopology;
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
