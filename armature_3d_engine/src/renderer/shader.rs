/// Shader trait, shader descriptor and stage flags

use bitflags::bitflags;

/// Single shader stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    /// Vertex shader
    Vertex,
    /// Pixel shader
    Pixel,
}

bitflags! {
    /// Set of stages a resource is bound to
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ShaderStages: u32 {
        const VERTEX = 1 << 0;
        const PIXEL = 1 << 1;
        const ALL = Self::VERTEX.bits() | Self::PIXEL.bits();
    }
}

impl From<ShaderStage> for ShaderStages {
    fn from(stage: ShaderStage) -> Self {
        match stage {
            ShaderStage::Vertex => ShaderStages::VERTEX,
            ShaderStage::Pixel => ShaderStages::PIXEL,
        }
    }
}

/// Descriptor for creating a shader
///
/// Compilation is the backend's business; the engine only names the source
/// file and the entry point.
#[derive(Debug, Clone)]
pub struct ShaderDesc {
    /// Shader source file (e.g., "shader.hlsl")
    pub source_file: String,
    /// Entry point function name
    pub entry_point: String,
    /// Shader stage
    pub stage: ShaderStage,
}

impl ShaderDesc {
    pub fn new(source_file: &str, entry_point: &str, stage: ShaderStage) -> Self {
        Self {
            source_file: source_file.to_string(),
            entry_point: entry_point.to_string(),
            stage,
        }
    }

    /// `file:entry` label used in logs and failure injection
    pub fn label(&self) -> String {
        format!("{}:{}", self.source_file, self.entry_point)
    }
}

/// Shader resource trait
pub trait Shader: Send + Sync {
    /// Stage this shader was compiled for
    fn stage(&self) -> ShaderStage;

    /// Entry point function name
    fn entry_point(&self) -> &str;
}
