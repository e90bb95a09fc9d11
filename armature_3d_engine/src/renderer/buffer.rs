/// Buffer trait and buffer descriptor

use crate::error::Result;

/// Buffer usage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    /// Vertex buffer
    Vertex,
    /// Index buffer
    Index,
    /// Constant buffer shared by the vertex and pixel stages
    Constant,
}

/// Descriptor for creating a buffer
#[derive(Debug, Clone)]
pub struct BufferDesc {
    /// Debug name, also used by the headless backend to inject failures
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Buffer usage
    pub usage: BufferUsage,
    /// Optional initial contents (must not exceed `size`)
    pub data: Option<Vec<u8>>,
}

impl BufferDesc {
    /// Describe a buffer sized to and filled with `data`
    pub fn with_data(name: impl Into<String>, usage: BufferUsage, data: &[u8]) -> Self {
        Self {
            name: name.into(),
            size: data.len() as u64,
            usage,
            data: Some(data.to_vec()),
        }
    }

    /// Describe an uninitialised buffer of `size` bytes
    pub fn empty(name: impl Into<String>, usage: BufferUsage, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            usage,
            data: None,
        }
    }
}

/// Buffer resource trait
///
/// The buffer is destroyed when its last reference is dropped.
pub trait Buffer: Send + Sync {
    /// Debug name given at creation
    fn name(&self) -> &str;

    /// Size in bytes
    fn size(&self) -> u64;

    /// Usage given at creation
    fn usage(&self) -> BufferUsage;

    /// Update buffer data
    ///
    /// # Arguments
    ///
    /// * `offset` - Offset into the buffer in bytes
    /// * `data` - Data to write
    fn update(&self, offset: u64, data: &[u8]) -> Result<()>;
}
