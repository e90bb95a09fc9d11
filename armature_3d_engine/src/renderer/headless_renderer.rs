/// Headless renderer - in-memory backend with no GPU or window
///
/// Every resource is a plain in-memory object and every call is recorded as a
/// command string, so scene code can be driven and inspected without a device.
/// Named resources can be made to fail to exercise error paths. Long runs cap
/// the trace with `with_command_limit`.

use std::sync::{Arc, Mutex};
use glam::{Mat4, Vec3, Vec4};
use rustc_hash::FxHashSet;

use crate::error::{Error, Result};
use crate::engine_bail;
use crate::renderer::{
    Renderer, Buffer, Texture, Shader, Pipeline, DrawCall, Config, Lighting, RendererStats,
    BufferDesc, BufferUsage, TextureDesc, TextureFormat, ShaderDesc, ShaderStage, PipelineDesc,
    PrimitiveTopology,
};

// ============================================================================
// Headless Buffer
// ============================================================================

#[derive(Debug)]
pub struct HeadlessBuffer {
    name: String,
    size: u64,
    usage: BufferUsage,
    data: Mutex<Vec<u8>>,
}

impl HeadlessBuffer {
    /// Snapshot of the buffer contents
    pub fn contents(&self) -> Vec<u8> {
        match self.data.lock() {
            Ok(data) => data.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Buffer for HeadlessBuffer {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn usage(&self) -> BufferUsage {
        self.usage
    }

    fn update(&self, offset: u64, data: &[u8]) -> Result<()> {
        let mut contents = self.data.lock()
            .map_err(|_| Error::BackendError(format!("Buffer '{}' lock poisoned", self.name)))?;
        let end = offset.checked_add(data.len() as u64)
            .filter(|&end| end <= contents.len() as u64)
            .ok_or_else(|| Error::InvalidResource(format!(
                "Update of {} bytes at offset {} overflows buffer '{}' ({} bytes)",
                data.len(), offset, self.name, contents.len()
            )))?;
        contents[offset as usize..end as usize].copy_from_slice(data);
        Ok(())
    }
}

// ============================================================================
// Headless Shader / Pipeline / Texture
// ============================================================================

#[derive(Debug)]
pub struct HeadlessShader {
    pub source_file: String,
    pub entry_point: String,
    pub stage: ShaderStage,
}

impl Shader for HeadlessShader {
    fn stage(&self) -> ShaderStage {
        self.stage
    }

    fn entry_point(&self) -> &str {
        &self.entry_point
    }
}

#[derive(Debug)]
pub struct HeadlessPipeline {
    pub name: String,
    pub stride: u32,
    pub topology: PrimitiveTopology,
}

impl Pipeline for HeadlessPipeline {
    fn name(&self) -> &str {
        &self.name
    }

    fn vertex_stride(&self) -> u32 {
        self.stride
    }

    fn topology(&self) -> PrimitiveTopology {
        self.topology
    }
}

#[derive(Debug)]
pub struct HeadlessTexture {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

impl Texture for HeadlessTexture {
    fn name(&self) -> &str {
        &self.name
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn format(&self) -> TextureFormat {
        self.format
    }
}

// ============================================================================
// Headless Renderer
// ============================================================================

/// Renderer backend that records commands instead of talking to a GPU
#[derive(Debug)]
pub struct HeadlessRenderer {
    config: Config,
    commands: Vec<String>,
    command_limit: Option<usize>,
    failing: FxHashSet<String>,
    stats: RendererStats,
    frame_open: bool,
}

impl HeadlessRenderer {
    /// Create a headless renderer with the given configuration
    pub fn new(config: Config) -> Self {
        crate::engine_debug!("armature3d::headless",
            "Headless renderer created for '{}' ({}x{})",
            config.app_name, config.width, config.height);
        Self {
            config,
            commands: Vec::new(),
            command_limit: None,
            failing: FxHashSet::default(),
            stats: RendererStats::default(),
            frame_open: false,
        }
    }

    /// Keep at most `limit` recorded commands; 0 turns recording off
    ///
    /// When the trace is full the oldest half is dropped in one go, so the
    /// most recent commands are always available.
    pub fn with_command_limit(mut self, limit: usize) -> Self {
        self.command_limit = Some(limit);
        let excess = self.commands.len().saturating_sub(limit);
        self.commands.drain(..excess);
        self
    }

    /// Recorded commands, oldest first
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Forget recorded commands
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Make every later creation or draw with this name fail
    ///
    /// Matches buffer, pipeline and texture names, shader source files or
    /// `file:entry` labels, and draw labels.
    pub fn fail_resource(&mut self, name: impl Into<String>) {
        self.failing.insert(name.into());
    }

    /// Stop failing `name`
    pub fn clear_failure(&mut self, name: &str) -> bool {
        self.failing.remove(name)
    }

    /// Configuration (reflects resizes and background colour changes)
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether begin_frame has been called without a matching end_frame
    pub fn is_frame_open(&self) -> bool {
        self.frame_open
    }

    fn record(&mut self, command: String) {
        match self.command_limit {
            Some(0) => return,
            Some(limit) if self.commands.len() >= limit => {
                let stale = self.commands.len() - limit / 2;
                self.commands.drain(..stale);
            }
            _ => {}
        }
        self.commands.push(command);
    }

    fn is_failing(&self, names: &[&str]) -> bool {
        names.iter().any(|name| self.failing.contains(*name))
    }
}

impl Renderer for HeadlessRenderer {
    fn create_buffer(&mut self, desc: BufferDesc) -> Result<Arc<dyn Buffer>> {
        if self.is_failing(&[&desc.name]) {
            engine_bail!("armature3d::headless", "Buffer '{}' creation failed (injected)", desc.name);
        }
        let mut data = vec![0u8; desc.size as usize];
        if let Some(initial) = &desc.data {
            if initial.len() as u64 > desc.size {
                return Err(Error::InvalidResource(format!(
                    "Buffer '{}': {} bytes of data exceed size {}",
                    desc.name, initial.len(), desc.size
                )));
            }
            data[..initial.len()].copy_from_slice(initial);
        }
        self.stats.gpu_memory_used += desc.size;
        self.record(format!("create_buffer {} {:?} {}", desc.name, desc.usage, desc.size));
        Ok(Arc::new(HeadlessBuffer {
            name: desc.name,
            size: desc.size,
            usage: desc.usage,
            data: Mutex::new(data),
        }))
    }

    fn create_shader(&mut self, desc: ShaderDesc) -> Result<Arc<dyn Shader>> {
        let label = desc.label();
        if self.is_failing(&[&desc.source_file, &label]) {
            engine_bail!("armature3d::headless", "Shader '{}' compilation failed (injected)", label);
        }
        self.record(format!("create_shader {} {:?}", label, desc.stage));
        Ok(Arc::new(HeadlessShader {
            source_file: desc.source_file,
            entry_point: desc.entry_point,
            stage: desc.stage,
        }))
    }

    fn create_pipeline(&mut self, desc: PipelineDesc) -> Result<Arc<dyn Pipeline>> {
        if self.is_failing(&[&desc.name]) {
            engine_bail!("armature3d::headless", "Pipeline '{}' creation failed (injected)", desc.name);
        }
        if desc.vertex_shader.stage() != ShaderStage::Vertex
            || desc.pixel_shader.stage() != ShaderStage::Pixel
        {
            return Err(Error::InvalidResource(format!(
                "Pipeline '{}': shader stages do not match their slots", desc.name
            )));
        }
        self.record(format!(
            "create_pipeline {} stride={} cbuffer={:?}",
            desc.name, desc.vertex_layout.stride, desc.constant_buffer_stages
        ));
        Ok(Arc::new(HeadlessPipeline {
            name: desc.name,
            stride: desc.vertex_layout.stride,
            topology: desc.topology,
        }))
    }

    fn create_texture(&mut self, desc: TextureDesc) -> Result<Arc<dyn Texture>> {
        if self.is_failing(&[&desc.name]) {
            engine_bail!("armature3d::headless", "Texture '{}' creation failed (injected)", desc.name);
        }
        if let Some(data) = &desc.data {
            if data.len() as u64 != desc.byte_size() {
                return Err(Error::InvalidResource(format!(
                    "Texture '{}': expected {} bytes, got {}",
                    desc.name, desc.byte_size(), data.len()
                )));
            }
        }
        self.stats.gpu_memory_used += desc.byte_size();
        self.record(format!("create_texture {} {}x{}", desc.name, desc.width, desc.height));
        Ok(Arc::new(HeadlessTexture {
            name: desc.name,
            width: desc.width,
            height: desc.height,
            format: desc.format,
        }))
    }

    fn begin_frame(&mut self) -> Result<()> {
        if self.frame_open {
            engine_bail!("armature3d::headless", "begin_frame called while a frame is open");
        }
        self.frame_open = true;
        self.stats.draw_calls = 0;
        self.stats.triangles = 0;
        self.record("begin_frame".to_string());
        Ok(())
    }

    fn draw(&mut self, call: &DrawCall) -> Result<()> {
        if !self.frame_open {
            engine_bail!("armature3d::headless", "draw '{}' outside of a frame", call.label);
        }
        if self.is_failing(&[call.label]) {
            engine_bail!("armature3d::headless", "draw '{}' rejected (injected)", call.label);
        }
        let index_bytes = call.index_count as u64 * call.index_type.size_bytes() as u64;
        if index_bytes > call.index_buffer.size() {
            return Err(Error::InvalidResource(format!(
                "draw '{}': {} indices overflow index buffer '{}'",
                call.label, call.index_count, call.index_buffer.name()
            )));
        }
        let topology = call.pipeline.topology();
        self.stats.draw_calls += 1;
        self.stats.triangles += topology.triangle_count(call.index_count);
        self.record(format!(
            "draw {} pipeline={} indices={} texture={}",
            call.label,
            call.pipeline.name(),
            call.index_count,
            call.texture.map(|t| t.name()).unwrap_or("none"),
        ));
        Ok(())
    }

    fn end_frame(&mut self) -> Result<()> {
        if !self.frame_open {
            engine_bail!("armature3d::headless", "end_frame called without begin_frame");
        }
        self.frame_open = false;
        self.stats.frames += 1;
        self.record("end_frame".to_string());
        Ok(())
    }

    fn set_background_colour(&mut self, colour: Vec4) {
        self.config.background_colour = colour;
        self.record(format!(
            "set_background_colour {} {} {} {}",
            colour.x, colour.y, colour.z, colour.w
        ));
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width;
        self.config.height = height;
        self.record(format!("resize {}x{}", width, height));
    }

    fn stats(&self) -> RendererStats {
        self.stats
    }

    fn view_transform(&self) -> Mat4 {
        self.config.camera.view_transform()
    }

    fn projection_transform(&self) -> Mat4 {
        self.config.camera.projection_transform(self.config.aspect_ratio())
    }

    fn eye_position(&self) -> Vec3 {
        self.config.camera.eye
    }

    fn lighting(&self) -> Lighting {
        self.config.lighting
    }
}

#[cfg(test)]
#[path = "headless_renderer_tests.rs"]
mod tests;
