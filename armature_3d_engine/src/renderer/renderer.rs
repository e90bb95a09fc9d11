/// Renderer trait - rendering backend contract used by scene nodes

use std::sync::Arc;
use glam::{Mat4, Vec3, Vec4};

use crate::error::Result;
use crate::renderer::{
    Buffer, Texture, Shader, Pipeline, DrawCall, Lighting,
    BufferDesc, TextureDesc, ShaderDesc, PipelineDesc,
};

// ============================================================================
// Configuration
// ============================================================================

/// Camera placement and projection parameters
///
/// View and projection follow the left-handed convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    /// Eye position in world space
    pub eye: Vec3,
    /// Point the camera looks at
    pub focal_point: Vec3,
    /// Up direction
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov_y: f32,
    /// Near clip plane
    pub near: f32,
    /// Far clip plane
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 20.0, -90.0),
            focal_point: Vec3::new(0.0, 20.0, 0.0),
            up: Vec3::Y,
            fov_y: std::f32::consts::FRAC_PI_4,
            near: 1.0,
            far: 10000.0,
        }
    }
}

impl CameraConfig {
    /// World-to-view transform
    pub fn view_transform(&self) -> Mat4 {
        Mat4::look_at_lh(self.eye, self.focal_point, self.up)
    }

    /// View-to-clip transform for the given aspect ratio
    pub fn projection_transform(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_lh(self.fov_y, aspect_ratio, self.near, self.far)
    }
}

/// Renderer configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Application name
    pub app_name: String,
    /// Viewport width in pixels
    pub width: u32,
    /// Viewport height in pixels
    pub height: u32,
    /// Enable validation/debug layers
    pub enable_validation: bool,
    /// Colour the back buffer is cleared to at begin_frame
    pub background_colour: Vec4,
    /// Camera
    pub camera: CameraConfig,
    /// Directional light and specular settings
    pub lighting: Lighting,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "Armature3D Application".to_string(),
            width: 800,
            height: 600,
            enable_validation: cfg!(debug_assertions),
            background_colour: Vec4::new(0.0, 0.0, 0.0, 1.0),
            camera: CameraConfig::default(),
            lighting: Lighting::default(),
        }
    }
}

impl Config {
    /// Viewport aspect ratio (1.0 for a degenerate viewport)
    pub fn aspect_ratio(&self) -> f32 {
        if self.width == 0 || self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// Renderer statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RendererStats {
    /// Frames completed since creation
    pub frames: u64,
    /// Number of draw calls this frame
    pub draw_calls: u32,
    /// Number of triangles drawn this frame
    pub triangles: u32,
    /// Memory allocated for buffers and textures (bytes)
    pub gpu_memory_used: u64,
}

// ============================================================================
// Renderer trait
// ============================================================================

/// Main renderer trait
///
/// Factory for GPU resources plus the frame calls the scene graph drives.
/// Implemented by backend-specific renderers (e.g., HeadlessRenderer).
pub trait Renderer: Send + Sync {
    /// Create a buffer
    fn create_buffer(&mut self, desc: BufferDesc) -> Result<Arc<dyn Buffer>>;

    /// Compile and create a shader
    fn create_shader(&mut self, desc: ShaderDesc) -> Result<Arc<dyn Shader>>;

    /// Create a graphics pipeline
    fn create_pipeline(&mut self, desc: PipelineDesc) -> Result<Arc<dyn Pipeline>>;

    /// Create (or load) a texture
    fn create_texture(&mut self, desc: TextureDesc) -> Result<Arc<dyn Texture>>;

    /// Begin a new frame and clear the back buffer
    fn begin_frame(&mut self) -> Result<()>;

    /// Submit one indexed draw (only valid inside a frame)
    fn draw(&mut self, call: &DrawCall) -> Result<()>;

    /// End the current frame and present it
    fn end_frame(&mut self) -> Result<()>;

    /// Colour used to clear the back buffer
    fn set_background_colour(&mut self, colour: Vec4);

    /// Notify renderer that the viewport has been resized
    fn resize(&mut self, width: u32, height: u32);

    /// Get statistics about the renderer
    fn stats(&self) -> RendererStats;

    /// Current world-to-view transform
    fn view_transform(&self) -> Mat4;

    /// Current view-to-clip transform
    fn projection_transform(&self) -> Mat4;

    /// Eye position in world space
    fn eye_position(&self) -> Vec3;

    /// Directional light and specular settings
    fn lighting(&self) -> Lighting;
}
