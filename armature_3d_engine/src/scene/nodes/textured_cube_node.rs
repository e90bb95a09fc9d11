//! Cube with a diffuse texture on every face.

use glam::{Mat4, Vec4};
use crate::error::{Error, Result};
use crate::resource::geometry;
use crate::scene::nodes::shaded_mesh::{ShadedMesh, ShadedMeshDesc};
use crate::scene::renderable::{Renderable, RenderContext};

const SHADER_FILE: &str = "shaderTexture.hlsl";

/// Image used when none is given
pub const DEFAULT_TEXTURE: &str = "woodbox.bmp";

pub struct TexturedCubeNode {
    ambient: Vec4,
    texture_file: String,
    gpu: Option<ShadedMesh>,
}

impl TexturedCubeNode {
    /// Cube textured with `woodbox.bmp`
    pub fn new(ambient: Vec4) -> Self {
        Self::with_texture(ambient, DEFAULT_TEXTURE)
    }

    pub fn with_texture(ambient: Vec4, texture_file: impl Into<String>) -> Self {
        Self { ambient, texture_file: texture_file.into(), gpu: None }
    }

    pub fn texture_file(&self) -> &str {
        &self.texture_file
    }

    pub fn is_uploaded(&self) -> bool {
        self.gpu.is_some()
    }
}

impl Renderable for TexturedCubeNode {
    fn initialise(&mut self, name: &str, ctx: &mut RenderContext) -> Result<()> {
        let desc = ShadedMeshDesc::new(SHADER_FILE, geometry::cube()).with_texture(&self.texture_file);
        self.gpu = Some(ShadedMesh::create(name, desc, ctx.renderer)?);
        Ok(())
    }

    fn render(&mut self, name: &str, world: &Mat4, ctx: &mut RenderContext) -> Result<()> {
        let gpu = self.gpu.as_ref()
            .ok_or_else(|| Error::InvalidNode(format!("Textured cube '{}' rendered before initialise", name)))?;
        gpu.draw(name, world, self.ambient, ctx.renderer)
    }

    fn shutdown(&mut self, _name: &str, _ctx: &mut RenderContext) {
        self.gpu = None;
    }
}

#[cfg(test)]
#[path = "textured_cube_node_tests.rs"]
mod tests;
