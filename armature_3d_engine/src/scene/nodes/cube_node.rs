//! Lit, untextured unit cube.

use glam::{Mat4, Vec4};
use crate::error::{Error, Result};
use crate::resource::geometry;
use crate::scene::nodes::shaded_mesh::{ShadedMesh, ShadedMeshDesc};
use crate::scene::renderable::{Renderable, RenderContext};

const SHADER_FILE: &str = "shader.hlsl";

/// Cube spanning [-1, 1], placed and sized entirely by its world transform
pub struct CubeNode {
    ambient: Vec4,
    gpu: Option<ShadedMesh>,
}

impl CubeNode {
    pub fn new(ambient: Vec4) -> Self {
        Self { ambient, gpu: None }
    }

    pub fn ambient(&self) -> Vec4 {
        self.ambient
    }

    pub fn is_uploaded(&self) -> bool {
        self.gpu.is_some()
    }
}

impl Renderable for CubeNode {
    fn initialise(&mut self, name: &str, ctx: &mut RenderContext) -> Result<()> {
        let desc = ShadedMeshDesc::new(SHADER_FILE, geometry::cube());
        self.gpu = Some(ShadedMesh::create(name, desc, ctx.renderer)?);
        Ok(())
    }

    fn render(&mut self, name: &str, world: &Mat4, ctx: &mut RenderContext) -> Result<()> {
        let gpu = self.gpu.as_ref()
            .ok_or_else(|| Error::InvalidNode(format!("Cube '{}' rendered before initialise", name)))?;
        gpu.draw(name, world, self.ambient, ctx.renderer)
    }

    fn shutdown(&mut self, _name: &str, _ctx: &mut RenderContext) {
        self.gpu = None;
    }
}

#[cfg(test)]
#[path = "cube_node_tests.rs"]
mod tests;
