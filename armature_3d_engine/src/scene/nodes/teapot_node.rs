//! Lit teapot.

use glam::{Mat4, Vec4};
use crate::error::{Error, Result};
use crate::resource::geometry;
use crate::scene::nodes::shaded_mesh::{ShadedMesh, ShadedMeshDesc};
use crate::scene::renderable::{Renderable, RenderContext};

const SHADER_FILE: &str = "shader.hlsl";

pub struct TeapotNode {
    ambient: Vec4,
    gpu: Option<ShadedMesh>,
}

impl TeapotNode {
    pub fn new(ambient: Vec4) -> Self {
        Self { ambient, gpu: None }
    }

    pub fn is_uploaded(&self) -> bool {
        self.gpu.is_some()
    }
}

impl Renderable for TeapotNode {
    fn initialise(&mut self, name: &str, ctx: &mut RenderContext) -> Result<()> {
        let desc = ShadedMeshDesc::new(SHADER_FILE, geometry::teapot());
        self.gpu = Some(ShadedMesh::create(name, desc, ctx.renderer)?);
        Ok(())
    }

    fn render(&mut self, name: &str, world: &Mat4, ctx: &mut RenderContext) -> Result<()> {
        match &self.gpu {
            Some(gpu) => gpu.draw(name, world, self.ambient, ctx.renderer),
            None => Err(Error::InvalidNode(format!("Teapot '{}' rendered before initialise", name))),
        }
    }

    fn shutdown(&mut self, name: &str, _ctx: &mut RenderContext) {
        if self.gpu.take().is_some() {
            crate::engine_trace!("armature3d::TeapotNode", "'{}' released", name);
        }
    }
}

#[cfg(test)]
#[path = "teapot_node_tests.rs"]
mod tests;
