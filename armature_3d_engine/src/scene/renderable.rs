/// Leaf capability trait and the context handed to it.

use glam::Mat4;
use crate::error::Result;
use crate::renderer::Renderer;
use crate::resource::ResourceManager;

/// Backend access for one lifecycle call
///
/// Built by the caller (usually the framework) from the locked renderer and
/// resource manager; nodes never keep it.
pub struct RenderContext<'a> {
    pub renderer: &'a mut dyn Renderer,
    pub resources: &'a mut ResourceManager,
}

impl<'a> RenderContext<'a> {
    pub fn new(renderer: &'a mut dyn Renderer, resources: &'a mut ResourceManager) -> Self {
        Self { renderer, resources }
    }
}

/// Something a leaf node can draw
///
/// The scene graph owns the node's name and transforms and passes them in;
/// implementations own only their GPU resources.
pub trait Renderable {
    /// Acquire GPU resources. Called at most once before a matching shutdown.
    fn initialise(&mut self, name: &str, ctx: &mut RenderContext) -> Result<()>;

    /// Issue draw work for the given cumulative world transform
    fn render(&mut self, name: &str, world: &Mat4, ctx: &mut RenderContext) -> Result<()>;

    /// Release resources. Must be safe when initialise never ran or failed.
    fn shutdown(&mut self, name: &str, ctx: &mut RenderContext);
}
