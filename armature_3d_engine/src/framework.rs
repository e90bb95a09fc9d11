//! Frame driver
//!
//! `Framework` owns the scene graph and drives its lifecycle against the
//! shared renderer and resource manager:
//!
//! ```text
//! initialise   app.create_scene_graph -> graph.initialise
//! frame        update: graph.update(root world) -> app.update_scene_graph
//!              render: begin_frame -> graph.render -> end_frame
//! shutdown     graph.shutdown (once)
//! ```
//!
//! Application overrides run after the update pass, so a world transform
//! the application pins is the one rendered that frame.

use std::sync::{Arc, Mutex, MutexGuard};
use glam::{Mat4, Vec4};
use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::renderer::Renderer;
use crate::resource::ResourceManager;
use crate::scene::{RenderContext, SceneGraph, SceneGraphConfig};

/// Name of the graph node every application builds under
pub const ROOT_NAME: &str = "Root";

// ===== APPLICATION =====

/// What an application supplies to the framework
pub trait Application {
    /// Populate the (empty) scene graph. Called once, before initialise.
    fn create_scene_graph(&mut self, graph: &mut SceneGraph) -> Result<()>;

    /// Per-frame changes, applied after the graph's update pass
    fn update_scene_graph(&mut self, graph: &mut SceneGraph);
}

// ===== FRAMEWORK =====

pub struct Framework<A: Application> {
    application: A,
    graph: SceneGraph,
    renderer: Arc<Mutex<dyn Renderer>>,
    resources: Arc<Mutex<ResourceManager>>,
    frame_count: u64,
    initialised: bool,
    shut_down: bool,
}

impl<A: Application> Framework<A> {
    pub fn new(
        application: A,
        renderer: Arc<Mutex<dyn Renderer>>,
        resources: Arc<Mutex<ResourceManager>>,
        config: SceneGraphConfig,
    ) -> Self {
        Self {
            application,
            graph: SceneGraph::with_config(ROOT_NAME, config),
            renderer,
            resources,
            frame_count: 0,
            initialised: false,
            shut_down: false,
        }
    }

    /// Framework using the engine's renderer and resource manager singletons
    pub fn from_engine(application: A, config: SceneGraphConfig) -> Result<Self> {
        Ok(Self::new(application, Engine::renderer()?, Engine::resource_manager()?, config))
    }

    /// Build the scene and initialise every node
    ///
    /// # Errors
    ///
    /// `InitializationFailed` when called twice or after shutdown; otherwise
    /// the application's or the first failing node's error. The scene is
    /// built only once: after any failure, including one part way through
    /// `create_scene_graph`, later calls are refused and the partial graph
    /// is left for `shutdown`.
    pub fn initialise(&mut self) -> Result<()> {
        if self.initialised || self.shut_down {
            return Err(Error::InitializationFailed(
                "Framework already initialised".to_string()
            ));
        }
        self.initialised = true;
        self.application.create_scene_graph(&mut self.graph)?;

        let (mut renderer, mut resources) = lock_backend(&self.renderer, &self.resources)?;
        self.graph.initialise(&mut RenderContext::new(&mut *renderer, &mut *resources))?;

        crate::engine_info!("armature3d::Framework",
            "Scene initialised with {} nodes", self.graph.len());
        Ok(())
    }

    /// Update then render one frame
    pub fn frame(&mut self) -> Result<()> {
        self.update();
        self.render()?;
        self.frame_count += 1;
        Ok(())
    }

    /// Recompute world transforms from the root's own transform, then let
    /// the application apply its overrides
    pub fn update(&mut self) {
        let root = self.graph.root();
        let root_world = self.graph.world_transform(root).unwrap_or(Mat4::IDENTITY);
        self.graph.update(&root_world);
        self.application.update_scene_graph(&mut self.graph);
    }

    /// Render every initialised leaf inside one begin/end frame pair
    ///
    /// The frame is closed even when a node fails to render; the node's
    /// error is returned.
    pub fn render(&mut self) -> Result<()> {
        let (mut renderer, mut resources) = lock_backend(&self.renderer, &self.resources)?;
        renderer.begin_frame()?;
        let rendered = self.graph.render(&mut RenderContext::new(&mut *renderer, &mut *resources));
        let ended = renderer.end_frame();
        rendered.and(ended)
    }

    /// Run `frames` frames, stopping at the first error
    pub fn run(&mut self, frames: u64) -> Result<()> {
        for _ in 0..frames {
            self.frame()?;
        }
        crate::engine_debug!("armature3d::Framework", "Ran {} frames", frames);
        Ok(())
    }

    /// Shut down the scene graph. Later calls do nothing.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        match lock_backend(&self.renderer, &self.resources) {
            Ok((mut renderer, mut resources)) => {
                self.graph.shutdown(&mut RenderContext::new(&mut *renderer, &mut *resources));
            }
            Err(err) => {
                crate::engine_warn!("armature3d::Framework",
                    "Scene shut down without backend access: {}", err);
                return;
            }
        }
        self.shut_down = true;
        crate::engine_info!("armature3d::Framework",
            "Shut down after {} frames", self.frame_count);
    }

    /// Colour the renderer clears each frame to
    pub fn set_background_colour(&mut self, colour: Vec4) -> Result<()> {
        self.lock_renderer()?.set_background_colour(colour);
        Ok(())
    }

    /// Forward a viewport resize to the renderer
    ///
    /// Nodes keep the projection they captured at initialise.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.lock_renderer()?.resize(width, height);
        crate::engine_debug!("armature3d::Framework", "Viewport resized to {}x{}", width, height);
        Ok(())
    }

    fn lock_renderer(&self) -> Result<MutexGuard<'_, dyn Renderer + 'static>> {
        self.renderer.lock()
            .map_err(|_| Error::BackendError("Renderer lock poisoned".to_string()))
    }

    /// Frames completed by `frame`/`run`
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    pub fn scene_graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn scene_graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    pub fn application(&self) -> &A {
        &self.application
    }

    pub fn application_mut(&mut self) -> &mut A {
        &mut self.application
    }
}

type BackendGuards<'a> = (MutexGuard<'a, dyn Renderer + 'static>, MutexGuard<'a, ResourceManager>);

/// Lock the renderer, then the resource manager
fn lock_backend<'a>(
    renderer: &'a Mutex<dyn Renderer + 'static>,
    resources: &'a Mutex<ResourceManager>,
) -> Result<BackendGuards<'a>> {
    let renderer = renderer.lock()
        .map_err(|_| Error::BackendError("Renderer lock poisoned".to_string()))?;
    let resources = resources.lock()
        .map_err(|_| Error::BackendError("ResourceManager lock poisoned".to_string()))?;
    Ok((renderer, resources))
}

#[cfg(test)]
#[path = "framework_tests.rs"]
mod tests;
