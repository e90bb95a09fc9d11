/// Armature3D Engine - process-wide slots for the renderer, the resource
/// manager and the logger.
///
/// The renderer and the resource manager live in `RwLock<Option<..>>` slots
/// inside a `OnceLock`. Both are handed out as `Arc<Mutex<..>>`: a
/// `Framework` clones the handles once and locks them for the duration of one
/// lifecycle call, so swapping a slot never invalidates a running scene.

use std::sync::{OnceLock, RwLock, Arc, Mutex};
use std::time::SystemTime;
use crate::renderer::Renderer;
use crate::resource::ResourceManager;
use crate::error::{Result, Error};
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

// ===== INTERNAL STATE =====

static ENGINE_STATE: OnceLock<EngineState> = OnceLock::new();

/// Active logger, `DefaultLogger` until replaced
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

struct EngineState {
    renderer: RwLock<Option<Arc<Mutex<dyn Renderer>>>>,
    resource_manager: RwLock<Option<Arc<Mutex<ResourceManager>>>>,
}

/// Engine state, or `InitializationFailed` before `Engine::initialize`
fn state() -> Result<&'static EngineState> {
    ENGINE_STATE.get().ok_or_else(|| Engine::log_and_return_error(
        Error::InitializationFailed("Engine not initialized. Call Engine::initialize() first.".to_string())
    ))
}

/// Put `value` into an empty slot
fn fill_slot<T: ?Sized>(
    slot: &RwLock<Option<Arc<Mutex<T>>>>,
    value: Arc<Mutex<T>>,
    what: &str,
) -> Result<()> {
    let mut lock = slot.write().map_err(|_| Engine::log_and_return_error(
        Error::BackendError(format!("{} lock poisoned", what))
    ))?;
    if lock.is_some() {
        return Err(Engine::log_and_return_error(Error::InitializationFailed(
            format!("{} already exists. Destroy it before registering another.", what)
        )));
    }
    *lock = Some(value);
    crate::engine_info!("armature3d::Engine", "{} registered", what);
    Ok(())
}

/// Clone the handle held by a slot
fn read_slot<T: ?Sized>(slot: &RwLock<Option<Arc<Mutex<T>>>>, what: &str) -> Result<Arc<Mutex<T>>> {
    let lock = slot.read().map_err(|_| Engine::log_and_return_error(
        Error::BackendError(format!("{} lock poisoned", what))
    ))?;
    lock.clone().ok_or_else(|| Engine::log_and_return_error(
        Error::InitializationFailed(format!("{} not created", what))
    ))
}

/// Empty a slot; outstanding handles stay valid until dropped
fn clear_slot<T: ?Sized>(slot: &RwLock<Option<Arc<Mutex<T>>>>, what: &str) -> Result<()> {
    let mut lock = slot.write().map_err(|_| Engine::log_and_return_error(
        Error::BackendError(format!("{} lock poisoned", what))
    ))?;
    if lock.take().is_some() {
        crate::engine_info!("armature3d::Engine", "{} destroyed", what);
    }
    Ok(())
}

fn logger() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)))
}

// ===== PUBLIC API =====

/// Process-wide access to the renderer, the resource manager and the logger
///
/// A typical robot scene setup:
///
/// ```no_run
/// use armature_3d_engine::armature3d::{Engine, render::{Config, HeadlessRenderer}};
/// use armature_3d_engine::armature3d::resource::{InMemoryMeshSource, ResourceManager};
///
/// Engine::initialize()?;
/// Engine::create_renderer(HeadlessRenderer::new(Config::default()))?;
///
/// let mut resources = ResourceManager::new();
/// resources.add_mesh_source(InMemoryMeshSource::new());
/// Engine::install_resource_manager(resources)?;
///
/// // Framework::from_engine(app, config) picks both handles up from here
/// Engine::shutdown();
/// # Ok::<(), armature_3d_engine::armature3d::Error>(())
/// ```
pub struct Engine;

impl Engine {
    /// Log an engine error at ERROR before handing it back
    fn log_and_return_error(error: Error) -> Error {
        crate::engine_error!("armature3d::Engine", "{}", error);
        error
    }

    /// Create the (empty) slots. Calling it again is harmless.
    pub fn initialize() -> Result<()> {
        ENGINE_STATE.get_or_init(|| EngineState {
            renderer: RwLock::new(None),
            resource_manager: RwLock::new(None),
        });
        Ok(())
    }

    /// Drop the resource manager, then the renderer
    ///
    /// Meshes hold GPU buffers created by the renderer, so they go first.
    /// The slots stay usable; a new renderer can be created afterwards.
    pub fn shutdown() {
        if let Some(state) = ENGINE_STATE.get() {
            if let Ok(mut resources) = state.resource_manager.write() {
                *resources = None;
            }
            if let Ok(mut renderer) = state.renderer.write() {
                *renderer = None;
            }
        }
    }

    // ===== RENDERER API =====

    /// Wrap `renderer` and register it
    ///
    /// # Errors
    ///
    /// `InitializationFailed` before `initialize` or when a renderer is
    /// already registered; `BackendError` if the slot lock is poisoned.
    pub fn create_renderer<R: Renderer + 'static>(renderer: R) -> Result<()> {
        Self::register_renderer(Arc::new(Mutex::new(renderer)))
    }

    /// Register an already shared renderer
    ///
    /// Lets the caller keep its own typed handle (e.g. to inspect a
    /// `HeadlessRenderer`'s command trace) while the engine hands out the
    /// trait object.
    pub fn register_renderer(renderer: Arc<Mutex<dyn Renderer>>) -> Result<()> {
        fill_slot(&state()?.renderer, renderer, "Renderer")
    }

    /// Shared handle to the registered renderer
    pub fn renderer() -> Result<Arc<Mutex<dyn Renderer>>> {
        read_slot(&state()?.renderer, "Renderer")
    }

    /// Unregister the renderer
    pub fn destroy_renderer() -> Result<()> {
        clear_slot(&state()?.renderer, "Renderer")
    }

    // ===== RESOURCE MANAGER API =====

    /// Register an empty resource manager (no mesh sources)
    pub fn create_resource_manager() -> Result<()> {
        Self::install_resource_manager(ResourceManager::new())
    }

    /// Register a resource manager that already has its mesh sources
    ///
    /// The demo installs one serving `airplane.x` this way.
    pub fn install_resource_manager(resource_manager: ResourceManager) -> Result<()> {
        fill_slot(&state()?.resource_manager, Arc::new(Mutex::new(resource_manager)), "ResourceManager")
    }

    /// Shared handle to the registered resource manager
    pub fn resource_manager() -> Result<Arc<Mutex<ResourceManager>>> {
        read_slot(&state()?.resource_manager, "ResourceManager")
    }

    /// Unregister the resource manager. Cached meshes are dropped with the
    /// last handle.
    pub fn destroy_resource_manager() -> Result<()> {
        clear_slot(&state()?.resource_manager, "ResourceManager")
    }

    #[cfg(test)]
    pub fn reset_for_testing() {
        Self::shutdown();
    }

    // ===== LOGGING API =====

    /// Replace the active logger
    ///
    /// ```no_run
    /// use armature_3d_engine::armature3d::{Engine, log::{DefaultLogger, LogSeverity, SeverityFilter}};
    ///
    /// Engine::set_logger(SeverityFilter::new(DefaultLogger, LogSeverity::Warn));
    /// ```
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        if let Ok(mut lock) = self::logger().write() {
            *lock = Box::new(logger);
        }
    }

    /// Go back to `DefaultLogger`
    pub fn reset_logger() {
        Self::set_logger(DefaultLogger);
    }

    /// Log without a source location. Used by `engine_info!` and friends.
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        Self::dispatch(severity, source, message, None);
    }

    /// Log with file:line. Used by `engine_error!` and `engine_err!`.
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        Self::dispatch(severity, source, message, Some((file, line)));
    }

    fn dispatch(severity: LogSeverity, source: &str, message: String, location: Option<(&'static str, u32)>) {
        if let Ok(lock) = logger().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: location.map(|(file, _)| file),
                line: location.map(|(_, line)| line),
            });
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
