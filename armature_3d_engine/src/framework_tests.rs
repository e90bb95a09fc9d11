use super::*;
use crate::renderer::{Config, HeadlessRenderer};
use crate::scene::{CubeNode, InitialisePolicy, NodeState};
use crate::scene::transform::{approx_eq, compose};
use glam::{Vec3, Vec4};

// ============================================================================
// TEST APPLICATION
// ============================================================================

/// Two cubes; "Pinned" is overridden after every update
#[derive(Default)]
struct TwoCubes {
    updates: u32,
    pin: Option<Mat4>,
    root_world: Option<Mat4>,
    fail_build: bool,
    fail_after_free: bool,
}

impl Application for TwoCubes {
    fn create_scene_graph(&mut self, graph: &mut SceneGraph) -> Result<()> {
        if self.fail_build {
            return Err(Error::InitializationFailed("no scene".to_string()));
        }
        let root = graph.root();
        let free = graph.add(root, "Free", CubeNode::new(Vec4::splat(0.2)))?;
        graph.set_local_transform(free, Mat4::from_translation(Vec3::X));
        if self.fail_after_free {
            return Err(Error::InvalidResource("Pinned mesh missing".to_string()));
        }
        graph.add(root, "Pinned", CubeNode::new(Vec4::splat(0.2)))?;
        Ok(())
    }

    fn update_scene_graph(&mut self, graph: &mut SceneGraph) {
        self.updates += 1;
        if let Some(root_world) = self.root_world {
            graph.set_world_transform(graph.root(), root_world);
        }
        if let (Some(pin), Some(node)) = (self.pin, graph.find("Pinned")) {
            graph.set_world_transform(node, pin);
        }
    }
}

struct Harness {
    renderer: Arc<Mutex<HeadlessRenderer>>,
    resources: Arc<Mutex<ResourceManager>>,
}

impl Harness {
    fn new() -> Self {
        Self {
            renderer: Arc::new(Mutex::new(HeadlessRenderer::new(Config::default()))),
            resources: Arc::new(Mutex::new(ResourceManager::new())),
        }
    }

    fn framework(&self, app: TwoCubes, config: SceneGraphConfig) -> Framework<TwoCubes> {
        Framework::new(app, self.renderer.clone(), self.resources.clone(), config)
    }

    fn commands(&self) -> Vec<String> {
        self.renderer.lock().unwrap().commands().to_vec()
    }
}

// ============================================================================
// LIFECYCLE
// ============================================================================

#[test]
fn test_initialise_builds_and_initialises_scene() {
    let harness = Harness::new();
    let mut framework = harness.framework(TwoCubes::default(), SceneGraphConfig::default());

    framework.initialise().unwrap();

    let graph = framework.scene_graph();
    assert_eq!(graph.len(), 2);
    assert_eq!(graph.name(graph.root()), Some(ROOT_NAME));
    let free = graph.find("Free").unwrap();
    assert_eq!(graph.state(free), Some(NodeState::Initialised));
    assert!(harness.commands().iter().any(|c| c == "create_buffer Pinned/constants Constant 208"));
}

#[test]
fn test_initialise_twice_fails() {
    let harness = Harness::new();
    let mut framework = harness.framework(TwoCubes::default(), SceneGraphConfig::default());
    framework.initialise().unwrap();

    assert!(matches!(framework.initialise(), Err(Error::InitializationFailed(_))));
    assert_eq!(framework.scene_graph().len(), 2);
}

#[test]
fn test_application_build_error_propagates() {
    let harness = Harness::new();
    let app = TwoCubes { fail_build: true, ..TwoCubes::default() };
    let mut framework = harness.framework(app, SceneGraphConfig::default());

    assert!(matches!(framework.initialise(), Err(Error::InitializationFailed(_))));
    assert!(framework.scene_graph().is_empty());
}

#[test]
fn test_partial_build_is_not_rebuilt() {
    let harness = Harness::new();
    let app = TwoCubes { fail_after_free: true, ..TwoCubes::default() };
    let mut framework = harness.framework(app, SceneGraphConfig::default());

    assert!(matches!(framework.initialise(), Err(Error::InvalidResource(_))));
    framework.application_mut().fail_after_free = false;
    assert!(matches!(framework.initialise(), Err(Error::InitializationFailed(_))));

    let graph = framework.scene_graph();
    assert_eq!(graph.len(), 1);
    assert_eq!(graph.iter().filter(|&key| graph.name(key) == Some("Free")).count(), 1);
    assert!(graph.find("Pinned").is_none());
    assert!(!harness.commands().iter().any(|c| c.starts_with("create_buffer Free/")));
}

#[test]
fn test_node_failure_stops_initialise() {
    let harness = Harness::new();
    harness.renderer.lock().unwrap().fail_resource("Pinned/vertices");
    let config = SceneGraphConfig { initialise_policy: InitialisePolicy::RollbackOnFailure, ..SceneGraphConfig::default() };
    let mut framework = harness.framework(TwoCubes::default(), config);

    assert!(framework.initialise().is_err());

    let graph = framework.scene_graph();
    assert_eq!(graph.state(graph.find("Free").unwrap()), Some(NodeState::Uninitialised));
}

#[test]
fn test_shutdown_is_idempotent() {
    let harness = Harness::new();
    let mut framework = harness.framework(TwoCubes::default(), SceneGraphConfig::default());
    framework.initialise().unwrap();

    framework.shutdown();
    framework.shutdown();

    assert!(framework.is_shut_down());
    let graph = framework.scene_graph();
    assert_eq!(graph.state(graph.find("Pinned").unwrap()), Some(NodeState::ShutDown));
    assert!(framework.initialise().is_err());
}

// ============================================================================
// FRAMES
// ============================================================================

#[test]
fn test_frame_renders_between_begin_and_end() {
    let harness = Harness::new();
    let mut framework = harness.framework(TwoCubes::default(), SceneGraphConfig::default());
    framework.initialise().unwrap();
    harness.renderer.lock().unwrap().clear_commands();

    framework.frame().unwrap();

    assert_eq!(harness.commands(), vec![
        "begin_frame".to_string(),
        "draw Free pipeline=Free/pipeline indices=36 texture=none".to_string(),
        "draw Pinned pipeline=Pinned/pipeline indices=36 texture=none".to_string(),
        "end_frame".to_string(),
    ]);
    assert_eq!(framework.frame_count(), 1);
    assert_eq!(framework.application().updates, 1);
}

#[test]
fn test_application_pin_wins_for_the_frame() {
    let harness = Harness::new();
    let pin = Mat4::from_translation(Vec3::new(20.0, 15.0, 0.0));
    let app = TwoCubes { pin: Some(pin), ..TwoCubes::default() };
    let mut framework = harness.framework(app, SceneGraphConfig::default());
    framework.initialise().unwrap();

    framework.frame().unwrap();

    let graph = framework.scene_graph();
    assert_eq!(graph.world_transform(graph.find("Pinned").unwrap()), Some(pin));
}

#[test]
fn test_root_world_feeds_next_update() {
    let harness = Harness::new();
    let spin = Mat4::from_rotation_y(0.5);
    let app = TwoCubes { root_world: Some(spin), ..TwoCubes::default() };
    let mut framework = harness.framework(app, SceneGraphConfig::default());
    framework.initialise().unwrap();

    // The first update runs before the application pins the root
    framework.frame().unwrap();
    let graph = framework.scene_graph();
    let free = graph.find("Free").unwrap();
    assert!(approx_eq(&graph.world_transform(free).unwrap(), &Mat4::from_translation(Vec3::X), 1e-5));

    framework.frame().unwrap();
    let graph = framework.scene_graph();
    let expected = compose(&Mat4::from_translation(Vec3::X), &spin);
    assert!(approx_eq(&graph.world_transform(free).unwrap(), &expected, 1e-5));
}

#[test]
fn test_run_counts_frames() {
    let harness = Harness::new();
    let mut framework = harness.framework(TwoCubes::default(), SceneGraphConfig::default());
    framework.initialise().unwrap();

    framework.run(3).unwrap();

    assert_eq!(framework.frame_count(), 3);
    let stats = harness.renderer.lock().unwrap().stats();
    assert_eq!(stats.frames, 3);
    assert_eq!(stats.draw_calls, 2);
}

#[test]
fn test_render_error_still_ends_frame() {
    let harness = Harness::new();
    let mut framework = harness.framework(TwoCubes::default(), SceneGraphConfig::default());
    framework.initialise().unwrap();
    harness.renderer.lock().unwrap().fail_resource("Free");

    let result = framework.frame();

    assert!(result.is_err());
    assert!(!harness.renderer.lock().unwrap().is_frame_open());
    assert_eq!(framework.frame_count(), 0);
}

#[test]
fn test_poisoned_lock_is_backend_error() {
    let harness = Harness::new();
    let mut framework = harness.framework(TwoCubes::default(), SceneGraphConfig::default());
    framework.initialise().unwrap();

    let resources = harness.resources.clone();
    let _ = std::thread::spawn(move || {
        let _guard = resources.lock().unwrap();
        panic!("poison the resource manager");
    })
    .join();

    assert!(matches!(framework.render(), Err(Error::BackendError(_))));
    framework.shutdown();
    assert!(!framework.is_shut_down());
}

// ============================================================================
// RENDERER SETTINGS
// ============================================================================

#[test]
fn test_background_colour_reaches_renderer() {
    let harness = Harness::new();
    let mut framework = harness.framework(TwoCubes::default(), SceneGraphConfig::default());
    let blue = Vec4::new(0.0, 0.0, 1.0, 1.0);

    framework.set_background_colour(blue).unwrap();

    assert_eq!(harness.renderer.lock().unwrap().config().background_colour, blue);
    assert_eq!(harness.commands().last().map(String::as_str), Some("set_background_colour 0 0 1 1"));
}

#[test]
fn test_resize_reaches_renderer() {
    let harness = Harness::new();
    let mut framework = harness.framework(TwoCubes::default(), SceneGraphConfig::default());

    framework.resize(1024, 768).unwrap();

    let renderer = harness.renderer.lock().unwrap();
    assert_eq!((renderer.config().width, renderer.config().height), (1024, 768));
}

#[test]
fn test_background_colour_with_poisoned_renderer() {
    let harness = Harness::new();
    let mut framework = harness.framework(TwoCubes::default(), SceneGraphConfig::default());

    let renderer = harness.renderer.clone();
    let _ = std::thread::spawn(move || {
        let _guard = renderer.lock().unwrap();
        panic!("poison the renderer");
    })
    .join();

    assert!(matches!(framework.set_background_colour(Vec4::ONE), Err(Error::BackendError(_))));
}
