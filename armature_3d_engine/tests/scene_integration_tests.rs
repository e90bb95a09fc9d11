//! Integration tests for the scene graph driven by the framework
//!
//! Builds a robot out of every leaf kind and renders it on the headless
//! backend. No engine singleton involved.
//!
//! Run with: cargo test --test scene_integration_tests

use std::sync::{Arc, Mutex};
use armature_3d_engine::armature3d::framework::{Application, Framework};
use armature_3d_engine::armature3d::render::{Config, HeadlessRenderer, Renderer};
use armature_3d_engine::armature3d::resource::{geometry, InMemoryMeshSource, MaterialData, ResourceManager, SubMeshData};
use armature_3d_engine::armature3d::scene::{
    transform, CubeNode, InitialisePolicy, ModelNode, NodeState, SceneGraph, SceneGraphConfig,
    TeapotNode, TexturedCubeNode, UpdateMode,
};
use armature_3d_engine::armature3d::Result;
use armature_3d_engine::glam::{Mat4, Vec3, Vec4};

// ============================================================================
// ROBOT
// ============================================================================

const AMBIENT: Vec4 = Vec4::new(0.2, 0.2, 0.2, 1.0);

const PLACEMENTS: [(&str, Vec3, Vec3); 9] = [
    ("Teapot", Vec3::new(5.0, 5.0, 5.0), Vec3::new(20.0, 15.0, 0.0)),
    ("Nose", Vec3::new(1.0, 1.0, 1.0), Vec3::new(0.0, 34.0, 3.0)),
    ("Body", Vec3::new(5.0, 8.0, 2.5), Vec3::new(0.0, 23.0, 0.0)),
    ("LeftLeg", Vec3::new(1.0, 7.5, 1.0), Vec3::new(-4.0, 7.5, 0.0)),
    ("RightLeg", Vec3::new(1.0, 7.5, 1.0), Vec3::new(4.0, 7.5, 0.0)),
    ("Head", Vec3::new(3.0, 3.0, 3.0), Vec3::new(0.0, 34.0, 0.0)),
    ("LeftArm", Vec3::new(1.0, 8.5, 1.0), Vec3::new(-6.0, 22.0, 0.0)),
    ("RightArm", Vec3::new(1.0, 8.5, 1.0), Vec3::new(6.0, 22.0, 0.0)),
    ("ModelNode", Vec3::new(5.0, 5.0, 5.0), Vec3::new(-25.0, 15.0, 0.0)),
];

#[derive(Default)]
struct Robot {
    angle: f32,
}

impl Robot {
    fn theta(&self) -> f32 {
        self.angle * std::f32::consts::PI / 360.0
    }
}

impl Application for Robot {
    fn create_scene_graph(&mut self, graph: &mut SceneGraph) -> Result<()> {
        let root = graph.root();
        graph.add(root, "ModelNode", ModelNode::new(AMBIENT))?;
        graph.add(root, "Teapot", TeapotNode::new(AMBIENT))?;
        graph.add(root, "Body", TexturedCubeNode::new(AMBIENT))?;
        for limb in ["LeftLeg", "RightLeg", "Head", "Nose", "LeftArm", "RightArm"] {
            graph.add(root, limb, CubeNode::new(AMBIENT))?;
        }
        Ok(())
    }

    fn update_scene_graph(&mut self, graph: &mut SceneGraph) {
        self.angle += 1.0;
        let theta = self.theta();
        graph.set_world_transform(graph.root(), Mat4::from_rotation_y(theta));
        for (name, scale, translation) in PLACEMENTS {
            if let Some(node) = graph.find(name) {
                graph.set_world_transform(node, transform::scale_translate_rotate_y(scale, translation, theta));
            }
        }
    }
}

fn airplane() -> InMemoryMeshSource {
    let wings = SubMeshData {
        has_tex_coords: true,
        material: MaterialData { texture: Some("airplane.bmp".to_string()), ..MaterialData::default() },
        ..SubMeshData::from_geometry(geometry::cube())
    };
    InMemoryMeshSource::new().with_mesh("airplane.x", vec![SubMeshData::from_geometry(geometry::teapot()), wings])
}

struct Backend {
    renderer: Arc<Mutex<HeadlessRenderer>>,
    resources: Arc<Mutex<ResourceManager>>,
}

fn backend() -> Backend {
    let mut resources = ResourceManager::new();
    resources.add_mesh_source(airplane());
    Backend {
        renderer: Arc::new(Mutex::new(HeadlessRenderer::new(Config::default()))),
        resources: Arc::new(Mutex::new(resources)),
    }
}

fn robot_framework(backend: &Backend, config: SceneGraphConfig) -> Framework<Robot> {
    Framework::new(Robot::default(), backend.renderer.clone(), backend.resources.clone(), config)
}

// ============================================================================
// FULL SCENE
// ============================================================================

#[test]
fn test_robot_renders_every_part_each_frame() {
    let backend = backend();
    let mut framework = robot_framework(&backend, SceneGraphConfig::default());
    framework.initialise().unwrap();
    backend.renderer.lock().unwrap().clear_commands();

    framework.frame().unwrap();

    let renderer = backend.renderer.lock().unwrap();
    let draws: Vec<&String> = renderer.commands().iter().filter(|c| c.starts_with("draw ")).collect();
    // The model contributes one draw per submesh
    assert_eq!(draws.len(), 10);
    assert!(draws[0].starts_with("draw ModelNode pipeline=ModelNode/pipeline "));
    assert!(draws[1].ends_with("texture=airplane.bmp"));
    assert!(draws[3].ends_with("texture=woodbox.bmp"));
    assert!(draws[9].starts_with("draw RightArm"));
    assert_eq!(renderer.stats().draw_calls, 10);
}

#[test]
fn test_robot_transforms_follow_rotation() {
    let backend = backend();
    let mut framework = robot_framework(&backend, SceneGraphConfig::default());
    framework.initialise().unwrap();

    framework.run(180).unwrap();

    let theta = framework.application().theta();
    assert!((theta - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    let graph = framework.scene_graph();
    for (name, scale, translation) in PLACEMENTS {
        let world = graph.world_transform(graph.find(name).unwrap()).unwrap();
        let expected = transform::scale_translate_rotate_y(scale, translation, theta);
        assert!(transform::approx_eq(&world, &expected, 1e-4), "{} misplaced", name);
    }

    // A quarter turn carries the teapot from +X to -Z
    let teapot = graph.world_transform(graph.find("Teapot").unwrap()).unwrap();
    let centre = teapot.transform_point3(Vec3::ZERO);
    assert!((centre - Vec3::new(0.0, 15.0, -20.0)).length() < 1e-3);
}

#[test]
fn test_hierarchical_mode_keeps_flat_robot_identical() {
    let broadcast_backend = backend();
    let hierarchical_backend = backend();
    let mut broadcast = robot_framework(&broadcast_backend, SceneGraphConfig::default());
    let mut hierarchical = robot_framework(&hierarchical_backend, SceneGraphConfig {
        update_mode: UpdateMode::Hierarchical,
        ..SceneGraphConfig::default()
    });
    broadcast.initialise().unwrap();
    hierarchical.initialise().unwrap();

    broadcast.run(7).unwrap();
    hierarchical.run(7).unwrap();

    for (name, _, _) in PLACEMENTS {
        let a = broadcast.scene_graph();
        let b = hierarchical.scene_graph();
        assert_eq!(
            a.world_transform(a.find(name).unwrap()),
            b.world_transform(b.find(name).unwrap()),
        );
    }
}

#[test]
fn test_missing_airplane_fails_fast() {
    let backend = Backend {
        renderer: Arc::new(Mutex::new(HeadlessRenderer::new(Config::default()))),
        resources: Arc::new(Mutex::new(ResourceManager::new())),
    };
    let mut framework = robot_framework(&backend, SceneGraphConfig::default());

    assert!(framework.initialise().is_err());

    // ModelNode is first, so nothing after it was initialised
    let graph = framework.scene_graph();
    for (name, _, _) in PLACEMENTS {
        assert_eq!(graph.state(graph.find(name).unwrap()), Some(NodeState::Uninitialised));
    }
    let renderer = backend.renderer.lock().unwrap();
    assert!(!renderer.commands().iter().any(|c| c.starts_with("create_shader shader.hlsl")));
}

#[test]
fn test_frames_after_partial_initialise_skip_broken_parts() {
    let backend = backend();
    backend.renderer.lock().unwrap().fail_resource("woodbox.bmp");
    let mut framework = robot_framework(&backend, SceneGraphConfig::default());

    assert!(framework.initialise().is_err());
    framework.frame().unwrap();

    // ModelNode and Teapot were initialised before Body failed
    let renderer = backend.renderer.lock().unwrap();
    let draws: Vec<&String> = renderer.commands().iter().filter(|c| c.starts_with("draw ")).collect();
    assert_eq!(draws.len(), 3);
    assert!(draws[2].starts_with("draw Teapot"));
}

#[test]
fn test_rollback_releases_airplane() {
    let backend = backend();
    backend.renderer.lock().unwrap().fail_resource("Head/pipeline");
    let mut framework = robot_framework(&backend, SceneGraphConfig {
        initialise_policy: InitialisePolicy::RollbackOnFailure,
        ..SceneGraphConfig::default()
    });

    assert!(framework.initialise().is_err());

    assert!(!backend.resources.lock().unwrap().is_mesh_loaded("airplane.x"));
}

#[test]
fn test_shutdown_releases_airplane_once() {
    let backend = backend();
    let mut framework = robot_framework(&backend, SceneGraphConfig::default());
    framework.initialise().unwrap();
    framework.run(2).unwrap();
    assert_eq!(backend.resources.lock().unwrap().mesh_ref_count("airplane.x"), Some(1));

    framework.shutdown();
    framework.shutdown();

    assert!(!backend.resources.lock().unwrap().is_mesh_loaded("airplane.x"));
    assert_eq!(backend.renderer.lock().unwrap().stats().frames, 2);
}

#[test]
fn test_removed_part_is_no_longer_drawn() {
    let backend = backend();
    let mut framework = robot_framework(&backend, SceneGraphConfig::default());
    framework.initialise().unwrap();

    let teapot = framework.scene_graph().find("Teapot").unwrap();
    let mut detached = framework.scene_graph_mut().remove(teapot).unwrap();
    {
        let mut renderer = backend.renderer.lock().unwrap();
        let mut resources = backend.resources.lock().unwrap();
        detached.shutdown(&mut armature_3d_engine::armature3d::scene::RenderContext::new(
            &mut *renderer, &mut *resources,
        ));
        renderer.clear_commands();
    }
    framework.frame().unwrap();

    let renderer = backend.renderer.lock().unwrap();
    assert!(!renderer.commands().iter().any(|c| c.starts_with("draw Teapot")));
    assert_eq!(renderer.stats().draw_calls, 9);
}
