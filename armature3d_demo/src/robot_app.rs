//! The robot: nine leaves under the root, spun about the Y axis.

use armature_3d_engine::armature3d::framework::Application;
use armature_3d_engine::armature3d::resource::{
    geometry, InMemoryMeshSource, MaterialData, MeshData, SubMeshData,
};
use armature_3d_engine::armature3d::scene::{
    transform, CubeNode, ModelNode, SceneGraph, TeapotNode, TexturedCubeNode,
};
use armature_3d_engine::armature3d::Result;
use armature_3d_engine::glam::{Mat4, Vec2, Vec3, Vec4};

const AMBIENT: Vec4 = Vec4::new(0.2, 0.2, 0.2, 1.0);

/// (node, scale, translation) applied every frame before the shared Y rotation
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

pub struct RobotApp {
    angle: f32,
    angle_step: f32,
}

impl RobotApp {
    pub fn new(angle_step: f32) -> Self {
        Self { angle: 0.0, angle_step }
    }

    /// Rotation about Y for the current frame, in radians
    pub fn rotation(&self) -> f32 {
        self.angle * std::f32::consts::PI / 360.0
    }
}

impl Application for RobotApp {
    fn create_scene_graph(&mut self, graph: &mut SceneGraph) -> Result<()> {
        let root = graph.root();
        graph.add(root, "ModelNode", ModelNode::new(AMBIENT))?;
        graph.add(root, "Teapot", TeapotNode::new(AMBIENT))?;
        graph.add(root, "Body", TexturedCubeNode::new(AMBIENT))?;
        for limb in ["LeftLeg", "RightLeg", "Head", "Nose", "LeftArm", "RightArm"] {
            graph.add(root, limb, CubeNode::new(AMBIENT))?;
        }
        self.angle = 0.0;
        Ok(())
    }

    fn update_scene_graph(&mut self, graph: &mut SceneGraph) {
        self.angle += self.angle_step;
        let theta = self.rotation();

        graph.set_world_transform(graph.root(), Mat4::from_rotation_y(theta));

        for (name, scale, translation) in PLACEMENTS {
            match graph.find(name) {
                Some(node) => {
                    graph.set_world_transform(node, transform::scale_translate_rotate_y(scale, translation, theta));
                }
                None => {
                    armature_3d_engine::engine_warn!("armature3d_demo::RobotApp", "Node '{}' not in scene", name);
                }
            }
        }
    }
}

// ===== AIRPLANE MESH =====

/// Mesh served as `airplane.x`: an untextured fuselage and textured wings
pub fn airplane_source() -> InMemoryMeshSource {
    let fuselage = SubMeshData {
        material: MaterialData {
            diffuse_colour: Vec4::new(0.7, 0.7, 0.75, 1.0),
            shininess: 20.0,
            ..MaterialData::default()
        },
        ..SubMeshData::from_geometry(fuselage())
    };
    let wings = SubMeshData {
        has_tex_coords: true,
        material: MaterialData {
            texture: Some("airplane.bmp".to_string()),
            ..MaterialData::default()
        },
        ..SubMeshData::from_geometry(wings())
    };
    InMemoryMeshSource::new().with_mesh("airplane.x", vec![fuselage, wings])
}

/// Body of revolution lying along the Z axis
fn fuselage() -> MeshData {
    const PROFILE: [(f32, f32); 7] = [
        (0.0, -2.0), (0.25, -1.8), (0.4, -1.0), (0.4, 1.0), (0.3, 1.6), (0.15, 1.9), (0.0, 2.0),
    ];
    let profile: Vec<Vec2> = PROFILE.iter().map(|&(r, y)| Vec2::new(r, y)).collect();
    let mut mesh = geometry::lathe(&profile, 16);
    let lay_down = Mat4::from_rotation_x(std::f32::consts::FRAC_PI_2);
    for vertex in &mut mesh.vertices {
        vertex.position = lay_down.transform_point3(vertex.position);
    }
    mesh
}

/// Flattened cube spanning the wing tips
fn wings() -> MeshData {
    let mut mesh = geometry::cube();
    for vertex in &mut mesh.vertices {
        vertex.position *= Vec3::new(2.5, 0.05, 0.5);
    }
    mesh
}

#[cfg(test)]
#[path = "robot_app_tests.rs"]
mod tests;
