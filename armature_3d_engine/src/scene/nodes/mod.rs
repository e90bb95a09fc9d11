//! Leaf kinds making up the robot: cubes, a teapot, a textured cube and a
//! mesh model.

pub mod shaded_mesh;
mod cube_node;
mod teapot_node;
mod textured_cube_node;
mod model_node;

pub use shaded_mesh::{FrameSnapshot, ShadedMesh, ShadedMeshDesc};
pub use cube_node::CubeNode;
pub use teapot_node::TeapotNode;
pub use textured_cube_node::{TexturedCubeNode, DEFAULT_TEXTURE};
pub use model_node::{ModelNode, DEFAULT_MESH};
