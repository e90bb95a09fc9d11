/// Scene lighting and the per-object constant block uploaded before each draw

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};

/// Directional light and specular settings shared by every node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    /// Colour of the directional light
    pub directional_colour: Vec4,
    /// Direction the light travels (w = 0)
    pub directional_vector: Vec4,
    /// Specular exponent
    pub specular_power: f32,
    /// Colour of specular highlights
    pub specular_colour: Vec4,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            directional_colour: Vec4::new(0.8, 0.8, 0.8, 1.0),
            directional_vector: Vec4::new(-1.0, -1.0, 1.0, 0.0),
            specular_power: 10.0,
            specular_colour: Vec4::new(1.0, 1.0, 1.0, 1.0),
        }
    }
}

/// Per-object constant buffer layout (vertex and pixel stage, slot 0)
///
/// Field order and sizes must match the shader-side block; the struct is
/// 208 bytes with no implicit padding.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ObjectConstants {
    pub world_view_projection: Mat4,
    pub world: Mat4,
    pub ambient_light_colour: Vec4,
    pub directional_light_colour: Vec4,
    pub directional_light_vector: Vec4,
    pub eye_position: Vec3,
    pub specular_power: f32,
    pub specular_colour: Vec4,
}

impl ObjectConstants {
    /// Size of the block in bytes
    pub const SIZE: u64 = std::mem::size_of::<ObjectConstants>() as u64;

    /// Fill the block for one draw
    ///
    /// `view_projection` is `projection * view`; the object's `world` is
    /// applied first.
    pub fn new(
        world: Mat4,
        view_projection: Mat4,
        ambient: Vec4,
        eye_position: Vec3,
        lighting: &Lighting,
    ) -> Self {
        Self {
            world_view_projection: view_projection * world,
            world,
            ambient_light_colour: ambient,
            directional_light_colour: lighting.directional_colour,
            directional_light_vector: lighting.directional_vector,
            eye_position,
            specular_power: lighting.specular_power,
            specular_colour: lighting.specular_colour,
        }
    }
}

#[cfg(test)]
#[path = "lighting_tests.rs"]
mod tests;
