//! Transform composition helpers.
//!
//! Transforms are `glam::Mat4` acting on column vectors, so "apply `a` then
//! `b`" is the product `b * a`.

use glam::{Mat4, Vec3};

/// Cumulative world transform of a node: apply `local` first, then `parent_world`
#[inline]
pub fn compose(local: &Mat4, parent_world: &Mat4) -> Mat4 {
    *parent_world * *local
}

/// Scale, then translate, then rotate about the Y axis
pub fn scale_translate_rotate_y(scale: Vec3, translation: Vec3, angle: f32) -> Mat4 {
    Mat4::from_rotation_y(angle) * Mat4::from_translation(translation) * Mat4::from_scale(scale)
}

/// Whether two transforms agree element-wise within `epsilon`
pub fn approx_eq(a: &Mat4, b: &Mat4, epsilon: f32) -> bool {
    a.abs_diff_eq(*b, epsilon)
}

#[cfg(test)]
#[path = "transform_tests.rs"]
mod tests;
