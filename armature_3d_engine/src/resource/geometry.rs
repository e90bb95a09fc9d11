//! Procedural geometry and normal generation.
//!
//! Meshes are plain CPU-side vertex/index lists (`MeshData`) until a node or
//! the resource manager uploads them. Normals follow the face-average rule:
//! every triangle contributes `(p1 - p2) x (p1 - p3)` to its three vertices,
//! and each vertex normal is the normalised mean of its contributions.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use crate::error::{Error, Result};
use crate::renderer::{VertexFormat, VertexLayout};

// ============================================================================
// VERTEX
// ============================================================================

/// Interleaved vertex shared by every shaded node (32 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tex_coords: Vec2,
}

impl Vertex {
    pub fn new(position: Vec3, tex_coords: Vec2) -> Self {
        Self { position, normal: Vec3::ZERO, tex_coords }
    }

    /// Input layout matching the struct
    pub fn layout() -> VertexLayout {
        VertexLayout::packed(&[
            ("POSITION", VertexFormat::Float3),
            ("NORMAL", VertexFormat::Float3),
            ("TEXCOORD", VertexFormat::Float2),
        ])
    }
}

/// CPU-side indexed triangle list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Recompute every vertex normal from the triangles
    pub fn compute_normals(&mut self) -> Result<()> {
        compute_vertex_normals(&mut self.vertices, &self.indices)
    }
}

// ============================================================================
// NORMALS
// ============================================================================

/// Unnormalised face normal of the triangle (p1, p2, p3)
pub fn polygon_normal(p1: Vec3, p2: Vec3, p3: Vec3) -> Vec3 {
    (p1 - p2).cross(p1 - p3)
}

/// Overwrite `vertices[..].normal` with the averaged incident face normals
///
/// Vertices referenced by no triangle, or only by degenerate ones, end up
/// with a zero normal.
///
/// # Errors
///
/// `InvalidResource` if the index count is not a multiple of three or an
/// index is out of range.
pub fn compute_vertex_normals(vertices: &mut [Vertex], indices: &[u32]) -> Result<()> {
    if indices.len() % 3 != 0 {
        return Err(Error::InvalidResource(format!(
            "Index count {} is not a multiple of 3", indices.len()
        )));
    }
    if let Some(&bad) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
        return Err(Error::InvalidResource(format!(
            "Index {} out of range ({} vertices)", bad, vertices.len()
        )));
    }

    let mut sums = vec![Vec3::ZERO; vertices.len()];
    let mut counts = vec![0u32; vertices.len()];

    for triangle in indices.chunks_exact(3) {
        let [a, b, c] = [triangle[0] as usize, triangle[1] as usize, triangle[2] as usize];
        let normal = polygon_normal(vertices[a].position, vertices[b].position, vertices[c].position);
        for i in [a, b, c] {
            sums[i] += normal;
            counts[i] += 1;
        }
    }

    for ((vertex, sum), count) in vertices.iter_mut().zip(sums).zip(counts) {
        vertex.normal = if count == 0 {
            Vec3::ZERO
        } else {
            (sum / count as f32).normalize_or_zero()
        };
    }
    Ok(())
}

// ============================================================================
// SHAPES
// ============================================================================

/// Unit cube spanning [-1, 1] on each axis: 24 vertices, 36 indices
///
/// Each face has its own four vertices (so normals stay flat) with texture
/// coordinates covering the whole image. Normals are computed.
pub fn cube() -> MeshData {
    // (outward normal, u axis, v axis) with u x v == normal
    const FACES: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    ];

    let mut mesh = MeshData::default();
    for (face, (normal, u, v)) in FACES.into_iter().enumerate() {
        let base = face as u32 * 4;
        mesh.vertices.extend([
            Vertex::new(normal - u - v, Vec2::new(0.0, 1.0)),
            Vertex::new(normal + u - v, Vec2::new(1.0, 1.0)),
            Vertex::new(normal - u + v, Vec2::new(0.0, 0.0)),
            Vertex::new(normal + u + v, Vec2::new(1.0, 0.0)),
        ]);
        mesh.indices.extend([base, base + 1, base + 2, base + 2, base + 1, base + 3]);
    }
    compute_normals_infallible(&mut mesh);
    mesh
}

/// Surface of revolution around the Y axis
///
/// `profile` lists `(radius, height)` pairs from bottom to top; each becomes a
/// ring of `segments + 1` vertices (the seam is duplicated so texture
/// coordinates wrap). Triangles face outwards. Normals are computed.
pub fn lathe(profile: &[Vec2], segments: u32) -> MeshData {
    let segments = segments.max(3);
    let ring = segments + 1;
    let mut mesh = MeshData::default();

    let last = profile.len().saturating_sub(1).max(1) as f32;
    for (i, point) in profile.iter().enumerate() {
        for j in 0..ring {
            let angle = j as f32 / segments as f32 * std::f32::consts::TAU;
            let position = Vec3::new(point.x * angle.cos(), point.y, point.x * angle.sin());
            let tex = Vec2::new(j as f32 / segments as f32, 1.0 - i as f32 / last);
            mesh.vertices.push(Vertex::new(position, tex));
        }
    }

    for i in 0..profile.len().saturating_sub(1) as u32 {
        for j in 0..segments {
            let a = i * ring + j;
            let b = a + 1;
            let c = a + ring;
            let d = c + 1;
            mesh.indices.extend([a, c, b, b, c, d]);
        }
    }
    compute_normals_infallible(&mut mesh);
    mesh
}

/// Teapot-shaped body of revolution, roughly 3.2 units wide and 2.85 tall
pub fn teapot() -> MeshData {
    const PROFILE: [(f32, f32); 16] = [
        (0.0, 0.0), (1.2, 0.0), (1.45, 0.15), (1.6, 0.45),
        (1.62, 0.9), (1.55, 1.35), (1.4, 1.7), (1.2, 1.95),
        (1.0, 2.1), (0.8, 2.2), (0.5, 2.3), (0.2, 2.4),
        (0.15, 2.55), (0.3, 2.65), (0.25, 2.8), (0.0, 2.85),
    ];
    let profile: Vec<Vec2> = PROFILE.iter().map(|&(r, y)| Vec2::new(r, y)).collect();
    lathe(&profile, 24)
}

/// Shapes built here only ever use in-range indices
fn compute_normals_infallible(mesh: &mut MeshData) {
    if let Err(err) = mesh.compute_normals() {
        crate::engine_error!("armature3d::geometry", "Generated mesh is malformed: {}", err);
    }
}

#[cfg(test)]
#[path = "geometry_tests.rs"]
mod tests;
