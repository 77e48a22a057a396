//! Procedural grid mesh generation.
//!
//! Builds a flat rectangular grid of shared vertices with two triangles per
//! cell, plus the derived data a rendering host needs: smooth vertex normals,
//! UV coordinates, tangents, and a bounding box.

use anyhow::{bail, Result};
use glam::{Vec2, Vec3, Vec4};

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

/// Flat grid mesh: `(width+1) * (height+1)` shared vertices, two triangles
/// per cell. Topology (indices, UVs) never changes after construction; the
/// positions stored here are the undisturbed baseline.
#[derive(Clone, Debug)]
pub struct GridMesh {
    /// Grid cells along X.
    pub width: u32,
    /// Grid cells along Z.
    pub height: u32,
    /// Baseline vertex positions, row-major, y = 0.
    pub positions: Vec<Vec3>,
    /// Per-vertex texture coordinates in [0, 1].
    pub uvs: Vec<Vec2>,
    /// Triangle index buffer, 3 entries per triangle.
    pub indices: Vec<u32>,
    /// Smooth per-vertex normals (all +Y for the flat baseline).
    pub normals: Vec<Vec3>,
    /// Per-vertex tangents (xyz) with handedness in w.
    pub tangents: Vec<Vec4>,
    /// Bounding box of the baseline positions.
    pub bounds: Aabb,
}

impl GridMesh {
    /// Build a `width` x `height` cell grid in the XZ plane.
    ///
    /// Vertices are laid out row-major with integer coordinates: x in
    /// [0, width], z in [0, height]. Fails on zero-sized dimensions.
    pub fn build(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            bail!("grid dimensions must be at least 1x1, got {width}x{height}");
        }

        let vert_count = ((width + 1) * (height + 1)) as usize;
        let mut positions = Vec::with_capacity(vert_count);
        let mut uvs = Vec::with_capacity(vert_count);

        for row in 0..=height {
            for x in 0..=width {
                positions.push(Vec3::new(x as f32, 0.0, row as f32));
                uvs.push(Vec2::new(
                    x as f32 / width as f32,
                    row as f32 / height as f32,
                ));
            }
        }

        // Two triangles per cell sharing the v+1 / v+stride diagonal.
        // Winding gives +Y face normals (right-handed cross product).
        let stride = width + 1;
        let mut indices = Vec::with_capacity((width * height * 6) as usize);
        for row in 0..height {
            for x in 0..width {
                let v = row * stride + x;
                indices.extend_from_slice(&[
                    v,
                    v + stride,
                    v + 1,
                    v + 1,
                    v + stride,
                    v + stride + 1,
                ]);
            }
        }

        let normals = vertex_normals(&positions, &indices);
        let tangents = vertex_tangents(&positions, &uvs, &normals, &indices);
        let bounds = bounds(&positions);

        log::debug!(
            "grid mesh built: {}x{} cells, {} vertices, {} triangles",
            width,
            height,
            positions.len(),
            indices.len() / 3
        );

        Ok(Self {
            width,
            height,
            positions,
            uvs,
            indices,
            normals,
            tangents,
            bounds,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Smooth per-vertex normals from shared-vertex triangle geometry.
///
/// Accumulates unnormalized face cross products per vertex (magnitude is
/// 2x triangle area, giving automatic area weighting), then normalizes.
pub fn vertex_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut accum = vec![Vec3::ZERO; positions.len()];

    for tri in indices.chunks_exact(3) {
        let a = positions[tri[0] as usize];
        let b = positions[tri[1] as usize];
        let c = positions[tri[2] as usize];
        let weighted = (b - a).cross(c - a);
        for &i in tri {
            accum[i as usize] += weighted;
        }
    }

    accum.iter().map(|n| n.normalize_or_zero()).collect()
}

/// Per-vertex tangents from the UV parameterization.
///
/// Accumulates per-triangle tangent/bitangent directions, then Gram-Schmidt
/// orthogonalizes against the vertex normal. Handedness goes in w.
pub fn vertex_tangents(
    positions: &[Vec3],
    uvs: &[Vec2],
    normals: &[Vec3],
    indices: &[u32],
) -> Vec<Vec4> {
    let mut tan = vec![Vec3::ZERO; positions.len()];
    let mut bitan = vec![Vec3::ZERO; positions.len()];

    for tri in indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let e1 = positions[i1] - positions[i0];
        let e2 = positions[i2] - positions[i0];
        let duv1 = uvs[i1] - uvs[i0];
        let duv2 = uvs[i2] - uvs[i0];

        let det = duv1.x * duv2.y - duv2.x * duv1.y;
        if det.abs() < f32::EPSILON {
            // Degenerate UV triangle contributes nothing.
            continue;
        }
        let r = 1.0 / det;
        let t = (e1 * duv2.y - e2 * duv1.y) * r;
        let b = (e2 * duv1.x - e1 * duv2.x) * r;

        for &i in tri {
            tan[i as usize] += t;
            bitan[i as usize] += b;
        }
    }

    normals
        .iter()
        .enumerate()
        .map(|(i, &n)| {
            let t = (tan[i] - n * n.dot(tan[i])).normalize_or_zero();
            let w = if n.cross(t).dot(bitan[i]) < 0.0 { -1.0 } else { 1.0 };
            t.extend(w)
        })
        .collect()
}

/// Bounding box of a vertex set.
pub fn bounds(positions: &[Vec3]) -> Aabb {
    let mut min = Vec3::splat(f32::INFINITY);
    let mut max = Vec3::splat(f32::NEG_INFINITY);
    for p in positions {
        min = min.min(*p);
        max = max.max(*p);
    }
    Aabb { min, max }
}
