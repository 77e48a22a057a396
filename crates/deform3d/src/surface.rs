//! Authoritative vertex state for a deformable surface.

use glam::Vec3;

use crate::mesh::{self, GridMesh};

/// Owns the current (deformed) vertex buffer and its derived normals.
///
/// Rendering reads through the accessors; writes happen only on the
/// coordinating thread when the scheduler drains a finished batch.
pub struct SurfaceState {
    original: Vec<Vec3>,
    current: Vec<Vec3>,
    normals: Vec<Vec3>,
}

impl SurfaceState {
    /// Take the mesh baseline as both the immutable original and the
    /// starting current state.
    pub fn new(mesh: &GridMesh) -> Self {
        Self {
            original: mesh.positions.clone(),
            current: mesh.positions.clone(),
            normals: mesh.normals.clone(),
        }
    }

    /// Undisturbed baseline established at construction, never mutated.
    pub fn original(&self) -> &[Vec3] {
        &self.original
    }

    /// Current deformed vertex positions.
    pub fn current(&self) -> &[Vec3] {
        &self.current
    }

    /// Smooth vertex normals matching the current positions as of the last
    /// drain.
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn vertex_count(&self) -> usize {
        self.current.len()
    }

    /// Merge a finished batch's displaced vertices into the current array.
    /// Indices outside the vertex range are skipped.
    pub(crate) fn apply_delta(&mut self, delta: &[(u32, Vec3)]) {
        for &(index, position) in delta {
            if let Some(vertex) = self.current.get_mut(index as usize) {
                *vertex = position;
            }
        }
    }

    /// Recompute smooth vertex normals from the current positions.
    pub(crate) fn refresh_normals(&mut self, indices: &[u32]) {
        self.normals = mesh::vertex_normals(&self.current, indices);
    }
}
