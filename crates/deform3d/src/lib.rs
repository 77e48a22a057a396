//! Real-time deformable grid surface (snow, sand, soft soil).
//!
//! A flat grid mesh is generated procedurally; collision contact points
//! indent it through a per-vertex displacement kernel that runs in parallel
//! off the simulation thread. Finished kernel batches are merged back into
//! the authoritative surface at tick boundaries, so geometry updates overlap
//! the rest of the simulation loop without blocking it.
//!
//! # Example
//!
//! ```
//! use deform3d::{DeformableSurface, SurfaceParams};
//! use glam::Vec3;
//!
//! let params = SurfaceParams {
//!     width: 16,
//!     height: 16,
//!     force: 0.2,
//!     radius: 1.0,
//! };
//! let mut surface = DeformableSurface::new(params).unwrap();
//!
//! // A footstep lands near the middle of the field.
//! surface.handle_contacts(&[Vec3::new(8.0, 0.0, 8.0)]);
//!
//! // Once per simulation tick: merge finished batches.
//! surface.drain_ready();
//! ```

pub mod kernel;
pub mod mesh;
pub mod params;
pub mod scheduler;
pub mod surface;

pub use glam::{Vec2, Vec3, Vec4};
pub use mesh::{Aabb, GridMesh};
pub use params::SurfaceParams;
pub use scheduler::{BatchHandle, DeformationScheduler, MAX_PENDING_BATCHES};
pub use surface::SurfaceState;

use anyhow::Result;

/// A deformable grid surface: mesh topology, authoritative vertex state, and
/// the batch scheduler, behind one coordinating-thread API.
pub struct DeformableSurface {
    mesh: GridMesh,
    surface: SurfaceState,
    scheduler: DeformationScheduler,
    params: SurfaceParams,
}

impl DeformableSurface {
    /// Build the grid and establish the undisturbed baseline.
    pub fn new(params: SurfaceParams) -> Result<Self> {
        params.validate()?;
        let mesh = GridMesh::build(params.width, params.height)?;
        let surface = SurfaceState::new(&mesh);
        Ok(Self {
            mesh,
            surface,
            scheduler: DeformationScheduler::new(),
            params,
        })
    }

    /// Handle one collision event's contact points (mesh-local space).
    ///
    /// Launches an asynchronous displacement batch with the configured force
    /// and radius; the surface itself does not change until the next
    /// [`drain_ready`](Self::drain_ready). Returns `None` for an empty
    /// contact set. If the pending queue is at [`MAX_PENDING_BATCHES`], the
    /// backlog is drained first so the queue cannot grow without bound.
    pub fn handle_contacts(&mut self, contacts: &[Vec3]) -> Option<BatchHandle> {
        if contacts.is_empty() {
            return None;
        }
        if self.scheduler.pending_batches() >= MAX_PENDING_BATCHES {
            self.drain_ready();
        }
        self.scheduler
            .submit(&self.surface, contacts, self.params.force, self.params.radius)
    }

    /// Merge every in-flight batch into the surface, blocking on unfinished
    /// kernels, then refresh vertex normals. Call once per simulation tick.
    /// Returns the number of merged batches.
    pub fn drain_ready(&mut self) -> usize {
        let merged = self.scheduler.drain_ready(&mut self.surface);
        if merged > 0 {
            self.surface.refresh_normals(&self.mesh.indices);
        }
        merged
    }

    /// Current deformed vertex positions, for rendering.
    pub fn positions(&self) -> &[Vec3] {
        self.surface.current()
    }

    /// Undisturbed baseline positions.
    pub fn original(&self) -> &[Vec3] {
        self.surface.original()
    }

    /// Smooth vertex normals matching the last drained geometry.
    pub fn normals(&self) -> &[Vec3] {
        self.surface.normals()
    }

    /// Per-vertex texture coordinates.
    pub fn uvs(&self) -> &[Vec2] {
        &self.mesh.uvs
    }

    /// Triangle index buffer.
    pub fn indices(&self) -> &[u32] {
        &self.mesh.indices
    }

    /// Per-vertex tangents (xyz) with handedness in w.
    pub fn tangents(&self) -> &[Vec4] {
        &self.mesh.tangents
    }

    /// Bounding box of the undisturbed baseline.
    pub fn bounds(&self) -> Aabb {
        self.mesh.bounds
    }

    pub fn vertex_count(&self) -> usize {
        self.surface.vertex_count()
    }

    pub fn triangle_count(&self) -> usize {
        self.mesh.triangle_count()
    }

    /// Triangle mesh for the collision collaborator. Positions reflect the
    /// surface as of the last drain, so interaction lags in-flight batches
    /// by at most one tick.
    pub fn collision_mesh(&self) -> (&[Vec3], &[u32]) {
        (self.surface.current(), &self.mesh.indices)
    }

    /// Number of submitted batches not yet drained.
    pub fn pending_batches(&self) -> usize {
        self.scheduler.pending_batches()
    }

    pub fn params(&self) -> &SurfaceParams {
        &self.params
    }
}
