//! Asynchronous deformation batch scheduling and completion.
//!
//! `submit` snapshots the surface, launches the displacement kernel on the
//! worker pool, and tracks the in-flight batch behind an opaque handle.
//! `drain_ready` runs once per simulation tick on the coordinating thread:
//! it waits for every pending batch and merges results in submission order.

use std::collections::VecDeque;
use std::sync::mpsc;

use glam::Vec3;

use crate::kernel;
use crate::surface::SurfaceState;

/// Upper bound on in-flight batches before the owner should force a drain.
pub const MAX_PENDING_BATCHES: usize = 64;

/// Opaque token identifying one submitted deformation batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BatchHandle(u64);

/// Sparse batch result: only the vertices the kernel actually moved,
/// relative to the batch's own snapshot.
pub(crate) type DisplacementDelta = Vec<(u32, Vec3)>;

/// One in-flight unit of deformation work.
///
/// The contact points and vertex snapshots live in the worker closure; the
/// scheduler side keeps the handle and the completion channel.
struct DeformationBatch {
    handle: BatchHandle,
    rx: mpsc::Receiver<DisplacementDelta>,
}

/// Tracks pending displacement batches and merges them at tick boundaries.
pub struct DeformationScheduler {
    pending: VecDeque<DeformationBatch>,
    next_id: u64,
}

impl DeformationScheduler {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            next_id: 0,
        }
    }

    /// Snapshot the surface and launch a displacement pass over all vertices
    /// on the worker pool. Returns `None` for an empty contact set.
    ///
    /// Each batch owns private copies of everything the kernel reads, so
    /// concurrently in-flight batches never observe each other's writes.
    pub fn submit(
        &mut self,
        surface: &SurfaceState,
        contacts: &[Vec3],
        force: f32,
        radius: f32,
    ) -> Option<BatchHandle> {
        if contacts.is_empty() {
            return None;
        }

        let handle = BatchHandle(self.next_id);
        self.next_id += 1;

        log::debug!(
            "batch {handle:?}: {} contacts, {} vertices",
            contacts.len(),
            surface.vertex_count()
        );

        let contacts = contacts.to_vec();
        let original = surface.original().to_vec();
        let mut working = surface.current().to_vec();

        let (tx, rx) = mpsc::channel();
        rayon::spawn(move || {
            let snapshot = working.clone();
            kernel::displace_all(&original, &mut working, &contacts, radius, force);

            let delta: DisplacementDelta = working
                .iter()
                .zip(&snapshot)
                .enumerate()
                .filter(|(_, (new, old))| new != old)
                .map(|(i, (new, _))| (i as u32, *new))
                .collect();

            // The receiver disappears if the scheduler was dropped mid-flight.
            let _ = tx.send(delta);
        });

        self.pending.push_back(DeformationBatch { handle, rx });
        Some(handle)
    }

    /// Merge every pending batch into the surface, blocking on kernels that
    /// have not finished yet. Batches merge in submission order; a batch
    /// whose worker died is dropped without touching the surface.
    ///
    /// Returns the number of merged batches. The caller recomputes derived
    /// geometry when this is non-zero.
    pub fn drain_ready(&mut self, surface: &mut SurfaceState) -> usize {
        let mut merged = 0;
        while let Some(batch) = self.pending.pop_front() {
            match batch.rx.recv() {
                Ok(delta) => {
                    log::debug!(
                        "batch {:?} drained: {} vertices displaced",
                        batch.handle,
                        delta.len()
                    );
                    surface.apply_delta(&delta);
                    merged += 1;
                }
                Err(mpsc::RecvError) => {
                    log::error!("batch {:?} dropped: worker disconnected", batch.handle);
                }
            }
        }
        merged
    }

    /// Number of submitted batches not yet drained.
    pub fn pending_batches(&self) -> usize {
        self.pending.len()
    }
}

impl Default for DeformationScheduler {
    fn default() -> Self {
        Self::new()
    }
}
