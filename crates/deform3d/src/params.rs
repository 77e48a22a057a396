//! Surface construction and deformation parameters.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Deformable surface parameters, fixed at construction.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SurfaceParams {
    /// Grid cells along X.
    pub width: u32,
    /// Grid cells along Z.
    pub height: u32,
    /// Indentation depth below the undisturbed surface (world units).
    pub force: f32,
    /// Contact influence radius. Compared against squared distance in the
    /// kernel, so the effective reach is sqrt(radius).
    pub radius: f32,
}

impl Default for SurfaceParams {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            force: 0.15,  // Shallow footprint depth
            radius: 0.5,  // Effective reach ~0.7 world units
        }
    }
}

impl SurfaceParams {
    /// Check that the parameters describe a buildable surface.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            bail!(
                "grid dimensions must be at least 1x1, got {}x{}",
                self.width,
                self.height
            );
        }
        if !self.force.is_finite() || !self.radius.is_finite() {
            bail!(
                "force and radius must be finite, got force={} radius={}",
                self.force,
                self.radius
            );
        }
        Ok(())
    }
}
